use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_api_per_min: u32,

    // Balance accounting
    pub standard_day_hours: f64,
    pub default_pto_balance_hours: f64,
    pub default_sick_balance_hours: f64,

    // Holiday calendar
    pub holiday_first_year: i32,
    pub holiday_last_year: i32,
    pub observed_holidays: bool,
    pub missing_year_fallback: bool,

    // Email notifications
    pub email_enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from_email: String,
    pub admin_manager_email: String,
    pub clinical_manager_email: String,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://pto_tracker.db".to_string()),

            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            standard_day_hours: env::var("STANDARD_DAY_HOURS")
                .unwrap_or_else(|_| "7.5".to_string())
                .parse()
                .unwrap(),
            default_pto_balance_hours: env::var("DEFAULT_PTO_BALANCE_HOURS")
                .unwrap_or_else(|_| "60.0".to_string())
                .parse()
                .unwrap(),
            default_sick_balance_hours: env::var("DEFAULT_SICK_BALANCE_HOURS")
                .unwrap_or_else(|_| "60.0".to_string())
                .parse()
                .unwrap(),

            holiday_first_year: env::var("HOLIDAY_FIRST_YEAR")
                .unwrap_or_else(|_| "2015".to_string())
                .parse()
                .unwrap(),
            holiday_last_year: env::var("HOLIDAY_LAST_YEAR")
                .unwrap_or_else(|_| "2045".to_string())
                .parse()
                .unwrap(),
            observed_holidays: env::var("OBSERVED_HOLIDAYS")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                == "true",
            // When true, years outside the configured window count as holiday-free
            // instead of rejecting the request.
            missing_year_fallback: env::var("MISSING_YEAR_FALLBACK")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                == "true",

            email_enabled: env::var("EMAIL_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                == "true",
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .unwrap(),
            smtp_user: env::var("SMTP_USER").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@pto-tracker.local".to_string()),
            admin_manager_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@pto-tracker.local".to_string()),
            clinical_manager_email: env::var("CLINICAL_EMAIL")
                .unwrap_or_else(|_| "clinical@pto-tracker.local".to_string()),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    /// Fixed settings for handler tests, independent of the environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            rate_submit_per_min: 60,
            rate_api_per_min: 1000,
            standard_day_hours: 7.5,
            default_pto_balance_hours: 60.0,
            default_sick_balance_hours: 60.0,
            holiday_first_year: 2015,
            holiday_last_year: 2045,
            observed_holidays: false,
            missing_year_fallback: false,
            email_enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@pto-tracker.local".to_string(),
            admin_manager_email: "admin@pto-tracker.local".to_string(),
            clinical_manager_email: "clinical@pto-tracker.local".to_string(),
            api_prefix: "/api".to_string(),
        }
    }
}
