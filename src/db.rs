use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// One statement per entry, executed in order on startup.
const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        team TEXT NOT NULL,
        position TEXT NOT NULL,
        pto_balance_hours REAL NOT NULL DEFAULT 60.0,
        sick_balance_hours REAL NOT NULL DEFAULT 60.0,
        pto_refresh_date TEXT,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pto_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL REFERENCES members(id),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        pto_type TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        manager_team TEXT NOT NULL,
        denial_reason TEXT,
        is_partial_day INTEGER NOT NULL DEFAULT 0,
        start_time TEXT,
        end_time TEXT,
        reason TEXT,
        duration_business_days REAL NOT NULL,
        duration_hours REAL NOT NULL,
        timekeeping_complete TEXT NOT NULL DEFAULT 'No',
        coverage_arranged TEXT NOT NULL DEFAULT 'No',
        workflow_complete TEXT NOT NULL DEFAULT 'No',
        submitted_at TEXT,
        updated_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pending_members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        team TEXT NOT NULL,
        position TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        notes TEXT,
        requested_pto_balance_hours REAL NOT NULL DEFAULT 60.0,
        submitted_at TEXT,
        reviewed_at TEXT,
        denial_reason TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS positions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team TEXT NOT NULL,
        name TEXT NOT NULL,
        UNIQUE(team, name)
    )
    "#,
];

const ADMIN_POSITIONS: [&str; 4] = [
    "Front Desk/Admin",
    "CT Desk",
    "Echo Desk (4th Floor)",
    "Authorization Team",
];

const CLINICAL_POSITIONS: [&str; 11] = [
    "APP",
    "CVI RNs",
    "Cardiac CT RNs",
    "4th Floor Echo RNs",
    "CVI MOAs",
    "CVI Echo Techs",
    "4th Floor Echo Techs",
    "EKG Tech (4th Floor)",
    "Cardiac CT Techs (4th Floor)",
    "Nuclear Tech (CVI)",
    "Vascular Tech (CVI)",
];

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("DATABASE_URL is not a valid sqlite connection string")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");
    seed_positions(&pool)
        .await
        .expect("Failed to seed positions");

    pool
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Idempotent, safe to run on every startup.
pub async fn seed_positions(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for name in ADMIN_POSITIONS {
        sqlx::query("INSERT OR IGNORE INTO positions (team, name) VALUES (?, ?)")
            .bind("admin")
            .bind(name)
            .execute(pool)
            .await?;
    }
    for name in CLINICAL_POSITIONS {
        sqlx::query("INSERT OR IGNORE INTO positions (team, name) VALUES (?, ?)")
            .bind("clinical")
            .bind(name)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// In-memory pool for tests. Pinned to one connection because every new
/// connection to `sqlite::memory:` opens a fresh empty database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    init_schema(&pool).await.expect("schema");
    seed_positions(&pool).await.expect("positions");
    pool
}
