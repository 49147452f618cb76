use actix_web::web;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::Config;
use crate::model::pending_member::PendingMember;
use crate::model::pto_request::PtoRequest;

/// Sends PTO notifications over SMTP. With `EMAIL_ENABLED=false` every message
/// is logged instead of sent, so the tracker stays usable without a mail server.
#[derive(Clone)]
pub struct EmailService {
    enabled: bool,
    smtp_host: String,
    smtp_port: u16,
    smtp_user: String,
    smtp_password: String,
    from_email: String,
    admin_manager_email: String,
    clinical_manager_email: String,
}

impl EmailService {
    pub fn from_config(config: &Config) -> Self {
        EmailService {
            enabled: config.email_enabled,
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
            smtp_user: config.smtp_user.clone(),
            smtp_password: config.smtp_password.clone(),
            from_email: config.from_email.clone(),
            admin_manager_email: config.admin_manager_email.clone(),
            clinical_manager_email: config.clinical_manager_email.clone(),
        }
    }

    fn manager_address(&self, manager_team: &str) -> &str {
        if manager_team == "admin" {
            &self.admin_manager_email
        } else {
            &self.clinical_manager_email
        }
    }

    /// Confirmation to the employee plus a review notice to the manager queue.
    pub async fn send_submission_emails(
        &self,
        request: &PtoRequest,
        member_name: &str,
        member_email: &str,
    ) {
        let subject = format!("PTO Request Submitted - Request #{}", request.id);
        let body = format!(
            "Dear {},\n\n\
             Your PTO request has been submitted and is pending manager approval.\n\n\
             Request Details:\n\
             - Request ID: #{}\n\
             - Type: {}\n\
             - Dates: {} to {}\n\
             - Duration: {}\n\n\
             You will receive another email once your manager reviews the request.",
            member_name,
            request.id,
            request.pto_type,
            request.start_date,
            request.end_date,
            duration_line(request),
        );
        self.send(member_email, &subject, &body).await;

        let manager_subject = format!("New PTO Request #{} - {}", request.id, member_name);
        let manager_body = format!(
            "A new PTO request is waiting for review.\n\n\
             - Employee: {}\n\
             - Type: {}\n\
             - Dates: {} to {}\n\
             - Duration: {}\n\
             - Reason: {}\n\n\
             Please log in to approve or deny the request.",
            member_name,
            request.pto_type,
            request.start_date,
            request.end_date,
            duration_line(request),
            request.reason.as_deref().unwrap_or("Not provided"),
        );
        self.send(self.manager_address(&request.manager_team), &manager_subject, &manager_body)
            .await;
    }

    pub async fn send_decision_email(
        &self,
        request: &PtoRequest,
        member_name: &str,
        member_email: &str,
        approved: bool,
    ) {
        let (subject, body) = decision_subject_body(request, member_name, approved);
        self.send(member_email, &subject, &body).await;
    }

    pub async fn send_registration_pending_email(&self, pending: &PendingMember) {
        let subject = format!("New Employee Registration - {}", pending.name);
        let body = format!(
            "A new employee registration is waiting for approval.\n\n\
             - Name: {}\n\
             - Email: {}\n\
             - Team: {}\n\
             - Position: {}\n\
             - Notes: {}\n\n\
             Please log in to approve or deny the registration.",
            pending.name,
            pending.email,
            pending.team,
            pending.position,
            pending.notes.as_deref().unwrap_or("None"),
        );
        self.send(self.manager_address(&pending.team), &subject, &body).await;
    }

    pub async fn send_registration_decision_email(&self, pending: &PendingMember, approved: bool) {
        let (subject, body) = registration_decision_subject_body(pending, approved);
        self.send(&pending.email, &subject, &body).await;
    }

    async fn send(&self, to: &str, subject: &str, body: &str) {
        if !self.enabled {
            // Console fallback for testing/debugging
            tracing::info!(to, subject, body, "EMAIL NOTIFICATION (console mode, email disabled)");
            return;
        }

        let from: Mailbox = match self.from_email.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::error!(error = %e, from = %self.from_email, "Invalid sender address");
                return;
            }
        };
        let recipient: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::error!(error = %e, to, "Invalid recipient address");
                return;
            }
        };

        let message = match Message::builder()
            .from(from)
            .to(recipient)
            .subject(subject)
            .body(body.to_string())
        {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(error = %e, to, "Failed to build email");
                return;
            }
        };

        let transport = match SmtpTransport::starttls_relay(&self.smtp_host) {
            Ok(builder) => {
                let mut builder = builder.port(self.smtp_port);
                if !self.smtp_user.is_empty() {
                    builder = builder.credentials(Credentials::new(
                        self.smtp_user.clone(),
                        self.smtp_password.clone(),
                    ));
                }
                builder.build()
            }
            Err(e) => {
                tracing::error!(error = %e, host = %self.smtp_host, "Failed to build SMTP transport");
                return;
            }
        };

        let recipient = to.to_string();
        // lettre's SmtpTransport is blocking, keep it off the worker threads
        match web::block(move || transport.send(&message)).await {
            Ok(Ok(_)) => tracing::info!(to = %recipient, "Email sent successfully"),
            Ok(Err(e)) => tracing::error!(error = %e, to = %recipient, "Failed to send email"),
            Err(e) => tracing::error!(error = %e, to = %recipient, "Email task failed"),
        }
    }
}

fn duration_line(request: &PtoRequest) -> String {
    if request.is_partial_day {
        format!(
            "{} hours ({} to {})",
            request.duration_hours,
            request.start_time.as_deref().unwrap_or("?"),
            request.end_time.as_deref().unwrap_or("?"),
        )
    } else {
        format!(
            "{} business days ({} hours)",
            request.duration_business_days, request.duration_hours
        )
    }
}

fn decision_subject_body(
    request: &PtoRequest,
    member_name: &str,
    approved: bool,
) -> (String, String) {
    if approved {
        (
            format!("PTO Request Approved - Request #{}", request.id),
            format!(
                "Dear {},\n\n\
                 Your PTO request has been approved.\n\n\
                 - Request ID: #{}\n\
                 - Type: {}\n\
                 - Dates: {} to {}\n\
                 - Duration: {}\n\n\
                 {} hours have been deducted from your balance.",
                member_name,
                request.id,
                request.pto_type,
                request.start_date,
                request.end_date,
                duration_line(request),
                request.duration_hours,
            ),
        )
    } else {
        (
            format!("PTO Request Denied - Request #{}", request.id),
            format!(
                "Dear {},\n\n\
                 Your PTO request has been denied.\n\n\
                 - Request ID: #{}\n\
                 - Type: {}\n\
                 - Dates: {} to {}\n\
                 - Reason: {}\n\n\
                 Please contact your manager if you have questions.",
                member_name,
                request.id,
                request.pto_type,
                request.start_date,
                request.end_date,
                request.denial_reason.as_deref().unwrap_or("Not provided"),
            ),
        )
    }
}

fn registration_decision_subject_body(pending: &PendingMember, approved: bool) -> (String, String) {
    if approved {
        (
            "Your PTO Tracker profile has been approved".to_string(),
            format!(
                "Dear {},\n\n\
                 Your employee profile has been approved. You can now submit PTO\n\
                 requests from the request form.\n\n\
                 - Team: {}\n\
                 - Position: {}\n\
                 - Starting PTO balance: {} hours",
                pending.name, pending.team, pending.position, pending.requested_pto_balance_hours,
            ),
        )
    } else {
        (
            "Your PTO Tracker registration was not approved".to_string(),
            format!(
                "Dear {},\n\n\
                 Your employee registration was not approved.\n\n\
                 - Reason: {}\n\n\
                 Please contact your manager for details.",
                pending.name,
                pending.denial_reason.as_deref().unwrap_or("Not provided"),
            ),
        )
    }
}
