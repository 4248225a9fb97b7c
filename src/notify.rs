//! Customer notifications
//!
//! Sent when a ticket moves to Resolved or Escalated. Delivery is
//! fire-and-forget from the service's point of view: callers log failures
//! and carry on.

use crate::error::TriageError;
use crate::models::Status;
use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Details of a status change to tell the customer about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusNotification {
    pub to_email: String,
    pub customer_name: String,
    pub complaint_id: i64,
    pub status: Status,
    pub action_note: String,
}

/// Rendered email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl StatusNotification {
    pub fn render(&self, sender: &str) -> EmailMessage {
        let body = format!(
            "Dear {name},\n\n\
             Your complaint (Ticket #{id}) has been updated.\n\n\
             --------------------------------------------------\n\
             Current Status: {status}\n\
             Agent Note: {note}\n\
             --------------------------------------------------\n\n\
             If your issue is marked as 'Resolved', no further action is needed.\n\
             If you have questions, please reply to this email.\n\n\
             Best regards,\n\
             Bank Support Team\n",
            name = self.customer_name,
            id = self.complaint_id,
            status = self.status,
            note = self.action_note,
        );

        EmailMessage {
            from: sender.to_string(),
            to: self.to_email.clone(),
            subject: format!("Update on Complaint #{}: {}", self.complaint_id, self.status),
            body,
        }
    }
}

/// Trait for customer notification delivery
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn notify(&self, notification: &StatusNotification) -> Result<()>;
}

/// Logs the rendered email instead of sending it
pub struct LogNotifier {
    sender: String,
}

impl LogNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, notification: &StatusNotification) -> Result<()> {
        let email = notification.render(&self.sender);
        info!(
            to = %email.to,
            subject = %email.subject,
            "Customer notification (not delivered, no mail relay configured)"
        );
        Ok(())
    }
}

/// Posts rendered emails as JSON to an HTTP mail relay
pub struct RelayNotifier {
    client: Client,
    relay_url: String,
    sender: String,
}

impl RelayNotifier {
    pub fn new(relay_url: impl Into<String>, sender: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            relay_url: relay_url.into(),
            sender: sender.into(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for RelayNotifier {
    fn name(&self) -> &'static str {
        "relay"
    }

    async fn notify(&self, notification: &StatusNotification) -> Result<()> {
        let email = notification.render(&self.sender);

        let response = self
            .client
            .post(&self.relay_url)
            .json(&email)
            .send()
            .await
            .map_err(|e| {
                TriageError::NotificationError(format!("Mail relay request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriageError::NotificationError(format!(
                "Mail relay returned {} for complaint #{}",
                status, notification.complaint_id
            )));
        }

        info!(to = %email.to, complaint_id = notification.complaint_id, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> StatusNotification {
        StatusNotification {
            to_email: "anita@example.com".to_string(),
            customer_name: "Anita Rao".to_string(),
            complaint_id: 42,
            status: Status::Resolved,
            action_note: "Refund processed".to_string(),
        }
    }

    #[test]
    fn test_render_email() {
        let email = notification().render("support@bank.example");
        assert_eq!(email.subject, "Update on Complaint #42: Resolved");
        assert_eq!(email.to, "anita@example.com");
        assert_eq!(email.from, "support@bank.example");
        assert!(email.body.starts_with("Dear Anita Rao,"));
        assert!(email.body.contains("Ticket #42"));
        assert!(email.body.contains("Agent Note: Refund processed"));
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notifier = LogNotifier::new("support@bank.example");
        assert!(notifier.notify(&notification()).await.is_ok());
    }

    #[tokio::test]
    async fn test_relay_failure_is_reported() {
        // Nothing listens on port 9 locally
        let notifier =
            RelayNotifier::new("http://127.0.0.1:9/send", "support@bank.example").unwrap();
        let err = notifier.notify(&notification()).await.unwrap_err();
        assert!(matches!(err, TriageError::NotificationError(_)));
    }
}
