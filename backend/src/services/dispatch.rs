//! "Send all" payslip run. Emails go out one at a time with a fixed pause
//! after every attempt so the mail provider's rate limit is respected.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::types::EmployeeId;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayslipMailer: Send + Sync {
    async fn send(&self, message: PayslipMessage) -> Result<(), MailError>;
}

/// One employee queued for a run, with the payslip already rendered.
#[derive(Debug, Clone)]
pub struct PayslipRecipient {
    pub employee_id: EmployeeId,
    pub name: String,
    pub email: Option<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchFailure {
    pub employee_id: EmployeeId,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub sent: u32,
    pub failed: u32,
    pub skipped: u32,
    pub failures: Vec<DispatchFailure>,
}

/// Sends every payslip in order. A failed send is recorded and the run moves
/// on; it never aborts early.
pub async fn send_all(
    mailer: &dyn PayslipMailer,
    recipients: Vec<PayslipRecipient>,
    delay: Duration,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for recipient in recipients {
        let Some(to) = recipient
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
        else {
            tracing::debug!(employee_id = %recipient.employee_id, "no email address, skipping payslip");
            summary.skipped += 1;
            continue;
        };

        tracing::info!(employee_id = %recipient.employee_id, to = %to, "sending payslip");
        let message = PayslipMessage {
            to,
            subject: recipient.subject,
            html: recipient.html,
        };

        match mailer.send(message).await {
            Ok(()) => summary.sent += 1,
            Err(err) => {
                tracing::warn!(
                    employee_id = %recipient.employee_id,
                    error = %err,
                    "payslip email failed"
                );
                summary.failed += 1;
                summary.failures.push(DispatchFailure {
                    employee_id: recipient.employee_id,
                    name: recipient.name,
                    reason: err.to_string(),
                });
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    tracing::info!(
        sent = summary.sent,
        failed = summary.failed,
        skipped = summary.skipped,
        "payslip run finished"
    );
    summary
}
