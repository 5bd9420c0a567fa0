use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::services::dispatch::{MailError, PayslipMailer, PayslipMessage};

/// Sends payslips over SMTP. With `skip_send` set, messages are built and
/// validated but never handed to the server.
pub struct SmtpPayslipMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
    skip_send: bool,
}

impl SmtpPayslipMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mailer = if config.username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        } else {
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                .port(config.port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from_address: config.from_address.parse()?,
            skip_send: config.skip_send,
        })
    }

    fn build(&self, message: &PayslipMessage) -> Result<Message, MailError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|err: lettre::address::AddressError| MailError::InvalidAddress {
                address: message.to.clone(),
                reason: err.to_string(),
            })?;

        Message::builder()
            .from(self.from_address.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|err| MailError::Build(err.to_string()))
    }
}

#[async_trait]
impl PayslipMailer for SmtpPayslipMailer {
    async fn send(&self, message: PayslipMessage) -> Result<(), MailError> {
        let email = self.build(&message)?;
        if self.skip_send {
            tracing::debug!(to = %message.to, "SMTP_SKIP_SEND set, payslip not sent");
            return Ok(());
        }
        self.mailer
            .send(email)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;
        Ok(())
    }
}
