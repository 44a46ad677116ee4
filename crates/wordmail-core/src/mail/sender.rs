//! SMTP delivery (async lettre).

use chrono::{Local, NaiveDate};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use super::MailComposer;
use crate::enrichment::EnrichedWord;
use crate::error::MailError;
use crate::review::ProgressSummary;
use crate::storage::SmtpConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_SENDER_NAME: &str = "单词学习系统";

/// Sends the daily mail and failure notices.
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Build the multipart daily mail without sending it.
    pub fn daily_message(
        &self,
        words: &[EnrichedWord],
        progress: &ProgressSummary,
        date: NaiveDate,
    ) -> Result<Message, MailError> {
        let text = MailComposer::render_text(words, progress, date);
        let html = MailComposer::render_html(words, progress, date);

        Message::builder()
            .from(parse_mailbox(&self.config.from)?)
            .to(parse_mailbox(&self.config.to)?)
            .subject(MailComposer::subject(date))
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(MailError::from)
    }

    /// Build a plain-text failure notice.
    pub fn error_message(&self, error_msg: &str) -> Result<Message, MailError> {
        let from = Mailbox::new(
            Some(ERROR_SENDER_NAME.to_string()),
            parse_mailbox(&self.config.from)?.email,
        );
        let body = format!(
            "单词邮件系统运行失败\n\n错误信息:\n{error_msg}\n\n时间: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        Message::builder()
            .from(from)
            .to(parse_mailbox(&self.config.to)?)
            .subject("⚠️ 单词邮件系统错误通知")
            .body(body)
            .map_err(MailError::from)
    }

    pub async fn send_words(
        &self,
        words: &[EnrichedWord],
        progress: &ProgressSummary,
        date: NaiveDate,
    ) -> Result<(), MailError> {
        let message = self.daily_message(words, progress, date)?;
        self.send(message).await?;
        tracing::info!(to = %self.config.to, words = words.len(), "daily mail sent");
        Ok(())
    }

    pub async fn send_error_notification(&self, error_msg: &str) -> Result<(), MailError> {
        let message = self.error_message(error_msg)?;
        self.send(message).await?;
        tracing::info!(to = %self.config.to, "error notification sent");
        Ok(())
    }

    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.transport()?.send(message).await?;
        Ok(())
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = if self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.server)
        };
        let mut builder = builder.port(self.config.port).timeout(Some(SMTP_TIMEOUT));

        let password = self.config.resolved_password();
        if !self.config.username.is_empty() && !password.is_empty() {
            builder = builder.credentials(Credentials::new(self.config.username.clone(), password));
        }
        Ok(builder.build())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        address: address.to_string(),
        message: e.to_string(),
    })
}
