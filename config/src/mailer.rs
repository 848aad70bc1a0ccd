use serde::Deserialize;

/// Outgoing SMTP relay for notification mail. Absent means mail is disabled.
#[derive(Deserialize)]
pub struct MailerConfig {
    smtp_host: String,
    smtp_port: Option<u16>,
    smtp_username: String,
    smtp_password: String,
    sender_name: String,
    sender_email: String,
    reply_to: Option<String>,
}

impl MailerConfig {
    pub fn smtp_host(&self) -> &str {
        &self.smtp_host
    }

    /// Overrides the submission port lettre picks for the relay.
    pub fn smtp_port(&self) -> &Option<u16> {
        &self.smtp_port
    }

    pub fn smtp_username(&self) -> &str {
        &self.smtp_username
    }

    pub fn smtp_password(&self) -> &str {
        &self.smtp_password
    }

    pub fn sender(&self) -> String {
        format!("{} <{}>", self.sender_name, self.sender_email)
    }

    /// Secretariat inbox applicants reach when they answer a notification.
    pub fn reply_to(&self) -> &Option<String> {
        &self.reply_to
    }
}
