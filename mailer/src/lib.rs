use anyhow::Result;
use lettre::{
    message::{Mailbox, MessageBuilder},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

pub mod template;

/// Background SMTP worker. Requests queue mail through the paired [`MailSender`]
/// and never wait on the SMTP round trip.
pub struct Mailer {
    message_builder: MessageBuilder,
    smtp_transport: SmtpTransport,
    channel_receiver: UnboundedReceiver<MailPayload>,
}

impl Mailer {
    pub fn new(
        smtp_host: &str,
        smtp_port: &Option<u16>,
        smtp_username: &str,
        smtp_password: &str,
        sender: &str,
        reply_to: &Option<String>,
    ) -> Result<(Self, MailSender)> {
        pp_log::info(Some("⚡"), "[Mailer] Initializing component");

        let (channel_sender, channel_receiver) = mpsc::unbounded_channel::<MailPayload>();

        let mut message_builder = Message::builder().from(sender.parse::<Mailbox>()?);
        if let Some(reply_to) = reply_to {
            message_builder = message_builder.reply_to(reply_to.parse::<Mailbox>()?);
        }

        let mut smtp_transport = SmtpTransport::relay(smtp_host)?.credentials(Credentials::new(
            smtp_username.to_owned(),
            smtp_password.to_owned(),
        ));
        if let Some(smtp_port) = smtp_port {
            smtp_transport = smtp_transport.port(*smtp_port);
        }

        Ok((
            Self {
                message_builder,
                smtp_transport: smtp_transport.build(),
                channel_receiver,
            },
            MailSender {
                sender: channel_sender,
            },
        ))
    }

    pub async fn run_none() -> Result<()> {
        Ok(())
    }

    pub async fn run(self, cancel_token: CancellationToken) -> Result<()> {
        pp_log::info(Some("💫"), "[Mailer] Running component");

        let Self {
            message_builder,
            smtp_transport,
            mut channel_receiver,
        } = self;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => break,
                payload = channel_receiver.recv() => {
                    let Some(payload) = payload else {
                        break;
                    };

                    let message = match Self::build_message(&message_builder, payload) {
                        Ok(message) => message,
                        Err(err) => {
                            pp_log::error(None, format!("[Mailer] Failed to build mail: {err}"));
                            continue;
                        }
                    };

                    // SmtpTransport is blocking
                    let smtp_transport = smtp_transport.clone();
                    tokio::task::spawn_blocking(move || {
                        if let Err(err) = smtp_transport.send(&message) {
                            pp_log::error(None, format!("[Mailer] Failed to send mail: {err}"));
                        }
                    });
                }
            }
        }

        pp_log::info(Some("👋"), "[Mailer] Turned off");

        Ok(())
    }

    fn build_message(message_builder: &MessageBuilder, payload: MailPayload) -> Result<Message> {
        Ok(message_builder
            .clone()
            .to(payload.to.parse()?)
            .subject(payload.subject)
            .body(payload.body)?)
    }
}

#[derive(Clone)]
pub struct MailSender {
    sender: UnboundedSender<MailPayload>,
}

impl MailSender {
    pub fn send(&self, payload: MailPayload) -> Result<()> {
        Ok(self.sender.send(payload)?)
    }
}

#[derive(Debug)]
pub struct MailPayload {
    to: String,
    subject: String,
    body: String,
}

impl MailPayload {
    pub fn new(to: &str, subject: &str, body: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        }
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_message_for_valid_recipient() {
        let builder = Message::builder().from("Portal <portal@example.org>".parse().unwrap());
        let payload = MailPayload::new("applicant@example.org", "Hello", "Body");

        assert!(Mailer::build_message(&builder, payload).is_ok());
    }

    #[test]
    fn rejects_invalid_recipient() {
        let builder = Message::builder().from("Portal <portal@example.org>".parse().unwrap());
        let payload = MailPayload::new("not an address", "Hello", "Body");

        assert!(Mailer::build_message(&builder, payload).is_err());
    }

    #[test]
    fn new_rejects_malformed_reply_to() {
        assert!(Mailer::new(
            "smtp.example.org",
            &Some(2525),
            "portal",
            "secret",
            "Participation Programme <portal@example.org>",
            &Some("secretariat at example".to_owned()),
        )
        .is_err());

        assert!(Mailer::new(
            "smtp.example.org",
            &None,
            "portal",
            "secret",
            "Participation Programme <portal@example.org>",
            &Some("Secretariat <pp@example.org>".to_owned()),
        )
        .is_ok());
    }

    #[tokio::test]
    async fn sender_fails_once_worker_is_gone() {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sender = MailSender { sender };
        drop(receiver);

        assert!(sender
            .send(MailPayload::new("a@example.org", "s", "b"))
            .is_err());
    }
}
