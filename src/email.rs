//! Account lifecycle email notifications.
//!
//! Sends are fire-and-forget: each one is spawned onto the runtime, failures
//! are logged at warn level, and the HTTP response that triggered the email
//! is never affected. When the SMTP environment variables are absent the
//! notifier is disabled and sends become debug-logged no-ops, which is also
//! how the test suite runs.

use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

/// Outbound email collaborator. Cheap to clone; the SMTP transport pools
/// connections internally.
#[derive(Clone)]
pub struct Notifier {
    inner: Option<Inner>,
}

#[derive(Clone)]
struct Inner {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Notifier {
    /// Builds a notifier from `SMTP_HOST`, `SMTP_EMAIL`, and optionally
    /// `SMTP_USERNAME`/`SMTP_PASSWORD`. Missing or invalid settings disable
    /// the notifier rather than failing startup.
    pub fn from_env() -> Self {
        let host = std::env::var("SMTP_HOST").ok();
        let from = std::env::var("SMTP_EMAIL")
            .ok()
            .and_then(|value| value.parse::<Mailbox>().ok());

        let inner = match (host, from) {
            (Some(host), Some(from)) => {
                match AsyncSmtpTransport::<Tokio1Executor>::relay(&host) {
                    Ok(mut builder) => {
                        if let (Ok(username), Ok(password)) =
                            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
                        {
                            builder = builder.credentials(Credentials::new(username, password));
                        }
                        Some(Inner {
                            transport: builder.build(),
                            from,
                        })
                    }
                    Err(e) => {
                        log::warn!("Invalid SMTP relay {}: {}; email disabled", host, e);
                        None
                    }
                }
            }
            _ => {
                log::info!("SMTP not configured; email notifications disabled");
                None
            }
        };

        Self { inner }
    }

    /// A notifier that never sends anything. Used by the test suite.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn send_welcome(&self, email: &str, name: &str) {
        self.send(
            "Welcome to the task app!",
            format!(
                "Welcome to the app, {}. Let me know how you get on with the app.",
                name
            ),
            email,
        );
    }

    pub fn send_cancellation(&self, email: &str, name: &str) {
        self.send(
            &format!("We're sorry to see you go {}!", name),
            "Please let me know why you decided to leave so I can make future improvements!"
                .to_string(),
            email,
        );
    }

    fn send(&self, subject: &str, body: String, to: &str) {
        let Some(inner) = &self.inner else {
            log::debug!("Email disabled, skipping \"{}\" to {}", subject, to);
            return;
        };

        let recipient: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                log::warn!("Not a mailable address {}: {}", to, e);
                return;
            }
        };

        let message = match Message::builder()
            .from(inner.from.clone())
            .to(recipient)
            .subject(subject)
            .body(body)
        {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Failed to build notification email: {}", e);
                return;
            }
        };

        let transport = inner.transport.clone();
        let subject = subject.to_string();
        tokio::spawn(async move {
            if let Err(e) = transport.send(message).await {
                log::warn!("Failed to send \"{}\": {}", subject, e);
            }
        });
    }
}
