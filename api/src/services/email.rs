//! Outgoing email.
//!
//! Handlers build an [`OutgoingMail`] with one of the template functions below
//! and hand it to the [`Mailer`] held in `AppState`. Every message carries a
//! plain text and an HTML alternative.
//!
//! [`SmtpMailer`] delivers over SMTP with STARTTLS using the credentials in
//! `AppConfig`; [`LogMailer`] only logs and records messages and is used when
//! no SMTP credentials are configured, and in tests.

use async_trait::async_trait;
use lettre::{
    AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header},
    transport::smtp::{AsyncSmtpTransport, authentication::Credentials},
};
use std::sync::Mutex;
use util::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A rendered message ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// SMTP delivery through `SMTP_HOST`.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        let from: Mailbox = format!("{} <{}>", config.email_from_name, config.smtp_username)
            .parse()
            .map_err(|_| MailError::Address(config.smtp_username.clone()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|_| MailError::Address(mail.to.clone()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(mail.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(mail.html),
                    ),
            )?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Logs messages instead of sending them and keeps a copy for inspection.
#[derive(Default)]
pub struct LogMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages "sent" so far, oldest first.
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn last_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "Email not sent (SMTP disabled)");
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }
        Ok(())
    }
}

/// Sends `mail`, logging instead of failing. Used where delivery is best effort.
pub async fn send_logged(mailer: &dyn Mailer, mail: OutgoingMail) {
    let to = mail.to.clone();
    let subject = mail.subject.clone();
    if let Err(e) = mailer.send(mail).await {
        tracing::error!(error = %e, to = %to, subject = %subject, "Failed to send email");
    }
}

fn layout(title: &str, body_html: &str) -> String {
    let brand = AppConfig::global().email_from_name.clone();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; text-align: center; }}
    .highlight {{ font-size: 24px; font-weight: bold; letter-spacing: 4px; }}
    .button {{ display: inline-block; padding: 10px 20px; background-color: #ffd60a; color: #000000 !important; text-decoration: none; border-radius: 5px; margin: 20px 0; font-weight: bold; }}
    .footer {{ font-size: 13px; color: #999; margin-top: 20px; }}
  </style>
</head>
<body>
  <div class="container">
    <h2>{title}</h2>
    {body_html}
    <p class="footer">{brand}</p>
  </div>
</body>
</html>"#
    )
}

pub fn otp_email(to: &str, code: &str, expiry_minutes: u64) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: "Verification Email".into(),
        text: format!(
            "Use the following code to verify your email address:\n\n{code}\n\n\
             The code is valid for {expiry_minutes} minutes. If you did not request it, ignore this email."
        ),
        html: layout(
            "OTP Verification Email",
            &format!(
                "<p>Use the following code to verify your email address:</p>\
                 <p class=\"highlight\">{code}</p>\
                 <p>The code is valid for {expiry_minutes} minutes.</p>"
            ),
        ),
    }
}

pub fn password_updated_email(to: &str, full_name: &str) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: format!("Password updated successfully for {full_name}"),
        text: format!(
            "Hey {full_name},\n\nThe password for {to} was just changed. \
             If you did not make this change, reset your password immediately."
        ),
        html: layout(
            "Password Update Confirmation",
            &format!(
                "<p>Hey {full_name},</p>\
                 <p>The password for <b>{to}</b> was just changed.</p>\
                 <p>If you did not make this change, reset your password immediately.</p>"
            ),
        ),
    }
}

pub fn password_reset_email(to: &str, link: &str, expiry_minutes: u64) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: "Password Reset".into(),
        text: format!(
            "You requested a password reset. Open the link below to choose a new password:\n\n{link}\n\n\
             This link expires in {expiry_minutes} minutes. If you did not request it, ignore this email."
        ),
        html: layout(
            "Reset Your Password",
            &format!(
                "<p>You requested a password reset.</p>\
                 <a class=\"button\" href=\"{link}\">Reset Password</a>\
                 <p>This link expires in {expiry_minutes} minutes.</p>"
            ),
        ),
    }
}

pub fn course_enrollment_email(to: &str, full_name: &str, course_name: &str) -> OutgoingMail {
    let dashboard = format!("{}/dashboard/enrolled-courses", AppConfig::global().frontend_url);
    OutgoingMail {
        to: to.to_owned(),
        subject: format!("Successfully Enrolled into {course_name}"),
        text: format!(
            "Dear {full_name},\n\nYou are now enrolled in \"{course_name}\". \
             Open your dashboard to start learning: {dashboard}"
        ),
        html: layout(
            "Course Registration Confirmation",
            &format!(
                "<p>Dear {full_name},</p>\
                 <p>You are now enrolled in <b>\"{course_name}\"</b>.</p>\
                 <a class=\"button\" href=\"{dashboard}\">Go to Dashboard</a>"
            ),
        ),
    }
}

pub fn payment_success_email(
    to: &str,
    full_name: &str,
    amount: f64,
    order_id: &str,
    payment_id: &str,
) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: "Payment Received".into(),
        text: format!(
            "Dear {full_name},\n\nWe have received a payment of {amount:.2}.\n\
             Payment ID: {payment_id}\nOrder ID: {order_id}"
        ),
        html: layout(
            "Course Payment Confirmation",
            &format!(
                "<p>Dear {full_name},</p>\
                 <p>We have received a payment of <b>{amount:.2}</b>.</p>\
                 <p>Payment ID: <b>{payment_id}</b><br/>Order ID: <b>{order_id}</b></p>"
            ),
        ),
    }
}

pub fn contact_confirmation_email(to: &str, first_name: &str, message: &str) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: "Your message was received".into(),
        text: format!(
            "Dear {first_name},\n\nThank you for contacting us. We will get back to you soon.\n\n\
             Your message:\n{message}"
        ),
        html: layout(
            "Contact Form Confirmation",
            &format!(
                "<p>Dear {first_name},</p>\
                 <p>Thank you for contacting us. We will get back to you soon.</p>\
                 <p><i>{message}</i></p>"
            ),
        ),
    }
}

pub fn contact_forward_email(
    support: &str,
    sender_name: &str,
    sender_email: &str,
    phone: Option<&str>,
    message: &str,
) -> OutgoingMail {
    let phone = phone.unwrap_or("not provided");
    OutgoingMail {
        to: support.to_owned(),
        subject: format!("Contact form message from {sender_name}"),
        text: format!(
            "From: {sender_name} <{sender_email}>\nPhone: {phone}\n\n{message}"
        ),
        html: layout(
            "New Contact Message",
            &format!(
                "<p>From: <b>{sender_name}</b> &lt;{sender_email}&gt;<br/>Phone: {phone}</p>\
                 <p>{message}</p>"
            ),
        ),
    }
}
