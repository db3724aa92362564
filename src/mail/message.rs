//! Email message type and builder.

use serde::{Deserialize, Serialize};

use super::MailError;

/// A complete email message ready for dispatch.
///
/// The body is plain text: the raw-send path composes a text-only message,
/// so HTML, inline images, and attachments are not represented here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon copy recipients.
    #[serde(default)]
    pub cc: Vec<String>,
    /// Blind carbon copy recipients.
    #[serde(default)]
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

impl Email {
    /// Create a new email builder.
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }
}

/// Builder for constructing [`Email`] instances.
#[derive(Debug, Default)]
pub struct EmailBuilder {
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: Option<String>,
    body: Option<String>,
}

impl EmailBuilder {
    /// Add a primary recipient.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add multiple primary recipients.
    pub fn to_many(mut self, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Add a CC recipient.
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a BCC recipient.
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the plain text body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the email, validating required fields.
    pub fn build(self) -> Result<Email, MailError> {
        if self.to.is_empty() {
            return Err(MailError::Build("at least one recipient required".into()));
        }

        let subject = self
            .subject
            .ok_or_else(|| MailError::Build("subject required".into()))?;

        let body = self
            .body
            .ok_or_else(|| MailError::Build("body required".into()))?;

        Ok(Email {
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_email() {
        let email = Email::builder()
            .to("user@example.com")
            .cc("copy@example.com")
            .subject("Hello")
            .body("Body text")
            .build()
            .unwrap();

        assert_eq!(email.to, vec!["user@example.com"]);
        assert_eq!(email.cc, vec!["copy@example.com"]);
        assert!(email.bcc.is_empty());
        assert_eq!(email.subject, "Hello");
        assert_eq!(email.body, "Body text");
    }

    #[test]
    fn build_many_recipients() {
        let email = Email::builder()
            .to_many(["a@b.com", "c@d.com"])
            .subject("Test")
            .body("Plain")
            .build()
            .unwrap();

        assert_eq!(email.to, vec!["a@b.com", "c@d.com"]);
    }

    #[test]
    fn build_requires_recipient() {
        let result = Email::builder().subject("Hi").body("Body").build();
        assert!(result.is_err());
    }

    #[test]
    fn build_requires_subject() {
        let result = Email::builder().to("a@b.com").body("Body").build();
        assert!(result.is_err());
    }

    #[test]
    fn build_requires_body() {
        let result = Email::builder().to("a@b.com").subject("Hi").build();
        assert!(result.is_err());
    }
}
