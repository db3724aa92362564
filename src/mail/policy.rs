//! Process-wide recipient rewriting rules.

use serde::{Deserialize, Deserializer};

use super::message::Email;
use super::MailError;

/// Recipient rewriting applied to every outgoing message.
///
/// When `send_all_to` is non-empty it replaces the entire computed
/// destination list — commonly used to redirect all mail to a test inbox
/// outside production. Otherwise `cc_all` and `bcc_all` are appended to
/// the message's own recipients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryPolicy {
    /// Addresses that replace all recipients when non-empty.
    #[serde(rename = "ses_send_all_to", default, deserialize_with = "comma_list")]
    pub send_all_to: Vec<String>,

    /// Addresses appended to every message when no override is active.
    #[serde(rename = "ses_cc_all", default, deserialize_with = "comma_list")]
    pub cc_all: Vec<String>,

    /// Like `cc_all`, appended after it.
    #[serde(rename = "ses_bcc_all", default, deserialize_with = "comma_list")]
    pub bcc_all: Vec<String>,
}

impl DeliveryPolicy {
    /// Load the policy from environment variables.
    ///
    /// Reads `SES_SEND_ALL_TO`, `SES_CC_ALL`, and `SES_BCC_ALL`, each a
    /// comma-separated address list. Unset variables leave the list empty.
    pub fn from_env() -> Result<Self, MailError> {
        dotenvy::dotenv().ok();

        serde_env::from_env().map_err(|e| MailError::MissingConfig(e.to_string()))
    }

    /// Compute the effective destination list for a message.
    ///
    /// A non-empty `send_all_to` replaces every other recipient. Otherwise
    /// the message's to, cc, and bcc lists are concatenated with `cc_all`
    /// and `bcc_all`, in that order. Duplicates are kept.
    pub fn destinations(&self, email: &Email) -> Vec<String> {
        if !self.send_all_to.is_empty() {
            return self.send_all_to.clone();
        }

        let mut destinations = email.to.clone();
        destinations.extend_from_slice(&email.cc);
        destinations.extend_from_slice(&email.bcc);
        destinations.extend_from_slice(&self.cc_all);
        destinations.extend_from_slice(&self.bcc_all);
        destinations
    }
}

fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}
