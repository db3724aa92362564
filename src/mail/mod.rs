//! Mail dispatch through Amazon SES.
//!
//! Every outgoing [`Email`] passes through a [`SesMailer`], which applies
//! the process-wide [`DeliveryPolicy`] to compute the effective destination
//! list and then hands the result to a dispatch strategy: either an
//! [`ImmediateDispatcher`] that sends through the SES transport inline, or
//! a [`QueuedDispatcher`] that defers the send to a background job.
//!
//! # Quick Start
//!
//! ```ignore
//! // 1. Initialize transport and policy from environment
//! let transport = SesTransport::from_env()?;
//! let policy = DeliveryPolicy::from_env()?;
//!
//! // 2. Send inline
//! let mailer = SesMailer::immediate(policy, transport);
//! let email = Email::builder()
//!     .to("user@example.com")
//!     .subject("Welcome!")
//!     .body("Thanks for signing up.")
//!     .build()?;
//! mailer.send(&email).await?;
//!
//! // 3. Or defer delivery to the job queue
//! let mailer: SesMailer<QueuedDispatcher<_, AppState>> =
//!     SesMailer::queued(policy, queue);
//! mailer.send(&email).await?;
//! ```
//!
//! # Environment Variables
//!
//! [`SesTransport::from_env`] reads:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SES_REGION` | No | AWS region of the SES endpoint (default: `us-east-1`) |
//! | `SES_USERNAME` | Yes | SES SMTP interface username |
//! | `SES_PASSWORD` | Yes | SES SMTP interface password |
//! | `SES_PORT` | No | SMTP interface port (default: 587) |
//! | `SES_FROM` | Yes | Fixed sender address for all outgoing mail |
//! | `SES_TIMEOUT` | No | Connection timeout in seconds (default: 10) |
//!
//! [`DeliveryPolicy::from_env`] reads `SES_SEND_ALL_TO`, `SES_CC_ALL`, and
//! `SES_BCC_ALL`, each a comma-separated address list.

mod dispatch;
mod job;
mod message;
mod policy;
mod transport;

pub use dispatch::{Dispatch, ImmediateDispatcher, Outbound, QueuedDispatcher, SesMailer};
pub use job::{HasTransport, SendEmailJob};
pub use message::{Email, EmailBuilder};
pub use policy::DeliveryPolicy;
pub use transport::{SesConfig, SesTransport, Transport};

use thiserror::Error;

use crate::jobs::JobError;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SES transport error: {0}")]
    Transport(String),

    #[error("failed to enqueue mail job: {0}")]
    Enqueue(#[from] JobError),
}
