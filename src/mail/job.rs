//! Background job for deferred mail delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Transport;
use crate::jobs::{Job, JobOpts, JobResult};

/// Trait for worker context that provides transport access.
///
/// Implement this on your worker context to process [`SendEmailJob`]:
///
/// ```ignore
/// #[derive(Clone)]
/// pub struct AppState {
///     pub transport: SesTransport,
///     // ...
/// }
///
/// impl HasTransport for AppState {
///     type Transport = SesTransport;
///     fn transport(&self) -> &SesTransport {
///         &self.transport
///     }
/// }
/// ```
pub trait HasTransport: Send + Sync + 'static {
    type Transport: Transport;
    fn transport(&self) -> &Self::Transport;
}

/// A deferred send, captured as a queue payload.
///
/// The job carries the already-computed destination list along with the
/// subject and body. Delivery retries up to 3 times with exponential
/// backoff; the code that enqueued the job never observes the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailJob<S = ()> {
    /// Addresses this email will be sent to.
    pub destinations: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    #[serde(skip)]
    _marker: std::marker::PhantomData<S>,
}

impl<S> SendEmailJob<S> {
    /// Create a new send email job.
    pub fn new(destinations: Vec<String>, subject: String, body: String) -> Self {
        Self {
            destinations,
            subject,
            body,
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<S: HasTransport> Job for SendEmailJob<S> {
    const JOB_TYPE: &'static str = "sesmail::send_email";
    type Context = S;

    fn default_opts() -> JobOpts {
        JobOpts {
            max_attempts: 3,
            ..Default::default()
        }
    }

    async fn perform(self, ctx: &Self::Context) -> JobResult {
        ctx.transport()
            .send_raw(&self.destinations, &self.subject, &self.body)
            .await
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

        Ok(())
    }
}
