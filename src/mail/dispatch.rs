//! The dispatch adapter: recipient assembly plus the queued-vs-immediate
//! branch.

use std::marker::PhantomData;

use async_trait::async_trait;

use super::job::{HasTransport, SendEmailJob};
use super::message::Email;
use super::policy::DeliveryPolicy;
use super::transport::Transport;
use super::MailError;
use crate::jobs::{enqueue, QueueProvider};

/// Computed dispatch parameters for one outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// Effective destination list, after policy rewriting.
    pub destinations: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

/// Strategy for getting an [`Outbound`] delivered.
#[async_trait]
pub trait Dispatch: Send + Sync + 'static {
    async fn dispatch(&self, outbound: Outbound) -> Result<(), MailError>;
}

/// Sends inline through a [`Transport`], blocking the caller for the
/// duration of the network call.
pub struct ImmediateDispatcher<T: Transport> {
    transport: T,
}

impl<T: Transport> ImmediateDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: Transport> Dispatch for ImmediateDispatcher<T> {
    async fn dispatch(&self, outbound: Outbound) -> Result<(), MailError> {
        self.transport
            .send_raw(&outbound.destinations, &outbound.subject, &outbound.body)
            .await
    }
}

/// Hands the send off to a job queue and returns without waiting for
/// delivery confirmation.
///
/// `S` is the worker context the queued [`SendEmailJob`] will run
/// against; it never materializes on the enqueueing side.
pub struct QueuedDispatcher<Q, S = ()> {
    queue: Q,
    _marker: PhantomData<S>,
}

impl<Q, S> QueuedDispatcher<Q, S> {
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<Q: QueueProvider, S: HasTransport> Dispatch for QueuedDispatcher<Q, S> {
    async fn dispatch(&self, outbound: Outbound) -> Result<(), MailError> {
        let job =
            SendEmailJob::<S>::new(outbound.destinations, outbound.subject, outbound.body);
        enqueue(&self.queue, job).await?;
        Ok(())
    }
}

/// Routes outgoing mail through SES, applying the delivery policy and the
/// dispatch strategy chosen at construction time.
///
/// Transport failures are absorbed: they are logged at warning level and
/// never surface to the caller. Anything else (enqueue failures, payload
/// serialization) propagates.
pub struct SesMailer<D: Dispatch> {
    policy: DeliveryPolicy,
    dispatcher: D,
}

impl<T: Transport> SesMailer<ImmediateDispatcher<T>> {
    /// Mailer that sends through the transport inline.
    pub fn immediate(policy: DeliveryPolicy, transport: T) -> Self {
        Self::new(policy, ImmediateDispatcher::new(transport))
    }
}

impl<Q: QueueProvider, S: HasTransport> SesMailer<QueuedDispatcher<Q, S>> {
    /// Mailer that defers every send to the job queue.
    pub fn queued(policy: DeliveryPolicy, queue: Q) -> Self {
        Self::new(policy, QueuedDispatcher::new(queue))
    }
}

impl<D: Dispatch> SesMailer<D> {
    pub fn new(policy: DeliveryPolicy, dispatcher: D) -> Self {
        Self { policy, dispatcher }
    }

    /// Dispatch an email.
    ///
    /// Computes the effective destinations from the policy, then hands the
    /// result to the dispatcher. A transport failure is logged and
    /// swallowed here; the caller sees `Ok(())` regardless of delivery.
    pub async fn send(&self, email: &Email) -> Result<(), MailError> {
        let outbound = Outbound {
            destinations: self.policy.destinations(email),
            subject: email.subject.clone(),
            body: email.body.clone(),
        };

        match self.dispatcher.dispatch(outbound).await {
            Err(MailError::Transport(message)) => {
                tracing::warn!(%message, "SES send failed");
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;
    use crate::jobs::{Job, MemoryQueue};

    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<Outbound>>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        async fn sent(&self) -> Vec<Outbound> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send_raw(
            &self,
            destinations: &[String],
            subject: &str,
            body: &str,
        ) -> Result<(), MailError> {
            self.sent.lock().await.push(Outbound {
                destinations: destinations.to_vec(),
                subject: subject.to_string(),
                body: body.to_string(),
            });

            if self.fail {
                return Err(MailError::Transport("simulated SES failure".into()));
            }
            Ok(())
        }
    }

    #[derive(Clone)]
    struct TestState {
        transport: RecordingTransport,
    }

    impl HasTransport for TestState {
        type Transport = RecordingTransport;
        fn transport(&self) -> &RecordingTransport {
            &self.transport
        }
    }

    fn email() -> Email {
        Email::builder()
            .to("a@x.com")
            .cc("b@x.com")
            .subject("Subject")
            .body("Body")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn immediate_sends_computed_destinations() {
        let transport = RecordingTransport::default();
        let mailer = SesMailer::immediate(DeliveryPolicy::default(), transport.clone());

        mailer.send(&email()).await.unwrap();

        let sent = transport.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destinations, vec!["a@x.com", "b@x.com"]);
        assert_eq!(sent[0].subject, "Subject");
        assert_eq!(sent[0].body, "Body");
    }

    #[tokio::test]
    async fn immediate_applies_override() {
        let transport = RecordingTransport::default();
        let policy = DeliveryPolicy {
            send_all_to: vec!["override@x.com".into()],
            ..Default::default()
        };
        let mailer = SesMailer::immediate(policy, transport.clone());

        mailer.send(&email()).await.unwrap();

        assert_eq!(transport.sent().await[0].destinations, vec!["override@x.com"]);
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed() {
        let transport = RecordingTransport::failing();
        let mailer = SesMailer::immediate(DeliveryPolicy::default(), transport.clone());

        let result = mailer.send(&email()).await;

        assert!(result.is_ok());
        assert_eq!(transport.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn queued_enqueues_one_job_without_sending() {
        let transport = RecordingTransport::default();
        let queue = MemoryQueue::new();
        let mailer: SesMailer<QueuedDispatcher<_, TestState>> =
            SesMailer::queued(DeliveryPolicy::default(), queue.clone());

        mailer.send(&email()).await.unwrap();

        let entry = queue.claim_next("test-worker").await.unwrap().unwrap();
        assert_eq!(entry.job_type, <SendEmailJob<TestState> as Job>::JOB_TYPE);

        let job: SendEmailJob<TestState> = serde_json::from_value(entry.payload).unwrap();
        assert_eq!(job.destinations, vec!["a@x.com", "b@x.com"]);
        assert_eq!(job.subject, "Subject");
        assert_eq!(job.body, "Body");

        // Exactly one job, and the transport was never touched.
        assert!(queue.claim_next("test-worker").await.unwrap().is_none());
        assert!(transport.sent().await.is_empty());
    }
}
