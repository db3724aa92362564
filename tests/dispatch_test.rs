use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use sesmail::jobs::{JobRegistry, MemoryQueue, Worker};
use sesmail::{
    DeliveryPolicy, Email, HasTransport, MailError, QueuedDispatcher, SendEmailJob, SesMailer,
    Transport,
};

#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<(Vec<String>, String, String)>>>,
}

impl RecordingTransport {
    async fn sent(&self) -> Vec<(Vec<String>, String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send_raw(
        &self,
        destinations: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), MailError> {
        self.sent
            .lock()
            .await
            .push((destinations.to_vec(), subject.to_string(), body.to_string()));
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

#[tokio::test]
async fn immediate_send_applies_policy() {
    let transport = RecordingTransport::default();
    let policy = DeliveryPolicy {
        send_all_to: vec![],
        cc_all: vec!["audit@example.com".into()],
        bcc_all: vec!["archive@example.com".into()],
    };
    let mailer = SesMailer::immediate(policy, transport.clone());

    let email = Email::builder()
        .to("user@example.com")
        .bcc("hidden@example.com")
        .subject("Hello")
        .body("Body")
        .build()
        .unwrap();

    mailer.send(&email).await.unwrap();

    let sent = transport.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].0,
        vec![
            "user@example.com",
            "hidden@example.com",
            "audit@example.com",
            "archive@example.com"
        ]
    );
}

#[tokio::test]
async fn queued_send_is_delivered_by_worker() {
    let transport = RecordingTransport::default();
    let queue = MemoryQueue::new();
    let mailer: SesMailer<QueuedDispatcher<_, TestState>> =
        SesMailer::queued(DeliveryPolicy::default(), queue.clone());

    let email = Email::builder()
        .to("user@example.com")
        .subject("Queued")
        .body("Deferred body")
        .build()
        .unwrap();

    mailer.send(&email).await.unwrap();

    // Nothing goes out until a worker picks the job up.
    assert!(transport.sent().await.is_empty());

    let registry = JobRegistry::new().register::<SendEmailJob<TestState>>();
    Worker::new(
        queue,
        registry,
        TestState {
            transport: transport.clone(),
        },
    )
    .poll_interval(Duration::from_millis(10))
    .start();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while transport.sent().await.is_empty() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "queued mail was not delivered in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let sent = transport.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, vec!["user@example.com"]);
    assert_eq!(sent[0].1, "Queued");
    assert_eq!(sent[0].2, "Deferred body");
}

#[tokio::test]
async fn queued_send_applies_override_before_enqueue() {
    let transport = RecordingTransport::default();
    let queue = MemoryQueue::new();
    let policy = DeliveryPolicy {
        send_all_to: vec!["override@example.com".into()],
        cc_all: vec![],
        bcc_all: vec![],
    };
    let mailer: SesMailer<QueuedDispatcher<_, TestState>> = SesMailer::queued(policy, queue.clone());

    let email = Email::builder()
        .to("user@example.com")
        .cc("copy@example.com")
        .subject("Redirected")
        .body("Body")
        .build()
        .unwrap();

    mailer.send(&email).await.unwrap();

    let registry = JobRegistry::new().register::<SendEmailJob<TestState>>();
    Worker::new(
        queue,
        registry,
        TestState {
            transport: transport.clone(),
        },
    )
    .poll_interval(Duration::from_millis(10))
    .start();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while transport.sent().await.is_empty() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "queued mail was not delivered in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(transport.sent().await[0].0, vec!["override@example.com"]);
}
