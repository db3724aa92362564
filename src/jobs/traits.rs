use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::entry::{JobEntry, JobOpts};
use super::JobError;

/// A serializable job with typed execution logic.
///
/// Implement this trait for each job type. The job's fields become the
/// serialized payload, and `perform` defines the execution logic.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Notify { address: String, text: String }
///
/// #[async_trait]
/// impl Job for Notify {
///     const JOB_TYPE: &'static str = "notify";
///     type Context = AppState;
///
///     async fn perform(self, ctx: &AppState) -> JobResult {
///         ctx.transport.send_raw(&[self.address], "Notification", &self.text).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Unique identifier for this job type (e.g. `"sesmail::send_email"`).
    const JOB_TYPE: &'static str;

    /// Worker context provided at execution time.
    type Context: Send + Sync + 'static;

    /// Default options for this job type. Override to customise.
    fn default_opts() -> JobOpts {
        JobOpts::default()
    }

    /// Execute the job.
    async fn perform(self, ctx: &Self::Context) -> JobResult;
}

/// Convenience alias for the return type of [`Job::perform`].
pub type JobResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Backend-agnostic queue storage.
///
/// Implement this trait to plug in any persistence layer (in-memory,
/// Postgres, Redis, SQS, etc.). The [`Worker`](super::Worker) polls a
/// `QueueProvider`, handles all state transitions (retry, completion),
/// and calls `update` with the modified entry.
#[async_trait]
pub trait QueueProvider: Send + Sync + Clone + 'static {
    /// Insert a new job entry into the queue.
    async fn insert(&self, entry: &JobEntry) -> Result<(), JobError>;

    /// Atomically claim the next eligible job (status=pending, run_at <= now).
    ///
    /// The implementation must:
    /// - Select a pending job with `run_at <= now`
    /// - Set `status` to `Running`, `locked_at` to now, `locked_by` to the
    ///   worker id, and increment `attempts`
    /// - Return `None` when no eligible jobs exist
    ///
    /// For Postgres, this is the `SELECT ... FOR UPDATE SKIP LOCKED` pattern.
    async fn claim_next(&self, worker_id: &str) -> Result<Option<JobEntry>, JobError>;

    /// Persist an updated job entry. The [`Worker`](super::Worker) sets all
    /// fields (status, timestamps, etc.) before calling this — the
    /// implementation only needs to write the entry back by id.
    async fn update(&self, entry: &JobEntry) -> Result<(), JobError>;
}
