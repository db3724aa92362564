//! Background job queue with pluggable backends and retry.
//!
//! Queued mail dispatch hands a serialized send off to this queue; a
//! [`Worker`] picks it up and performs the delivery out of band.
//!
//! # Architecture
//!
//! - [`Job`] — Serializable job trait combining data (payload) with behaviour (`perform`).
//! - [`JobEntry`] — The serialized representation of a queued job. Maps directly to a
//!   database row when using a persistent backend.
//! - [`QueueProvider`] — Backend-agnostic storage trait. Implement for Postgres, Redis, etc.
//! - [`MemoryQueue`] — In-memory provider for development and testing.
//! - [`JobRegistry`] — Maps job type strings to deserialization + execution logic.
//! - [`Worker`] — Generic processor that polls any `QueueProvider` and dispatches jobs.
//!
//! # Quick Start
//!
//! ```ignore
//! // 1. Enqueue a deferred send
//! let job = SendEmailJob::<AppState>::new(destinations, subject, body);
//! enqueue(&queue, job).await?;
//!
//! // 2. Process
//! let registry = JobRegistry::new().register::<SendEmailJob<AppState>>();
//! Worker::new(queue, registry, app_state).start();
//! ```

mod entry;
mod memory;
mod registry;
mod traits;
mod worker;

pub use entry::{JobEntry, JobOpts, JobStatus};
pub use memory::MemoryQueue;
pub use registry::JobRegistry;
pub use traits::{Job, JobResult, QueueProvider};
pub use worker::Worker;

use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
}

/// Serialize a [`Job`] into a [`JobEntry`] using its default options.
pub fn into_entry<J: Job>(job: &J) -> Result<JobEntry, JobError> {
    into_entry_with(job, J::default_opts())
}

/// Serialize a [`Job`] into a [`JobEntry`] with explicit options.
pub fn into_entry_with<J: Job>(job: &J, opts: JobOpts) -> Result<JobEntry, JobError> {
    let now = OffsetDateTime::now_utc();
    Ok(JobEntry {
        id: Uuid::new_v4(),
        job_type: J::JOB_TYPE.to_string(),
        payload: serde_json::to_value(job)?,
        status: JobStatus::Pending,
        attempts: 0,
        max_attempts: opts.max_attempts,
        run_at: opts.delay.map(|d| now + d).unwrap_or(now),
        locked_at: None,
        locked_by: None,
        last_error: None,
        created_at: now,
        completed_at: None,
    })
}

/// Convenience: serialize a job and insert it into the queue in one call.
pub async fn enqueue<J: Job>(queue: &impl QueueProvider, job: J) -> Result<Uuid, JobError> {
    let entry = into_entry(&job)?;
    let id = entry.id;
    queue.insert(&entry).await?;
    Ok(id)
}

/// Convenience: serialize a job with options and insert it into the queue.
pub async fn enqueue_with<J: Job>(
    queue: &impl QueueProvider,
    job: J,
    opts: JobOpts,
) -> Result<Uuid, JobError> {
    let entry = into_entry_with(&job, opts)?;
    let id = entry.id;
    queue.insert(&entry).await?;
    Ok(id)
}
