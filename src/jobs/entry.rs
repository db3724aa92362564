use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Status of a job in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Options controlling retry and scheduling for a job.
#[derive(Debug, Clone)]
pub struct JobOpts {
    /// Maximum number of attempts (including the first).
    pub max_attempts: i32,
    /// Delay before the job becomes eligible for processing.
    pub delay: Option<std::time::Duration>,
}

impl Default for JobOpts {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: None,
        }
    }
}

/// Serialized representation of a queued job.
///
/// This is the unit of work stored in any queue backend. All fields map
/// directly to database columns when using a persistent backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    pub id: Uuid,
    pub job_type: String,
    pub payload: serde_json::Value,
    pub status: JobStatus,
    pub attempts: i32,
    pub max_attempts: i32,
    pub run_at: OffsetDateTime,
    pub locked_at: Option<OffsetDateTime>,
    pub locked_by: Option<String>,
    pub last_error: Option<String>,
    pub created_at: OffsetDateTime,
    pub completed_at: Option<OffsetDateTime>,
}
