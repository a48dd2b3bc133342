//! Pipeline error types.

/// Specific error conditions for pipeline and collaborator operations.
///
/// Most of these are recovered internally via per-stage fallbacks; they
/// surface to callers only through logs and lower confidence scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// The analysis collaborator could not be reached
    #[display("Collaborator unavailable: {}", _0)]
    CollaboratorUnavailable(String),
    /// A collaborator call exceeded its deadline
    #[display("Task '{}' timed out after {}s", task, seconds)]
    Timeout {
        /// Task type submitted to the collaborator
        task: String,
        /// Deadline in seconds
        seconds: u64,
    },
    /// The collaborator reported a failed job
    #[display("Job '{}' failed: {}", job_id, message)]
    JobFailed {
        /// Collaborator-issued job id
        job_id: String,
        /// Error reported by the collaborator
        message: String,
    },
    /// A response could not be parsed even after tolerant extraction
    #[display("Malformed collaborator response: {}", _0)]
    MalformedResponse(String),
    /// A completed job carried no result payload
    #[display("Job '{}' completed without a result", _0)]
    MissingResult(String),
}

/// Error type for pipeline operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
