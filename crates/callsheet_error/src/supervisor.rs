//! Supervisor error types.

/// Specific error conditions for supervisor rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SupervisorErrorKind {
    /// Failed to read the rule file
    #[display("Failed to read supervisor rules: {}", _0)]
    FileRead(String),
    /// Failed to parse TOML content
    #[display("Failed to parse supervisor TOML: {}", _0)]
    TomlParse(String),
    /// The loaded rule set contains no rules
    #[display("Supervisor rule set cannot be empty")]
    EmptyRuleSet,
    /// A rule carries a confidence outside [0, 1]
    #[display("Rule at priority {} has confidence {} outside [0, 1]", priority, value)]
    InvalidConfidence {
        /// Priority of the offending rule
        priority: i32,
        /// The out-of-range value
        value: String,
    },
}

/// Error type for supervisor operations.
///
/// Supervisor errors are configuration errors: they abort a pipeline run
/// before a final report is produced, never silently.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Supervisor Error: {} at line {} in {}", kind, line, file)]
pub struct SupervisorError {
    /// The specific error condition
    pub kind: SupervisorErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SupervisorError {
    /// Create a new SupervisorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SupervisorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
