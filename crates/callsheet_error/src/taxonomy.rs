//! Taxonomy error types.

/// Specific error conditions for taxonomy registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TaxonomyErrorKind {
    /// Failed to read the registry file
    #[display("Failed to read taxonomy file: {}", _0)]
    FileRead(String),
    /// Failed to parse TOML content
    #[display("Failed to parse taxonomy TOML: {}", _0)]
    TomlParse(String),
    /// A rule references a category that is not part of the taxonomy
    #[display("Unknown category '{}' in taxonomy", _0)]
    UnknownCategory(String),
    /// A category has no rule in the registry
    #[display("Category '{}' has no classification rule", _0)]
    MissingRule(String),
    /// A regular expression in a rule failed to compile
    #[display("Invalid pattern '{}' for category '{}': {}", pattern, category, message)]
    InvalidPattern {
        /// The offending pattern source
        pattern: String,
        /// Category whose rule contains the pattern
        category: String,
        /// Compiler error message
        message: String,
    },
    /// A confidence threshold is outside [0, 1]
    #[display("Confidence threshold {} for category '{}' is outside [0, 1]", value, category)]
    InvalidThreshold {
        /// Category whose rule carries the threshold
        category: String,
        /// The out-of-range value
        value: String,
    },
}

/// Error type for taxonomy registry operations.
///
/// # Examples
///
/// ```
/// use callsheet_error::{TaxonomyError, TaxonomyErrorKind};
///
/// let err = TaxonomyError::new(TaxonomyErrorKind::UnknownCategory("gadgets".into()));
/// assert!(format!("{}", err).contains("gadgets"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Taxonomy Error: {} at line {} in {}", kind, line, file)]
pub struct TaxonomyError {
    /// The specific error condition
    pub kind: TaxonomyErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TaxonomyError {
    /// Create a new TaxonomyError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TaxonomyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
