//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, JsonError, PipelineError, SupervisorError, TaxonomyError};

/// This is the foundation error enum for the Callsheet workspace.
///
/// # Examples
///
/// ```
/// use callsheet_error::{CallsheetError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: CallsheetError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CallsheetErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Taxonomy registry error
    #[from(TaxonomyError)]
    Taxonomy(TaxonomyError),
    /// Supervisor rule error
    #[from(SupervisorError)]
    Supervisor(SupervisorError),
    /// Pipeline/collaborator error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Callsheet error with kind discrimination.
///
/// # Examples
///
/// ```
/// use callsheet_error::{CallsheetResult, ConfigError};
///
/// fn might_fail() -> CallsheetResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Callsheet Error: {}", _0)]
pub struct CallsheetError(Box<CallsheetErrorKind>);

impl CallsheetError {
    /// Create a new error from a kind.
    pub fn new(kind: CallsheetErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CallsheetErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to CallsheetErrorKind
impl<T> From<T> for CallsheetError
where
    T: Into<CallsheetErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Callsheet operations.
///
/// # Examples
///
/// ```
/// use callsheet_error::{CallsheetResult, HttpError};
///
/// fn fetch_status() -> CallsheetResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type CallsheetResult<T> = std::result::Result<T, CallsheetError>;
