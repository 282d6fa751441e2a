use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// SQLSTATE codes the taxonomy distinguishes.
const INSUFFICIENT_PRIVILEGE: &str = "42501";
const DUPLICATE_OBJECT: &str = "42710";
const UNIQUE_VIOLATION: &str = "23505";
const UNDEFINED_DATABASE: &str = "3D000";

/// Failure taxonomy for a provisioning run.
///
/// Nothing is caught or retried; every variant propagates to `main` and
/// terminates the process with a non-zero exit status.
#[derive(Debug, ThisError)]
pub enum ProvisionError {
    /// A required environment variable is missing, empty, or malformed.
    /// Raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Administrative credentials rejected, or the server is unreachable.
    #[error("administrative authentication failed: {0}")]
    Authentication(#[source] SqlxError),

    /// The administrative identity may not create users.
    #[error("administrative identity lacks privilege: {0}")]
    Authorization(#[source] SqlxError),

    /// The user already exists, or the role scope is invalid.
    #[error("user creation rejected: {0}")]
    UserCreation(#[source] SqlxError),

    /// Anything the taxonomy does not classify.
    #[error("database error: {0}")]
    Database(#[from] SqlxError),
}

impl ProvisionError {
    /// Classify a failure raised while establishing the administrative
    /// session. Connection-level breakdowns and SQLSTATE class 28 both
    /// count as authentication failures.
    pub(crate) fn session(err: SqlxError) -> Self {
        match &err {
            SqlxError::Io(_) | SqlxError::Tls(_) => Self::Authentication(err),
            SqlxError::Database(db) if db.code().as_deref().is_some_and(auth_rejected) => {
                Self::Authentication(err)
            }
            _ => Self::Database(err),
        }
    }

    /// Classify a failure raised by the user-creation statement plan.
    pub(crate) fn user_creation(err: SqlxError) -> Self {
        let code = match &err {
            SqlxError::Database(db) => db.code().map(|c| c.into_owned()),
            _ => None,
        };
        match code.as_deref() {
            Some(INSUFFICIENT_PRIVILEGE) => Self::Authorization(err),
            Some(DUPLICATE_OBJECT | UNIQUE_VIOLATION | UNDEFINED_DATABASE) => {
                Self::UserCreation(err)
            }
            _ => Self::Database(err),
        }
    }
}

/// SQLSTATE class 28: invalid authorization specification (28000) and
/// invalid password (28P01).
fn auth_rejected(code: &str) -> bool {
    code.starts_with("28")
}
