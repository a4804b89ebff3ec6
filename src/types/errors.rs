use thiserror::Error;

// === StoreError ===

/// Which integrity rule a rejected write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A unique index (bookmark url) already holds the value.
    Unique,
    /// The referenced category does not exist.
    ForeignKey,
    /// Any other CHECK / NOT NULL style rejection.
    Other,
}

/// Errors reported by a storage adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The write violated an integrity constraint.
    #[error("Constraint violation: {0:?}")]
    Constraint(ConstraintKind),
    /// Any other database failure.
    #[error("Storage database error: {0}")]
    Database(String),
    /// The blocking storage task panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    TaskFailed(String),
    /// A previous writer panicked while holding the connection.
    #[error("Storage connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Returns `true` if this is a unique-index conflict.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::Constraint(ConstraintKind::Unique))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ffi_err, _) = &err {
            if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation {
                let kind = match ffi_err.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::Unique,
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    _ => ConstraintKind::Other,
                };
                return StoreError::Constraint(kind);
            }
        }
        StoreError::Database(err.to_string())
    }
}

// === EngineError ===

/// Errors returned by the consistency engine's mutation operations.
///
/// A missing target row is not an error: the engine treats it as a benign
/// race with a concurrent delete and returns `Ok(())`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A required field was blank. Never reaches storage.
    #[error("Validation failed: {0}")]
    Validation(&'static str),
    /// The underlying store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

// === SaveBookmarkResult ===

/// Outcome of saving a new bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveBookmarkResult {
    /// The bookmark was inserted.
    Success,
    /// Another bookmark already uses this url. Nothing was written.
    Duplicate,
    /// The url was blank. Nothing was written.
    Invalid,
    /// Any other persistence failure, carrying the cause.
    Storage(StoreError),
}

impl SaveBookmarkResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SaveBookmarkResult::Success)
    }
}

// === SettingsError ===

/// Errors related to engine settings persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred reading or writing the settings file.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// A settings value failed validation.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AppError ===

/// Errors raised while wiring the application together.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to open database: {0}")]
    Database(#[from] rusqlite::Error),
}
