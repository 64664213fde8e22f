//! Error types for the managed runtime

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Runtime error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// No class registered under this binary name
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// A class with this binary name is already registered
    #[error("Class already defined: {0}")]
    DuplicateClass(String),

    /// Member lookup by name failed
    #[error("No such member: {0}")]
    NoSuchMember(String),

    /// Non-public member used through a reference that was never made accessible
    #[error("Illegal access: {member} is {visibility} and not accessible")]
    IllegalAccess {
        /// Member description
        member: String,
        /// Visibility keyword of the member
        visibility: String,
    },

    /// Type mismatch during argument or value conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {member}: expected {expected}, got {got}")]
    ArgumentCount {
        /// Member description
        member: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Instance member used without a receiver
    #[error("Null receiver for instance member {0}")]
    NullReceiver(String),

    /// Write to a final field that cannot be modified
    #[error("Cannot modify final field {0}")]
    FinalField(String),

    /// Interfaces cannot be instantiated
    #[error("Cannot instantiate {0}")]
    NotInstantiable(String),

    /// Raised by a member body
    #[error("{0}")]
    Thrown(String),
}

impl From<String> for RuntimeError {
    fn from(s: String) -> Self {
        RuntimeError::Thrown(s)
    }
}

impl From<&str> for RuntimeError {
    fn from(s: &str) -> Self {
        RuntimeError::Thrown(s.to_string())
    }
}
