//! Error types for reflective access

use strata_runtime::RuntimeError;
use thiserror::Error;

use crate::constraint::{ConstraintResult, Verdict};
use crate::signature::SignatureError;
use crate::version::VersionError;

/// Result type for reflective operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Reflective access errors
///
/// Errors are `Clone` so a failed handle can report its recorded error on
/// every later access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReflectError {
    /// Declaration does not match the declaration grammar
    #[error("Malformed signature `{declaration}`: {reason}")]
    MalformedSignature {
        /// Declaration as written
        declaration: String,
        /// What did not match
        reason: String,
    },

    /// A type name could not be mapped through the import table
    #[error("Unresolved type `{name}` in `{declaration}`")]
    UnresolvedType {
        /// Declaration as written
        declaration: String,
        /// Type token that failed to resolve
        name: String,
    },

    /// No candidate class name exists in the running platform
    #[error("Class not found: tried {}", .names.join(", "))]
    ClassNotFound {
        /// Effective names that were looked up
        names: Vec<String>,
    },

    /// No member of the owner matched the declaration
    #[error("No member matching `{member}` in {owner}")]
    MemberNotFound {
        /// Owning class
        owner: String,
        /// Member declaration
        member: String,
    },

    /// More than one member shares the best rank
    #[error("Ambiguous member `{member}` in {owner}: {}", .candidates.join(", "))]
    AmbiguousMember {
        /// Owning class
        owner: String,
        /// Member declaration
        member: String,
        /// Equally ranked candidates
        candidates: Vec<String>,
    },

    /// A constraint rejected the resolved candidate
    #[error("Constraint {constraint} rejected {member}: {reason}")]
    ConstraintViolation {
        /// Candidate member
        member: String,
        /// `category/name` of the failing constraint
        constraint: String,
        /// Reason given by the constraint
        reason: String,
    },

    /// The underlying member access failed
    #[error("Invocation of {member} failed: {source}")]
    InvocationError {
        /// Member being accessed
        member: String,
        /// Runtime failure
        #[source]
        source: RuntimeError,
    },

    /// A value or receiver has the wrong type
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// The proxy method cannot be called in this binding state
    #[error("Unsupported proxy call {method}: {reason}")]
    UnsupportedProxyCall {
        /// Interface method
        method: String,
        /// Why it cannot be called
        reason: String,
    },

    /// The capability interface declares no such method
    #[error("Capability interface {interface} has no method {method}")]
    UnknownProxyMethod {
        /// Interface name
        interface: String,
        /// Requested method
        method: String,
    },

    /// Every alternative of an aggregate handle failed
    #[error("No alternative resolved: {}", join_errors(.0))]
    NoAlternative(Vec<ReflectError>),

    /// Version error
    #[error(transparent)]
    Version(#[from] VersionError),
}

fn join_errors(errors: &[ReflectError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ReflectError {
    /// Wrap a runtime failure raised while accessing `member`
    pub fn invocation(member: impl Into<String>, source: RuntimeError) -> Self {
        ReflectError::InvocationError {
            member: member.into(),
            source,
        }
    }

    /// Constraint failure recorded against `member`
    pub(crate) fn violation(member: impl Into<String>, failure: ConstraintResult) -> Self {
        let constraint = failure.id();
        let reason = match failure.verdict {
            Verdict::Fail(reason) => reason,
            Verdict::Pass | Verdict::NotApplicable => String::new(),
        };
        ReflectError::ConstraintViolation {
            member: member.into(),
            constraint,
            reason,
        }
    }
}

impl From<SignatureError> for ReflectError {
    fn from(e: SignatureError) -> Self {
        match e {
            SignatureError::Malformed {
                declaration,
                reason,
            } => ReflectError::MalformedSignature {
                declaration,
                reason,
            },
            SignatureError::UnresolvedType { declaration, name } => {
                ReflectError::UnresolvedType { declaration, name }
            }
        }
    }
}
