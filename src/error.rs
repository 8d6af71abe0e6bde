use thiserror::Error;

/// Errors raised by the tree containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The element is already stored; the tree is left untouched.
    #[error("element already present in tree")]
    DuplicateElement,

    /// A structural operation needed a subtree that does not exist.
    #[error("operation requires a non-empty subtree")]
    EmptySubtree,

    /// Balance bookkeeping produced a shape no rotation case covers.
    #[error("no rotation case matches the imbalance at the pivot")]
    UnreachableRotationCase,

    #[error("missing length prefix")]
    MissingLength,

    #[error("invalid length prefix {0:?}")]
    InvalidLength(String),

    #[error("cannot parse element {position} from {token:?}")]
    InvalidElement { position: usize, token: String },

    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}
