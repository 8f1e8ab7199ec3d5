use thiserror::Error;

/// Recoverable outcomes of tree operations. None of them mutates the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AvlError {
    #[error("key {0} is already present")]
    DuplicateKey(i64),

    #[error("key {0} is not present")]
    KeyNotFound(i64),

    /// The pivot of a join does not lie strictly between the two key sets.
    #[error("pivot key {0} does not separate the joined trees")]
    NonSeparatingPivot(i64),
}
