pub type Result<T> = std::result::Result<T, ContainerError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// Insert position outside `[0, len]`.
    #[error("index {index} out of range for array of length {len}")]
    OutOfRange { index: usize, len: usize },
    /// Non-fatal: the key has no node in its bucket's chain.
    #[error("no key found for {0}")]
    KeyNotFound(String),
    #[error("capacity must be at least 1")]
    InvalidCapacity,
}

impl ContainerError {
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound(key.into())
    }
}
