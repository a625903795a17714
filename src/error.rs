/// Represents either success(T) or an failure ([`ModeError`])
pub type Result<T> = std::result::Result<T, ModeError>;

/// Coarse classification of a [`ModeError`], separating caller bugs from expected failures
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// the caller violated the contract of the mode (lengths, sizes, aliasing)
    Precondition,
    /// the requested mode exists only as a placeholder
    Unsupported,
    /// an authenticated mode rejected its input, this is an expected runtime outcome
    Authentication,
}

/// Represents an error which has occured while setting up or running a mode of operation
#[derive(PartialEq, Eq, Debug, thiserror::Error)]
pub enum ModeError {
    /// IV or nonce does not have the length required by the mode
    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    /// key material does not have the length required by the mode or primitive
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// the block primitive has a block size the mode cannot work with
    #[error("invalid block size: expected {expected} bytes, got {actual}")]
    InvalidBlockSize { expected: usize, actual: usize },

    /// block mode input is not a whole number of blocks
    #[error("input of {len} bytes is not a multiple of the block size {block_size}")]
    NotBlockAligned { len: usize, block_size: usize },

    /// destination cannot hold the result
    #[error("output buffer of {actual} bytes is too small, {needed} bytes are needed")]
    OutputTooSmall { needed: usize, actual: usize },

    /// source and destination windows partially overlap
    #[error("source and destination buffers partially overlap")]
    BufferOverlap,

    /// CCM nonce size outside of 7..=13
    #[error("invalid CCM nonce size {0}")]
    InvalidNonceSize(usize),

    /// CCM tag size not an even value in 4..=16
    #[error("invalid CCM tag size {0}")]
    InvalidTagSize(usize),

    /// feedback segment does not fit the block of the primitive
    #[error("segment of {segment} bytes does not fit block size {block_size}")]
    InvalidSegmentSize { segment: usize, block_size: usize },

    /// the message exceeds what the length encoding of the mode can express
    #[error("message of {len} bytes exceeds the maximum of {max} bytes")]
    MessageTooLong { len: usize, max: usize },

    /// mode is known but intentionally not implemented
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// the primitive factory refused to build a cipher from derived key material
    #[error("unable to construct block cipher: {0}")]
    KeyConstruction(String),

    /// authenticated decryption failed, the output has been wiped
    #[error("message authentication failed")]
    AuthenticationFailure,
}

impl ModeError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModeError::AuthenticationFailure => ErrorKind::Authentication,
            ModeError::Unsupported(_) => ErrorKind::Unsupported,
            _ => ErrorKind::Precondition,
        }
    }

    /// True if the error stems from a contract violation by the caller.
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }

    /// True if authenticated decryption rejected the input.
    pub fn is_authentication_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}
