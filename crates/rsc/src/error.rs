use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("not a resource container (magic mismatch)")]
    MagicMismatch,

    #[error("header truncated: {got} bytes, need {need}")]
    HeaderTruncated { got: usize, need: usize },

    #[error("payload decompression failed: {0}")]
    DecompressionFailed(#[from] std::io::Error),

    #[error("decompressed payload too short: got {got} bytes, need {need}")]
    DecompressedTooShort { got: usize, need: usize },
}
