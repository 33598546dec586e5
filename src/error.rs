//! Error types for the generation engine.

/// An error raised while configuring or running a generation.
///
/// Every variant is a caller mistake: bad configuration, bad ranges, or
/// mismatched sampler inputs. An empty performance is not an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid time signature {notes_per_bar}/{note_value}")]
    InvalidTimeSignature { notes_per_bar: u32, note_value: u32 },
    #[error("invalid key range [{lower}, {upper}]")]
    InvalidKeyRange { lower: i32, upper: i32 },
    #[error("config error: {0}")]
    Config(String),
}

impl GenerationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GenerationError>;
