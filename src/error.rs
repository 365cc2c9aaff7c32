use thiserror::Error;

/// Errors surfaced by the discovery engine.
///
/// Of these, only [`FinderError::NoClassesFound`] and [`FinderError::WorkerPool`]
/// reach a caller of [`crate::finder::ClassFinder`]; the others are raised by the
/// class-file reader and contained by the loader at file scope.
#[derive(Error, Debug)]
pub enum FinderError {
    /// Discovery finished without accepting a single class and the finder was
    /// configured to treat that as an error.
    #[error("Didn't find any classes")]
    NoClassesFound,

    /// A class-file blob could not be decoded.
    #[error("Unreadable class record: {reason}")]
    UnreadableRecord { reason: String },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinderError {
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::UnreadableRecord {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = FinderError> = std::result::Result<T, E>;
