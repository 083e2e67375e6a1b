use std::path::{Path, PathBuf};

pub type SampleResult<T> = Result<T, SampleError>;

/// Why a slide's colour could not be sampled. Never shown to the user: the
/// slide simply keeps the default theme colour.
#[derive(thiserror::Error, Debug)]
pub enum SampleError {
    #[error("read error: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode error: {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("empty image: {}", path.display())]
    Empty { path: PathBuf },

    #[error("sampling interrupted before completion")]
    Interrupted,
}

impl SampleError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn decode(path: &Path, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn empty(path: &Path) -> Self {
        Self::Empty {
            path: path.to_path_buf(),
        }
    }
}
