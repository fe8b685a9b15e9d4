use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed hint payload: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type HalResult<T> = std::result::Result<T, HalError>;
