use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid settings file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not serialize job manifest: {0}")]
    Manifest(#[from] toml::ser::Error),

    #[error("invalid {field}: {value:?}")]
    InvalidDimension { field: &'static str, value: String },

    #[error("could not write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
