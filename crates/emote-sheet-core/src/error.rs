use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid group pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Missing configuration key `{key}`: set it globally or in the matching group")]
    MissingConfig { key: &'static str },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to build")]
    Empty,
}

pub type Result<T> = std::result::Result<T, SheetError>;
