use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Unsafe archive entry path '{0}'")]
    UnsafePath(String),

    #[error("Destination root '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Destination root '{}' already has an extraction in flight", .0.display())]
    DestinationBusy(PathBuf),

    #[error("Deadline boundaries out of order: {0}")]
    PolicyOrdering(String),

    #[error("Extension produces an inverted deadline interval: {0}")]
    ExtensionInverted(String),

    #[error("Cancelled")]
    Cancelled,
}
