use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BorgvaultError {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{0}")]
    Remote(RemoteError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("mount {0}")]
    MountFailure(String),
    #[error("umount {0}")]
    UmountFailure(String),
}

pub type Result<T> = std::result::Result<T, BorgvaultError>;

impl BorgvaultError {
    pub fn message(msg: impl Into<String>) -> Self {
        BorgvaultError::Message(msg.into())
    }
}

impl From<ConfigError> for BorgvaultError {
    fn from(err: ConfigError) -> Self {
        BorgvaultError::Config(err)
    }
}

impl From<RemoteError> for BorgvaultError {
    fn from(err: RemoteError) -> Self {
        BorgvaultError::Remote(err)
    }
}
