use thiserror::Error;

/// Failure writing to the ephemeral session store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session storage unavailable")]
    Unavailable,

    #[error("Session storage rejected write to {key}: {message}")]
    WriteRejected { key: String, message: String },
}

/// Session configuration that could not be read or does not hold together
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Invalid(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("{0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
