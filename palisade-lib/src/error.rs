use thiserror::Error;

/// Errors that can occur in the policy engine
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Site config read before load()")]
    ConfigNotLoaded,

    #[error("Site config already loaded")]
    ConfigImmutable,

    #[error("Malformed request path: {0:?}")]
    MalformedPath(String),

    #[error("No upstream configured")]
    NoUpstream,
}

pub type Result<T> = std::result::Result<T, PolicyError>;
