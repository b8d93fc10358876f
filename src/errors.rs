use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed check-update entry `{entry}`: {reason}")]
    MalformedUpdate { entry: String, reason: &'static str },

    #[error("check-update output ends with an incomplete entry `{0}`")]
    TruncatedUpdate(String),

    #[error("failed to query for updates: {0}")]
    Fetch(#[from] io::Error),

    #[error("version cache lock poisoned")]
    CachePoisoned,

    #[error("could not find package {0}")]
    NotInstalled(String),

    #[error("failed to update {package} to version {expected}, got version {actual} instead")]
    VersionMismatch {
        package: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
