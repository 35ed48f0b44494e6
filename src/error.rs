use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An algorithm selector that names none of the known engines.
    #[error("unknown sorting algorithm: {0:?} (expected bubble, quick or merge)")]
    UnknownAlgorithm(String),

    #[error("unknown execution mode: {0:?} (expected auto or step)")]
    UnknownMode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid array values: {0}")]
    InvalidValues(String),

    #[error("failed to spawn sorting worker")]
    Spawn(#[source] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
