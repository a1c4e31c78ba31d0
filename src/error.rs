use thiserror::Error;

/// Misuse of a [`ChatCore`](crate::chat::ChatCore) session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("chat session is not open")]
    SessionNotOpen,

    #[error("chat session was closed")]
    SessionClosed,

    #[error("transport failed to start: {0}")]
    Transport(String),
}

/// Errors while reading the JSON config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
