#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Task not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("request to the language model failed: {0}")]
    Transport(String),

    #[error("language model returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not decode language model response: {0}")]
    Decode(String),

    #[error("language model returned no text")]
    EmptyReply,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
