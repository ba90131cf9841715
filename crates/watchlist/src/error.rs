use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid channel name: {raw:?}")]
    InvalidChannel { raw: String },

    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_channel(raw: impl Into<String>) -> Self {
        Self::InvalidChannel { raw: raw.into() }
    }

    #[must_use]
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }
}

impl livewatch_common::FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

livewatch_common::impl_context!();

pub type Result<T> = std::result::Result<T, Error>;
