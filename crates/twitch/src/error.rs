use {livewatch_notify::SourceError, thiserror::Error};

#[derive(Debug, Error)]
pub enum Error {
    #[error("twitch.{field} is not configured")]
    MissingCredential { field: &'static str },

    #[error("{context} returned HTTP {status}: {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingCredential { field }
    }

    #[must_use]
    pub fn status(context: impl Into<String>, status: reqwest::StatusCode, body: String) -> Self {
        Self::Status {
            context: context.into(),
            status: status.as_u16(),
            body,
        }
    }
}

impl From<Error> for SourceError {
    fn from(err: Error) -> Self {
        SourceError::external("twitch helix", err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
