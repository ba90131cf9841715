use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Serenity(#[from] serenity::Error),

    #[error("discord.{field} is not configured")]
    MissingSetting { field: &'static str },
}

impl Error {
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingSetting { field }
    }
}

/// Whether Discord answered 404, e.g. Unknown Message.
pub fn is_not_found(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(http) => http.status_code().is_some_and(|s| s.as_u16() == 404),
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, Error>;
