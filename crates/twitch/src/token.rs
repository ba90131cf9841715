use std::time::{Duration, Instant};

use secrecy::Secret;

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Cached app access token from the client-credentials grant.
#[derive(Clone)]
pub(crate) struct AppToken {
    pub value: Secret<String>,
    pub expires_at: Instant,
}

impl AppToken {
    pub fn new(value: String, expires_in_secs: u64, now: Instant) -> Self {
        Self {
            value: Secret::new(value),
            // An out-of-range lifetime counts as already expired.
            expires_at: now
                .checked_add(Duration::from_secs(expires_in_secs))
                .unwrap_or(now),
        }
    }

    pub fn is_usable(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_refreshed_inside_margin() {
        let now = Instant::now();
        let token = AppToken::new("abc".into(), 3600, now);
        assert!(token.is_usable(now));
        assert!(token.is_usable(now + Duration::from_secs(3500)));
        assert!(!token.is_usable(now + Duration::from_secs(3541)));
    }

    #[test]
    fn short_lived_token_is_never_usable() {
        let now = Instant::now();
        assert!(!AppToken::new("abc".into(), 30, now).is_usable(now));
    }

    #[test]
    fn absurd_lifetime_forces_refresh() {
        let now = Instant::now();
        assert!(!AppToken::new("abc".into(), u64::MAX, now).is_usable(now));
    }
}
