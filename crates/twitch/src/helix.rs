//! Helix response shapes. Only the fields the notifier reads.

use {
    chrono::{DateTime, Utc},
    serde::Deserialize,
};

/// Helix wraps every list response in `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelixStream {
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_name: String,
    /// `"live"`, or empty after an error.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title: String,
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelixGame {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_page_deserializes() {
        let json = r#"{
            "data": [{
                "id": "40952121085",
                "user_id": "101051819",
                "user_login": "afro",
                "user_name": "Afro",
                "game_id": "32982",
                "game_name": "Grand Theft Auto V",
                "type": "live",
                "title": "Jacob: Digital Den Laptops & Routers",
                "viewer_count": 1490,
                "started_at": "2021-03-31T20:57:26Z",
                "language": "en",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_afro-{width}x{height}.jpg",
                "tag_ids": [],
                "is_mature": false
            }],
            "pagination": {}
        }"#;
        let page: Page<HelixStream> = serde_json::from_str(json).unwrap();
        let stream = &page.data[0];
        assert_eq!(stream.kind, "live");
        assert_eq!(stream.viewer_count, 1490);
        assert_eq!(stream.started_at.to_rfc3339(), "2021-03-31T20:57:26+00:00");
    }

    #[test]
    fn empty_game_fields_are_tolerated() {
        let json = r#"{"data":[{"id":"1","user_id":"2","user_login":"x","user_name":"X",
            "title":"t","viewer_count":0,"started_at":"2024-01-01T00:00:00Z","thumbnail_url":""}]}"#;
        let page: Page<HelixStream> = serde_json::from_str(json).unwrap();
        assert!(page.data[0].game_id.is_empty());
    }

    #[test]
    fn missing_data_is_empty() {
        let page: Page<HelixUser> = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_empty());
    }
}
