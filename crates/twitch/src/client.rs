use std::time::Instant;

use {
    async_trait::async_trait,
    livewatch_common::ChannelId,
    livewatch_config::TwitchConfig,
    livewatch_notify::{LiveSnapshot, LiveStatusSource, SourceError},
    reqwest::StatusCode,
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    tokio::sync::Mutex,
    tracing::debug,
    url::Url,
};

use crate::{
    error::{Error, Result},
    helix::{HelixGame, HelixStream, HelixUser, Page, TokenResponse},
    token::AppToken,
};

/// Helix API client authenticated with an app access token.
pub struct HelixClient {
    http: reqwest::Client,
    api_base: String,
    auth_base: String,
    client_id: String,
    client_secret: Secret<String>,
    token: Mutex<Option<AppToken>>,
}

impl HelixClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        api_base: &str,
        auth_base: &str,
    ) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            api_base: normalize_base(api_base)?,
            auth_base: normalize_base(auth_base)?,
            client_id: client_id.into(),
            client_secret,
            token: Mutex::new(None),
        })
    }

    pub fn from_config(config: &TwitchConfig) -> Result<Self> {
        if config.client_id.trim().is_empty() {
            return Err(Error::missing("client_id"));
        }
        let secret = config
            .client_secret
            .clone()
            .filter(|s| !s.expose_secret().trim().is_empty())
            .ok_or_else(|| Error::missing("client_secret"))?;
        Self::new(&config.client_id, secret, &config.api_base, &config.auth_base)
    }

    /// `GET /users?login=`. `None` when no such account exists.
    pub async fn user_by_login(&self, login: &str) -> Result<Option<HelixUser>> {
        let users: Vec<HelixUser> = self.get("users", &[("login", login)]).await?;
        Ok(users.into_iter().next())
    }

    /// `GET /streams?user_id=`. `None` while the user is offline.
    pub async fn stream_by_user_id(&self, user_id: &str) -> Result<Option<HelixStream>> {
        let streams: Vec<HelixStream> = self.get("streams", &[("user_id", user_id)]).await?;
        Ok(streams.into_iter().next())
    }

    /// `GET /games?id=`.
    pub async fn game_by_id(&self, game_id: &str) -> Result<Option<HelixGame>> {
        let games: Vec<HelixGame> = self.get("games", &[("id", game_id)]).await?;
        Ok(games.into_iter().next())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let url = format!("{}/{path}", self.api_base);
        let token = self.access_token(false).await?;
        let mut resp = self.send_get(&url, query, &token).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!(path, "app token rejected, requesting a new one");
            let token = self.access_token(true).await?;
            resp = self.send_get(&url, query, &token).await?;
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::status(format!("GET /{path}"), status, body));
        }
        let page: Page<T> = resp.json().await?;
        Ok(page.data)
    }

    async fn send_get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &Secret<String>,
    ) -> Result<reqwest::Response> {
        Ok(self
            .http
            .get(url)
            .query(query)
            .header("Client-Id", &self.client_id)
            .bearer_auth(token.expose_secret())
            .send()
            .await?)
    }

    async fn access_token(&self, force_refresh: bool) -> Result<Secret<String>> {
        let mut cached = self.token.lock().await;
        if !force_refresh
            && let Some(token) = cached.as_ref()
            && token.is_usable(Instant::now())
        {
            return Ok(token.value.clone());
        }

        let resp = self
            .http
            .post(format!("{}/oauth2/token", self.auth_base))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret().as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::status("POST /oauth2/token", status, body));
        }
        let body: TokenResponse = resp.json().await?;
        debug!(expires_in = body.expires_in, "obtained twitch app token");

        let token = AppToken::new(body.access_token, body.expires_in, Instant::now());
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

fn normalize_base(raw: &str) -> Result<String> {
    let url = Url::parse(raw)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[async_trait]
impl LiveStatusSource for HelixClient {
    async fn live_snapshot(
        &self,
        channel: &ChannelId,
    ) -> std::result::Result<Option<LiveSnapshot>, SourceError> {
        let Some(user) = self.user_by_login(channel.as_str()).await? else {
            debug!(channel = %channel, "no twitch account with this login");
            return Ok(None);
        };
        let Some(stream) = self.stream_by_user_id(&user.id).await? else {
            return Ok(None);
        };

        Ok(Some(LiveSnapshot {
            display_name: user.display_name,
            title: stream.title,
            category_id: non_empty(stream.game_id),
            category_name: non_empty(stream.game_name),
            viewer_count: stream.viewer_count,
            started_at: stream.started_at,
            thumbnail_url_template: stream.thumbnail_url,
            avatar_url: non_empty(user.profile_image_url),
        }))
    }

    async fn category_name(
        &self,
        category_id: &str,
    ) -> std::result::Result<Option<String>, SourceError> {
        Ok(self.game_by_id(category_id).await?.map(|g| g.name))
    }
}
