//! Client for the same-origin session endpoints under `/api/auth`.

use metamoviex_core::types::{Contributor, Timeframe, User};
use metamoviex_metadata::models::{RequestToken, SessionCreated, StatusReply};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::ClientError;

/// The four session operations plus the leaderboard, as seen from the client.
#[async_trait::async_trait]
pub trait BridgeApi: Send + Sync {
    async fn request_token(&self) -> Result<RequestToken, ClientError>;

    async fn create_session(&self, token: &str) -> Result<SessionCreated, ClientError>;

    async fn login_user(&self) -> Result<User, ClientError>;

    async fn delete_session(&self) -> Result<StatusReply, ClientError>;

    async fn leaderboard(&self, timeframe: Timeframe) -> Result<Vec<Contributor>, ClientError>;
}

/// reqwest-backed bridge client.
///
/// Keeps a cookie store so the `tmdb_session` cookie set by
/// `create-session` rides along on later calls, the way a browser would.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    base: Url,
    client: reqwest::Client,
}

impl HttpBridge {
    /// `base` is the origin serving `/api`, optionally with a path prefix
    /// (`https://host/app`); endpoints resolve beneath it.
    pub fn new(mut base: Url) -> Result<Self, ClientError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { base, client })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .or_else(|| body["status_message"].as_str())
                .unwrap_or("request failed")
                .to_string();
            return Err(ClientError::Bridge {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_value(body).map_err(|e| ClientError::Bridge {
            status: status.as_u16(),
            message: format!("unexpected body: {e}"),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = self.url(path)?;
        debug!(url = %url, "bridge request");
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read(resp).await
    }
}

#[async_trait::async_trait]
impl BridgeApi for HttpBridge {
    async fn request_token(&self) -> Result<RequestToken, ClientError> {
        self.get("api/auth/request-token", &[]).await
    }

    async fn create_session(&self, token: &str) -> Result<SessionCreated, ClientError> {
        self.get("api/auth/create-session", &[("token", token)])
            .await
    }

    async fn login_user(&self) -> Result<User, ClientError> {
        self.get("api/auth/login-user", &[]).await
    }

    async fn delete_session(&self) -> Result<StatusReply, ClientError> {
        let url = self.url("api/auth/delete-session")?;
        debug!(url = %url, "bridge request");
        let resp = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read(resp).await
    }

    async fn leaderboard(&self, timeframe: Timeframe) -> Result<Vec<Contributor>, ClientError> {
        self.get("api/leaderboard", &[("timeframe", timeframe.as_str())])
            .await
    }
}
