//! TMDB (The Movie Database) API client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use serde_json::Value;
use tracing::debug;

use crate::MetadataError;
use crate::provider::{IdentityApi, MediaApi, Upstream, Verb};

pub const BASE_URL: &str = "https://api.themoviedb.org/3";
pub const LANGUAGE: &str = "en-US";

/// How requests authenticate against TMDB.
#[derive(Clone)]
pub enum Credential {
    /// v4 read access token, sent as `Authorization: Bearer`. Server side only.
    Bearer(String),
    /// v3 api key, sent as the `api_key` query parameter.
    ApiKey(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    credential: Credential,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            base_url: BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at another API root (a proxy or a local fake).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        params: &[(&str, String)],
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, method = %method, "TMDB request");

        let mut req = self.client.request(method, &url);
        match &self.credential {
            Credential::Bearer(token) => req = req.bearer_auth(token),
            Credential::ApiKey(key) => req = req.query(&[("api_key", key.as_str())]),
        }
        req.query(params)
    }
}

#[async_trait::async_trait]
impl MediaApi for TmdbClient {
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, MetadataError> {
        let mut all_params = vec![("language", LANGUAGE.to_string())];
        all_params.extend_from_slice(params);

        let resp = self
            .request(reqwest::Method::GET, path, &all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "TMDB returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl IdentityApi for TmdbClient {
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Upstream, MetadataError> {
        let method = match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Delete => reqwest::Method::DELETE,
        };

        let mut req = self.request(method, path, query);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.json().await.map_err(|e| MetadataError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        Ok(Upstream { status, body })
    }
}
