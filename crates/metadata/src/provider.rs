use metamoviex_core::types::{MediaKind, TimeWindow};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::MetadataError;
use crate::models::{
    CombinedCredits, Credits, Genre, GenreList, ImageSet, MediaSummary, MovieDetails, Paged,
    PersonDetails, PersonSummary, ReleaseDates, TvDetails, VideoList, WatchProviders,
};

/// Decode a JSON body into a typed schema, tagging failures with the request path.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, MetadataError> {
    serde_json::from_value(value).map_err(|e| MetadataError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Read-only access to TMDB content.
///
/// Implementors only supply [`MediaApi::get_json`]; every typed endpoint is
/// built on top of it, so fakes in tests can serve canned JSON by path.
#[async_trait::async_trait]
pub trait MediaApi: Send + Sync {
    /// GET `path` (relative to the API root) with extra query parameters.
    async fn get_json(&self, path: &str, params: &[(&str, String)])
    -> Result<Value, MetadataError>;

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, MetadataError> {
        let path = format!("/genre/{kind}/list");
        let list: GenreList = decode(&path, self.get_json(&path, &[]).await?)?;
        Ok(list.genres)
    }

    async fn discover(
        &self,
        kind: MediaKind,
        params: &[(&str, String)],
    ) -> Result<Paged<MediaSummary>, MetadataError> {
        let path = format!("/discover/{kind}");
        decode(&path, self.get_json(&path, params).await?)
    }

    /// Curated lists such as `/movie/popular` or `/tv/airing_today`.
    async fn category(
        &self,
        kind: MediaKind,
        category: &str,
        page: u32,
    ) -> Result<Paged<MediaSummary>, MetadataError> {
        let path = format!("/{kind}/{category}");
        decode(
            &path,
            self.get_json(&path, &[("page", page.to_string())]).await?,
        )
    }

    async fn trending(
        &self,
        kind: MediaKind,
        window: TimeWindow,
    ) -> Result<Paged<MediaSummary>, MetadataError> {
        let path = format!("/trending/{kind}/{window}");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn search_movies(&self, query: &str) -> Result<Paged<MediaSummary>, MetadataError> {
        let path = "/search/movie";
        decode(
            path,
            self.get_json(path, &[("query", query.to_string())]).await?,
        )
    }

    async fn popular_people(&self, page: u32) -> Result<Paged<PersonSummary>, MetadataError> {
        let path = "/person/popular";
        decode(path, self.get_json(path, &[("page", page.to_string())]).await?)
    }

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, MetadataError> {
        let path = format!("/movie/{id}");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn tv_details(&self, id: u64) -> Result<TvDetails, MetadataError> {
        let path = format!("/tv/{id}");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn person_details(&self, id: u64) -> Result<PersonDetails, MetadataError> {
        let path = format!("/person/{id}");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn credits(&self, kind: MediaKind, id: u64) -> Result<Credits, MetadataError> {
        let path = format!("/{kind}/{id}/credits");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn combined_credits(&self, id: u64) -> Result<CombinedCredits, MetadataError> {
        let path = format!("/person/{id}/combined_credits");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> Result<VideoList, MetadataError> {
        let path = format!("/{kind}/{id}/videos");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn images(&self, kind: MediaKind, id: u64) -> Result<ImageSet, MetadataError> {
        let path = format!("/{kind}/{id}/images");
        decode(
            &path,
            self.get_json(&path, &[("include_image_language", "en,null".to_string())])
                .await?,
        )
    }

    async fn release_dates(&self, id: u64) -> Result<ReleaseDates, MetadataError> {
        let path = format!("/movie/{id}/release_dates");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn watch_providers(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<WatchProviders, MetadataError> {
        let path = format!("/{kind}/{id}/watch/providers");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn recommendations(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<Paged<MediaSummary>, MetadataError> {
        let path = format!("/{kind}/{id}/recommendations");
        decode(&path, self.get_json(&path, &[]).await?)
    }

    async fn similar(&self, kind: MediaKind, id: u64) -> Result<Paged<MediaSummary>, MetadataError> {
        let path = format!("/{kind}/{id}/similar");
        decode(&path, self.get_json(&path, &[]).await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

/// Raw reply from an identity endpoint, kept verbatim so it can be echoed.
#[derive(Debug, Clone, PartialEq)]
pub struct Upstream {
    pub status: u16,
    pub body: Value,
}

impl Upstream {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Typed view of the body. The raw body stays available for echoing.
    pub fn decode<T: DeserializeOwned>(&self, path: &str) -> Result<T, MetadataError> {
        decode(path, self.body.clone())
    }
}

/// TMDB authentication and account endpoints.
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// Send a request and return whatever status and JSON body came back.
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Upstream, MetadataError>;

    async fn create_request_token(&self) -> Result<Upstream, MetadataError> {
        self.send(Verb::Get, "/authentication/token/new", &[], None)
            .await
    }

    async fn create_session(&self, request_token: &str) -> Result<Upstream, MetadataError> {
        self.send(
            Verb::Post,
            "/authentication/session/new",
            &[],
            Some(json!({ "request_token": request_token })),
        )
        .await
    }

    async fn account(&self, session_id: &str) -> Result<Upstream, MetadataError> {
        self.send(
            Verb::Get,
            "/account",
            &[("session_id", session_id.to_string())],
            None,
        )
        .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<Upstream, MetadataError> {
        self.send(
            Verb::Delete,
            "/authentication/session",
            &[],
            Some(json!({ "session_id": session_id })),
        )
        .await
    }
}
