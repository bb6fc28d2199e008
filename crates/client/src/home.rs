//! Sections of the home page.

use metamoviex_core::types::{Contributor, MediaKind, TimeWindow, Timeframe};
use metamoviex_metadata::models::{MediaSummary, Paged};
use metamoviex_metadata::provider::MediaApi;

use crate::ClientError;
use crate::bridge::BridgeApi;

/// Cards shown per home carousel.
pub const SECTION_LIMIT: usize = 10;

fn first(paged: Paged<MediaSummary>) -> Vec<MediaSummary> {
    paged.results.into_iter().take(SECTION_LIMIT).collect()
}

pub async fn trending_movies(
    api: &dyn MediaApi,
    window: TimeWindow,
) -> Result<Vec<MediaSummary>, ClientError> {
    Ok(first(api.trending(MediaKind::Movie, window).await?))
}

/// Tabs of the "What's Popular" carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularTab {
    Streaming,
    OnTv,
    ForRent,
    InTheaters,
}

impl PopularTab {
    pub const ALL: [PopularTab; 4] = [
        PopularTab::Streaming,
        PopularTab::OnTv,
        PopularTab::ForRent,
        PopularTab::InTheaters,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Streaming => "Streaming",
            Self::OnTv => "On TV",
            Self::ForRent => "For Rent",
            Self::InTheaters => "In Theaters",
        }
    }

    pub async fn load(self, api: &dyn MediaApi) -> Result<Vec<MediaSummary>, ClientError> {
        let paged = match self {
            Self::Streaming => api.trending(MediaKind::Tv, TimeWindow::Week).await?,
            Self::OnTv => api.category(MediaKind::Tv, "popular", 1).await?,
            Self::ForRent => api.category(MediaKind::Movie, "popular", 1).await?,
            Self::InTheaters => api.category(MediaKind::Movie, "now_playing", 1).await?,
        };
        Ok(first(paged))
    }
}

/// "Free To Watch": the most popular titles of a kind.
pub async fn free_to_watch(
    api: &dyn MediaApi,
    kind: MediaKind,
) -> Result<Vec<MediaSummary>, ClientError> {
    let params = [
        ("sort_by", "popularity.desc".to_string()),
        ("page", "1".to_string()),
    ];
    Ok(first(api.discover(kind, &params).await?))
}

/// Tabs of the trailer carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieCategory {
    Popular,
    NowPlaying,
    TopRated,
    Upcoming,
}

impl MovieCategory {
    pub fn path(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::NowPlaying => "now_playing",
            Self::TopRated => "top_rated",
            Self::Upcoming => "upcoming",
        }
    }
}

pub async fn discover_category(
    api: &dyn MediaApi,
    category: MovieCategory,
) -> Result<Vec<MediaSummary>, ClientError> {
    Ok(first(
        api.category(MediaKind::Movie, category.path(), 1).await?,
    ))
}

/// Embeddable YouTube URL of the movie's first trailer.
pub async fn trailer_for(api: &dyn MediaApi, movie_id: u64) -> Result<Option<String>, ClientError> {
    let videos = api.videos(MediaKind::Movie, movie_id).await?;
    Ok(videos
        .youtube_trailer()
        .map(|v| format!("https://www.youtube.com/embed/{}", v.key)))
}

pub async fn leaderboard<B: BridgeApi + ?Sized>(
    bridge: &B,
    timeframe: Timeframe,
) -> Result<Vec<Contributor>, ClientError> {
    bridge.leaderboard(timeframe).await
}
