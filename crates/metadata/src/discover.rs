//! Discovery query construction for the filterable listing pages.

use chrono::NaiveDate;
use metamoviex_core::types::MediaKind;
use serde::{Deserialize, Serialize};

/// Sort keys offered in the sidebar, as `(value, label)`.
pub const MOVIE_SORT_OPTIONS: &[(&str, &str)] = &[
    ("popularity.desc", "Popularity Descending"),
    ("popularity.asc", "Popularity Ascending"),
    ("release_date.desc", "Release Date Descending"),
    ("release_date.asc", "Release Date Ascending"),
    ("vote_average.desc", "Rating Descending"),
    ("vote_average.asc", "Rating Ascending"),
    ("primary_release_date.asc", "Release Date (Soonest)"),
];

pub const TV_SORT_OPTIONS: &[(&str, &str)] = &[
    ("popularity.desc", "Popularity Descending"),
    ("popularity.asc", "Popularity Ascending"),
    ("first_air_date.desc", "First Air Date Descending"),
    ("first_air_date.asc", "First Air Date Ascending"),
    ("vote_average.desc", "Rating Descending"),
    ("vote_average.asc", "Rating Ascending"),
];

/// User-editable filter state of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    pub sort_by: String,
    /// Selected genre ids, in selection order.
    pub genres: Vec<u32>,
    pub min_score: f32,
    pub min_votes: u32,
    /// ISO 639-1 original language, empty for any.
    pub language: String,
    /// ISO 3166-1 origin country (TV only), empty for any.
    pub origin_country: String,
    pub release_from: Option<NaiveDate>,
    pub release_to: Option<NaiveDate>,
    /// Comma or pipe separated keyword ids, passed through.
    pub keywords: String,
}

impl Default for DiscoverFilters {
    fn default() -> Self {
        Self {
            sort_by: "popularity.desc".to_string(),
            genres: Vec::new(),
            min_score: 0.0,
            min_votes: 0,
            language: String::new(),
            origin_country: String::new(),
            release_from: None,
            release_to: None,
            keywords: String::new(),
        }
    }
}

impl DiscoverFilters {
    /// Select the genre if unselected, otherwise deselect it.
    pub fn toggle_genre(&mut self, id: u32) {
        if let Some(pos) = self.genres.iter().position(|g| *g == id) {
            self.genres.remove(pos);
        } else {
            self.genres.push(id);
        }
    }

    pub fn has_genre(&self, id: u32) -> bool {
        self.genres.contains(&id)
    }

    fn genres_param(&self) -> Option<String> {
        if self.genres.is_empty() {
            return None;
        }
        Some(
            self.genres
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Which listing page a query is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Movies,
    TopRatedMovies,
    NowPlayingMovies,
    UpcomingMovies,
    PopularTv,
    AiringTodayTv,
}

impl Preset {
    pub fn kind(self) -> MediaKind {
        match self {
            Self::Movies | Self::TopRatedMovies | Self::NowPlayingMovies | Self::UpcomingMovies => {
                MediaKind::Movie
            }
            Self::PopularTv | Self::AiringTodayTv => MediaKind::Tv,
        }
    }

    pub fn sort_options(self) -> &'static [(&'static str, &'static str)] {
        match self.kind() {
            MediaKind::Movie => MOVIE_SORT_OPTIONS,
            MediaKind::Tv => TV_SORT_OPTIONS,
        }
    }

    /// Filters a page starts with.
    pub fn default_filters(self, today: NaiveDate) -> DiscoverFilters {
        let base = DiscoverFilters::default();
        match self {
            Self::Movies | Self::PopularTv => base,
            Self::TopRatedMovies => DiscoverFilters {
                sort_by: "vote_average.desc".to_string(),
                min_score: 7.0,
                min_votes: 1000,
                ..base
            },
            Self::NowPlayingMovies => DiscoverFilters {
                min_votes: 100,
                ..base
            },
            Self::UpcomingMovies => DiscoverFilters {
                sort_by: "primary_release_date.asc".to_string(),
                release_from: Some(today),
                ..base
            },
            Self::AiringTodayTv => DiscoverFilters {
                min_votes: 50,
                ..base
            },
        }
    }

    fn date_field(self) -> (&'static str, &'static str) {
        match self.kind() {
            MediaKind::Movie => ("primary_release_date.gte", "primary_release_date.lte"),
            MediaKind::Tv => ("first_air_date.gte", "first_air_date.lte"),
        }
    }

    /// Whether score and vote thresholds are sent even when zero.
    fn pins_thresholds(self) -> bool {
        matches!(
            self,
            Self::TopRatedMovies | Self::NowPlayingMovies | Self::AiringTodayTv
        )
    }

    /// Query parameters for `/discover/{kind}` at `page`.
    pub fn params(
        self,
        filters: &DiscoverFilters,
        page: u32,
        today: NaiveDate,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.max(1).to_string()),
            ("sort_by", filters.sort_by.clone()),
        ];

        if self == Self::NowPlayingMovies {
            params.push(("region", "US".to_string()));
            params.push(("include_adult", "false".to_string()));
        }

        if self.pins_thresholds() || filters.min_score > 0.0 {
            params.push(("vote_average.gte", filters.min_score.to_string()));
        }
        if self.pins_thresholds() || filters.min_votes > 0 {
            params.push(("vote_count.gte", filters.min_votes.to_string()));
        }

        if let Some(genres) = filters.genres_param() {
            params.push(("with_genres", genres));
        }

        let language = filters.language.trim();
        if !language.is_empty() {
            params.push(("with_original_language", language.to_string()));
        }

        let country = filters.origin_country.trim();
        if self.kind() == MediaKind::Tv && !country.is_empty() {
            params.push(("with_origin_country", country.to_uppercase()));
        }

        let (gte, lte) = self.date_field();
        let (from, to) = match self {
            Self::TopRatedMovies => (None, None),
            Self::NowPlayingMovies => (
                filters.release_from,
                Some(filters.release_to.map_or(today, |to| to.min(today))),
            ),
            Self::UpcomingMovies => (Some(filters.release_from.unwrap_or(today)), filters.release_to),
            Self::AiringTodayTv => (Some(today), Some(today)),
            Self::Movies | Self::PopularTv => (filters.release_from, filters.release_to),
        };
        if let Some(from) = from {
            params.push((gte, from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = to {
            params.push((lte, to.format("%Y-%m-%d").to_string()));
        }

        let keywords = filters.keywords.trim();
        if !keywords.is_empty() {
            params.push(("with_keywords", keywords.to_string()));
        }

        params
    }
}
