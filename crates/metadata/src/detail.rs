//! Detail pages for movies, TV shows and people.
//!
//! Each page issues its sub-requests concurrently and joins them
//! all-or-nothing: the first failure fails the whole page, there is no
//! partially assembled result.

use std::sync::LazyLock;

use chrono::NaiveDate;
use metamoviex_core::types::MediaKind;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::MetadataError;
use crate::format::{
    format_air_dates, format_card_date, format_long_date, format_runtime, gender_label,
    parse_date, release_date_for_country, watch_providers_for,
};
use crate::models::{
    CastMember, CombinedCredits, Credits, CrewMember, ImageSet, MediaSummary, MovieDetails,
    Paged, PersonDetails, ProviderBlock, ReleaseDates, TvDetails, VideoList, WatchProviders,
    image_url,
};
use crate::provider::MediaApi;

static WRITER_JOB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)screenplay|writer|adaptation").unwrap());

const WATCH_COUNTRY: &str = "US";
const CAST_LIMIT: usize = 8;

// ---------------------------------------------------------------------------
// Shared view pieces
// ---------------------------------------------------------------------------

/// Poster card used for recommendations and similar lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: u64,
    pub title: String,
    pub media_type: Option<String>,
    pub poster_url: Option<String>,
    pub date: String,
    pub vote_average: f64,
}

impl From<&MediaSummary> for Card {
    fn from(m: &MediaSummary) -> Self {
        Self {
            id: m.id,
            title: m.display_title().to_string(),
            media_type: m.media_type.clone(),
            poster_url: m.poster_url("w500"),
            date: format_card_date(m.date()),
            vote_average: m.vote_average,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastCard {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_url: Option<String>,
}

impl From<&CastMember> for CastCard {
    fn from(c: &CastMember) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            character: c.character.clone(),
            profile_url: image_url("w185", c.profile_path.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewCredit {
    pub id: u64,
    pub name: String,
    pub job: String,
}

impl From<&CrewMember> for CrewCredit {
    fn from(c: &CrewMember) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            job: c.job.clone().unwrap_or_default(),
        }
    }
}

fn cards(list: &Paged<MediaSummary>, limit: usize) -> Vec<Card> {
    list.results.iter().take(limit).map(Card::from).collect()
}

fn cast_cards(credits: &Credits) -> Vec<CastCard> {
    credits
        .cast
        .iter()
        .take(CAST_LIMIT)
        .map(CastCard::from)
        .collect()
}

fn poster_urls(images: &ImageSet, limit: usize) -> Vec<String> {
    images
        .posters
        .iter()
        .take(limit)
        .filter_map(|img| image_url("w500", Some(&img.file_path)))
        .collect()
}

fn trailer_key(videos: &VideoList) -> Option<String> {
    videos.youtube_trailer().map(|v| v.key.clone())
}

fn watch_block(providers: &WatchProviders) -> Option<ProviderBlock> {
    watch_providers_for(providers, WATCH_COUNTRY).cloned()
}

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoviePage {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub year: Option<String>,
    pub runtime: String,
    pub genres: Vec<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub budget: u64,
    pub revenue: u64,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date_us: Option<String>,
    pub release_date_es: Option<String>,
    pub director: Option<CrewCredit>,
    pub writers: Vec<CrewCredit>,
    pub trailer_key: Option<String>,
    pub cast: Vec<CastCard>,
    pub posters: Vec<String>,
    pub watch_providers: Option<ProviderBlock>,
    pub recommendations: Vec<Card>,
}

#[allow(clippy::too_many_arguments)]
fn assemble_movie(
    details: MovieDetails,
    credits: Credits,
    videos: VideoList,
    images: ImageSet,
    release_dates: ReleaseDates,
    providers: WatchProviders,
    recommendations: Paged<MediaSummary>,
) -> MoviePage {
    let director = credits
        .crew
        .iter()
        .find(|c| c.job.as_deref() == Some("Director"))
        .map(CrewCredit::from);
    let writers = credits
        .crew
        .iter()
        .filter(|c| WRITER_JOB_RE.is_match(c.job.as_deref().unwrap_or("")))
        .map(CrewCredit::from)
        .collect();

    MoviePage {
        id: details.id,
        year: details
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .map(str::to_string),
        runtime: format_runtime(details.runtime),
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        poster_url: image_url("original", details.poster_path.as_deref()),
        backdrop_url: image_url("original", details.backdrop_path.as_deref()),
        release_date_us: release_date_for_country(&release_dates, "US"),
        release_date_es: release_date_for_country(&release_dates, "ES"),
        director,
        writers,
        trailer_key: trailer_key(&videos),
        cast: cast_cards(&credits),
        posters: poster_urls(&images, 4),
        watch_providers: watch_block(&providers),
        recommendations: cards(&recommendations, 6),
        title: details.title,
        tagline: details.tagline,
        overview: details.overview,
        status: details.status,
        original_language: details.original_language,
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        budget: details.budget,
        revenue: details.revenue,
    }
}

pub async fn load_movie_page(api: &dyn MediaApi, id: u64) -> Result<MoviePage, MetadataError> {
    debug!(id, "loading movie page");
    let (details, credits, videos, images, release_dates, providers, recommendations) = tokio::try_join!(
        api.movie_details(id),
        api.credits(MediaKind::Movie, id),
        api.videos(MediaKind::Movie, id),
        api.images(MediaKind::Movie, id),
        api.release_dates(id),
        api.watch_providers(MediaKind::Movie, id),
        api.recommendations(MediaKind::Movie, id),
    )?;

    Ok(assemble_movie(
        details,
        credits,
        videos,
        images,
        release_dates,
        providers,
        recommendations,
    ))
}

// ---------------------------------------------------------------------------
// TV
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonCard {
    pub name: String,
    pub season_number: u32,
    pub episode_count: u32,
    pub air_date: String,
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvPage {
    pub id: u64,
    pub name: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub air_dates: String,
    pub runtime: String,
    pub genres: Vec<String>,
    pub creators: String,
    pub networks: Vec<String>,
    pub vote_average: f64,
    pub number_of_seasons: u32,
    pub number_of_episodes: u32,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub seasons: Vec<SeasonCard>,
    pub trailer_key: Option<String>,
    pub cast: Vec<CastCard>,
    pub posters: Vec<String>,
    pub watch_providers: Option<ProviderBlock>,
    pub recommendations: Vec<Card>,
    pub similar: Vec<Card>,
}

#[allow(clippy::too_many_arguments)]
fn assemble_tv(
    details: TvDetails,
    credits: Credits,
    videos: VideoList,
    images: ImageSet,
    providers: WatchProviders,
    recommendations: Paged<MediaSummary>,
    similar: Paged<MediaSummary>,
) -> TvPage {
    let seasons = details
        .seasons
        .iter()
        .map(|s| SeasonCard {
            name: s.name.clone(),
            season_number: s.season_number,
            episode_count: s.episode_count,
            air_date: format_card_date(s.air_date.as_deref()),
            poster_url: image_url("w300", s.poster_path.as_deref()),
        })
        .collect();

    TvPage {
        id: details.id,
        air_dates: format_air_dates(
            details.first_air_date.as_deref(),
            details.last_air_date.as_deref(),
        ),
        runtime: format_runtime(details.episode_run_time.first().copied()),
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        creators: details
            .created_by
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        networks: details.networks.iter().map(|n| n.name.clone()).collect(),
        poster_url: image_url("original", details.poster_path.as_deref()),
        backdrop_url: image_url("original", details.backdrop_path.as_deref()),
        seasons,
        trailer_key: trailer_key(&videos),
        cast: cast_cards(&credits),
        posters: poster_urls(&images, 4),
        watch_providers: watch_block(&providers),
        recommendations: cards(&recommendations, 12),
        similar: cards(&similar, 12),
        name: details.name,
        tagline: details.tagline,
        overview: details.overview,
        status: details.status,
        vote_average: details.vote_average,
        number_of_seasons: details.number_of_seasons,
        number_of_episodes: details.number_of_episodes,
    }
}

pub async fn load_tv_page(api: &dyn MediaApi, id: u64) -> Result<TvPage, MetadataError> {
    debug!(id, "loading tv page");
    let (details, credits, videos, images, providers, recommendations, similar) = tokio::try_join!(
        api.tv_details(id),
        api.credits(MediaKind::Tv, id),
        api.videos(MediaKind::Tv, id),
        api.images(MediaKind::Tv, id),
        api.watch_providers(MediaKind::Tv, id),
        api.recommendations(MediaKind::Tv, id),
        api.similar(MediaKind::Tv, id),
    )?;

    Ok(assemble_tv(
        details,
        credits,
        videos,
        images,
        providers,
        recommendations,
        similar,
    ))
}

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// One row of a person's filmography.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub id: u64,
    pub title: String,
    pub media_type: Option<String>,
    pub year: Option<String>,
    /// Character for acting credits, job for crew credits.
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPage {
    pub id: u64,
    pub name: String,
    pub biography: Option<String>,
    pub profile_url: Option<String>,
    pub gender: String,
    pub known_for_department: String,
    pub known_credits: usize,
    pub also_known_as: String,
    pub birthday: String,
    pub deathday: Option<String>,
    pub place_of_birth: String,
    pub known_for: Vec<Card>,
    pub credits: Vec<TimelineEntry>,
}

/// Undated credits sort after every dated one.
fn credit_date(m: &MediaSummary) -> Option<NaiveDate> {
    m.date().and_then(parse_date)
}

fn assemble_person(details: PersonDetails, credits: CombinedCredits) -> PersonPage {
    let mut known_for: Vec<&MediaSummary> = credits
        .cast
        .iter()
        .filter(|c| c.poster_path.is_some())
        .collect();
    known_for.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let mut timeline: Vec<&MediaSummary> = credits.cast.iter().chain(credits.crew.iter()).collect();
    timeline.sort_by_key(|m| std::cmp::Reverse(credit_date(m)));

    PersonPage {
        id: details.id,
        profile_url: image_url("original", details.profile_path.as_deref()),
        gender: gender_label(details.gender).to_string(),
        known_for_department: details
            .known_for_department
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        known_credits: credits.cast.len() + credits.crew.len(),
        also_known_as: if details.also_known_as.is_empty() {
            "-".to_string()
        } else {
            details.also_known_as.join(", ")
        },
        birthday: format_long_date(details.birthday.as_deref()),
        deathday: details
            .deathday
            .as_deref()
            .map(|d| format_long_date(Some(d))),
        place_of_birth: details
            .place_of_birth
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        known_for: known_for.into_iter().take(12).map(Card::from).collect(),
        credits: timeline
            .into_iter()
            .map(|m| TimelineEntry {
                id: m.id,
                title: m.display_title().to_string(),
                media_type: m.media_type.clone(),
                year: m.year().map(str::to_string),
                role: m.character.clone().or_else(|| m.job.clone()),
            })
            .collect(),
        name: details.name,
        biography: details.biography,
    }
}

pub async fn load_person_page(api: &dyn MediaApi, id: u64) -> Result<PersonPage, MetadataError> {
    debug!(id, "loading person page");
    let (details, credits) = tokio::try_join!(api.person_details(id), api.combined_credits(id))?;
    Ok(assemble_person(details, credits))
}
