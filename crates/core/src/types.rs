use serde::{Deserialize, Serialize};

/// Root of the TMDB image CDN; sizes (`w45`, `w500`, `original`, …) are appended.
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Content family a TMDB endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trending window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account of the logged-in TMDB user, as returned by `/account`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<Avatar>,
    #[serde(default)]
    pub include_adult: bool,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub iso_3166_1: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(default)]
    pub tmdb: Option<TmdbAvatar>,
    #[serde(default)]
    pub gravatar: Option<Gravatar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TmdbAvatar {
    pub avatar_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gravatar {
    pub hash: Option<String>,
}

impl User {
    /// Small avatar for the navbar, when the user uploaded one to TMDB.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .and_then(|a| a.tmdb.as_ref())
            .and_then(|t| t.avatar_path.as_deref())
            .map(|p| format!("{IMAGE_BASE}/w45{p}"))
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Leaderboard period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    AllTime,
    ThisWeek,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllTime => "all_time",
            Self::ThisWeek => "this_week",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A community contributor ranked on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: u32,
    pub username: String,
    pub total_edits: u64,
    pub weekly_edits: u64,
}

impl Contributor {
    pub fn edits(&self, timeframe: Timeframe) -> u64 {
        match timeframe {
            Timeframe::AllTime => self.total_edits,
            Timeframe::ThisWeek => self.weekly_edits,
        }
    }
}

/// Login handshake as observed by the client.
///
/// `Anonymous -> TokenRequested -> SessionCreated -> Authenticated`, with
/// `Denied` reachable from any in-flight phase and always falling back to
/// `Anonymous`. The callback can land on a fresh client, so `Anonymous`
/// may jump straight to `SessionCreated` or `Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginPhase {
    Anonymous,
    TokenRequested,
    SessionCreated,
    Authenticated,
    Denied,
}

impl LoginPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "Anonymous",
            Self::TokenRequested => "TokenRequested",
            Self::SessionCreated => "SessionCreated",
            Self::Authenticated => "Authenticated",
            Self::Denied => "Denied",
        }
    }

    pub fn can_transition_to(&self, next: LoginPhase) -> bool {
        use LoginPhase::*;
        matches!(
            (self, next),
            (Anonymous, TokenRequested)
                | (Anonymous, SessionCreated)
                | (Anonymous, Authenticated)
                | (Anonymous, Denied)
                | (TokenRequested, TokenRequested)
                | (TokenRequested, SessionCreated)
                | (TokenRequested, Denied)
                | (TokenRequested, Authenticated)
                | (TokenRequested, Anonymous)
                | (SessionCreated, Authenticated)
                | (SessionCreated, Denied)
                | (Authenticated, Authenticated)
                | (Authenticated, Anonymous)
                | (Denied, Anonymous)
        )
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl std::fmt::Display for LoginPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_decodes_account_payload() {
        let json = serde_json::json!({
            "id": 548,
            "username": "moviebuff",
            "name": "",
            "include_adult": false,
            "iso_639_1": "en",
            "iso_3166_1": "US",
            "avatar": {
                "gravatar": { "hash": "c9e9fc152ee756a900db85757c29815d" },
                "tmdb": { "avatar_path": "/xy.jpg" }
            }
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, 548);
        assert_eq!(user.display_name(), "moviebuff");
        assert_eq!(
            user.avatar_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w45/xy.jpg")
        );
    }

    #[test]
    fn user_without_avatar_has_no_url() {
        let user: User =
            serde_json::from_value(serde_json::json!({ "id": 1, "username": "a" })).unwrap();
        assert!(user.avatar_url().is_none());
    }

    #[test]
    fn denial_returns_to_anonymous_only() {
        assert!(LoginPhase::Denied.can_transition_to(LoginPhase::Anonymous));
        assert!(!LoginPhase::Denied.can_transition_to(LoginPhase::Authenticated));
        assert!(!LoginPhase::SessionCreated.can_transition_to(LoginPhase::Anonymous));
        assert!(LoginPhase::TokenRequested.can_transition_to(LoginPhase::SessionCreated));
    }

    #[test]
    fn pending_token_yields_to_restored_session() {
        assert!(LoginPhase::TokenRequested.can_transition_to(LoginPhase::Authenticated));
        assert!(LoginPhase::Authenticated.can_transition_to(LoginPhase::Anonymous));
        assert!(!LoginPhase::Authenticated.can_transition_to(LoginPhase::SessionCreated));
    }
}
