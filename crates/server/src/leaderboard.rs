use metamoviex_core::types::{Contributor, Timeframe};

pub const LEADERBOARD_SIZE: usize = 10;

/// `(id, username, total_edits, weekly_edits)`
const SEED: &[(u32, &str, u64, u64)] = &[
    (1, "enterpr1se", 1_589_251, 77_775),
    (2, "Shei", 2_163_488, 14_391),
    (3, "Samara", 4_227_532, 14_368),
    (4, "sunnybird21", 16_872, 10_774),
    (5, "RuiZafon", 1_671_416, 5_998),
    (6, "h345407561", 10_055, 5_570),
    (7, "strong_style", 88_192, 5_535),
    (8, "chkchkboom", 285_053, 5_128),
    (9, "marack99", 244_177, 5_058),
    (10, "HeelerCattle86", 251_104, 4_472),
];

pub fn parse_timeframe(raw: &str) -> Option<Timeframe> {
    match raw {
        "all_time" => Some(Timeframe::AllTime),
        "this_week" => Some(Timeframe::ThisWeek),
        _ => None,
    }
}

pub fn contributors() -> Vec<Contributor> {
    SEED.iter()
        .map(|&(id, username, total_edits, weekly_edits)| Contributor {
            id,
            username: username.to_string(),
            total_edits,
            weekly_edits,
        })
        .collect()
}

/// Top contributors by the timeframe's edit counter, ties broken by id.
pub fn top(mut contributors: Vec<Contributor>, timeframe: Timeframe) -> Vec<Contributor> {
    contributors.sort_by(|a, b| {
        b.edits(timeframe)
            .cmp(&a.edits(timeframe))
            .then(a.id.cmp(&b.id))
    });
    contributors.truncate(LEADERBOARD_SIZE);
    contributors
}
