/// League backend raw wire types, serde shapes for the JSON it returns.
/// These map to the clean domain types via the `map_*` functions in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Teams  (/teams?seasonId=)
// ---------------------------------------------------------------------------

/// Counts are signed so a negative value reaches the mapper and gets rejected
/// instead of failing the whole response.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: Option<u64>,
    pub season_id: Option<u64>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub points_for: Option<i64>,
    pub points_against: Option<i64>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Seasons  (/public/seasons/current, /public/seasons/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDto {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub year: Option<u16>,
    pub is_active: Option<bool>,
    pub playoff_start_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Games  (/schedule/season/{id}, and nested in playoff matches)
// ---------------------------------------------------------------------------

/// The schedule endpoint returns full game entities with nested teams; the
/// bracket endpoint embeds the flattened DTO. Both shapes are accepted.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    pub id: Option<u64>,
    pub home_team_id: Option<u64>,
    pub away_team_id: Option<u64>,
    pub home_team_name: Option<String>,
    pub away_team_name: Option<String>,
    pub home_team: Option<TeamRefDto>,
    pub away_team: Option<TeamRefDto>,
    pub game_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`.
    pub game_time: Option<String>,
    pub location: Option<String>,
    pub court_number: Option<String>,
    pub week_number: Option<u32>,
    pub is_completed: Option<bool>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamRefDto {
    pub id: Option<u64>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Playoff bracket  (/public/bracket)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffBracketDto {
    pub id: Option<u64>,
    pub season_id: Option<u64>,
    pub bracket_name: Option<String>,
    pub is_completed: Option<bool>,
    pub matches: Option<Vec<PlayoffMatchDto>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffMatchDto {
    pub id: Option<u64>,
    pub round_number: Option<u32>,
    pub position_in_round: Option<u32>,
    pub team1_id: Option<u64>,
    pub team2_id: Option<u64>,
    pub winner_id: Option<u64>,
    pub is_completed: Option<bool>,
    pub game: Option<GameDto>,
}
