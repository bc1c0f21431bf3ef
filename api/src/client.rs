use crate::wire::{GameDto, PlayoffBracketDto, PlayoffMatchDto, SeasonDto, TeamDto};
use crate::{
    GameStatus, LeagueSnapshot, PersistedBracket, ReportedResult, RoundKind, ScheduledGame, Season,
    SlotId, SlotSchedule, Team,
};
use chrono::{NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Read-only client for the league backend's REST API.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for LeagueApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    /// The response parsed but a record broke a domain rule (negative counts,
    /// missing id or name).
    Malformed(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Malformed(msg) => write!(f, "Malformed record: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl LeagueApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("leaguetui/0.1 (terminal standings viewer)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_current_season(&self) -> ApiResult<Season> {
        let raw: SeasonDto = self.get("/public/seasons/current").await?;
        map_season(raw)
    }

    pub async fn fetch_season(&self, season_id: u64) -> ApiResult<Season> {
        let raw: SeasonDto = self.get(&format!("/public/seasons/{season_id}")).await?;
        map_season(raw)
    }

    /// Team records for a season. One bad record fails the whole fetch.
    pub async fn fetch_teams(&self, season_id: u64) -> ApiResult<Vec<Team>> {
        let raw: Vec<TeamDto> = self.get(&format!("/teams?seasonId={season_id}")).await?;
        raw.into_iter().map(map_team).collect()
    }

    pub async fn fetch_season_games(&self, season_id: u64) -> ApiResult<Vec<ScheduledGame>> {
        let raw: Vec<GameDto> = self.get(&format!("/schedule/season/{season_id}")).await?;
        Ok(raw.iter().map(map_game).collect())
    }

    /// The stored bracket, or `None` when the backend has not created one.
    pub async fn fetch_bracket(&self) -> ApiResult<Option<PersistedBracket>> {
        match self.get::<PlayoffBracketDto>("/public/bracket").await {
            Ok(raw) => Ok(Some(map_bracket(raw))),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Everything the UI needs for one season. `None` means the active season.
    pub async fn fetch_snapshot(&self, season_id: Option<u64>) -> ApiResult<LeagueSnapshot> {
        let season = match season_id {
            Some(id) => self.fetch_season(id).await?,
            None => self.fetch_current_season().await?,
        };
        let teams = self.fetch_teams(season.id).await?;
        let games = self.fetch_season_games(season.id).await?;

        // /public/bracket serves the active season's bracket only.
        let bracket = self.fetch_bracket().await?.filter(|b| b.season_id.is_none_or(|id| id == season.id));

        Ok(LeagueSnapshot {
            season,
            teams,
            games,
            bracket,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }

        match response.error_for_status() {
            Ok(res) => res.json::<T>().await.map_err(|e| ApiError::Parsing(e, url)),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

fn count(value: Option<i64>, field: &str, team: &str) -> ApiResult<u32> {
    let value = value.ok_or_else(|| ApiError::Malformed(format!("team {team}: missing {field}")))?;
    u32::try_from(value)
        .map_err(|_| ApiError::Malformed(format!("team {team}: {field} is {value}")))
}

pub(crate) fn map_team(dto: TeamDto) -> ApiResult<Team> {
    let id = dto
        .id
        .ok_or_else(|| ApiError::Malformed(format!("team {:?} has no id", dto.name)))?;
    let name = dto
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::Malformed(format!("team {id} has no name")))?;

    Ok(Team {
        id,
        season_id: dto.season_id,
        wins: count(dto.wins, "wins", &name)?,
        losses: count(dto.losses, "losses", &name)?,
        points_for: count(dto.points_for, "pointsFor", &name)?,
        points_against: count(dto.points_against, "pointsAgainst", &name)?,
        is_active: dto.is_active.unwrap_or(true),
        city: dto.city.filter(|c| !c.trim().is_empty()),
        name,
    })
}

pub(crate) fn map_season(dto: SeasonDto) -> ApiResult<Season> {
    let id = dto
        .id
        .ok_or_else(|| ApiError::Malformed("season has no id".into()))?;
    Ok(Season {
        id,
        name: dto.name.unwrap_or_else(|| format!("Season {id}")),
        year: dto.year,
        is_active: dto.is_active.unwrap_or(false),
        playoff_start_date: dto.playoff_start_date.as_deref().and_then(parse_date),
    })
}

pub(crate) fn map_game(dto: &GameDto) -> ScheduledGame {
    let home_ref = dto.home_team.as_ref();
    let away_ref = dto.away_team.as_ref();
    let status = if dto.is_completed.unwrap_or(false) {
        GameStatus::Final
    } else {
        GameStatus::Scheduled
    };
    let score = match (status, dto.home_score, dto.away_score) {
        (GameStatus::Final, Some(h), Some(a)) => u16::try_from(h).ok().zip(u16::try_from(a).ok()),
        _ => None,
    };
    let location = match (dto.location.as_deref(), dto.court_number.as_deref()) {
        (Some(loc), Some(court)) if !court.is_empty() => Some(format!("{loc} (Court {court})")),
        (Some(loc), _) => Some(loc.to_owned()),
        (None, _) => None,
    };

    ScheduledGame {
        id: dto.id.unwrap_or_default(),
        home_team_id: dto.home_team_id.or_else(|| home_ref.and_then(|t| t.id)),
        away_team_id: dto.away_team_id.or_else(|| away_ref.and_then(|t| t.id)),
        home_team_name: dto
            .home_team_name
            .clone()
            .or_else(|| home_ref.and_then(|t| t.name.clone()))
            .unwrap_or_else(|| "TBD".into()),
        away_team_name: dto
            .away_team_name
            .clone()
            .or_else(|| away_ref.and_then(|t| t.name.clone()))
            .unwrap_or_else(|| "TBD".into()),
        date: dto.game_date.as_deref().and_then(parse_date),
        time: dto.game_time.as_deref().and_then(parse_time),
        location,
        week: dto.week_number,
        status,
        score,
    }
}

/// Stored matches keyed by slot id (`roundNumber` 1..=4, `positionInRound`).
/// Matches outside the four-round topology are dropped.
pub(crate) fn map_bracket(dto: PlayoffBracketDto) -> PersistedBracket {
    let mut results = Vec::new();
    let mut schedule = Vec::new();

    for m in dto.matches.unwrap_or_default() {
        let Some(slot) = match_slot(&m) else {
            continue;
        };
        if let Some(result) = map_match_result(slot, &m) {
            results.push(result);
        }
        if let Some(game) = &m.game {
            let meta = map_game(game);
            if meta.date.is_some() || meta.time.is_some() || meta.location.is_some() {
                schedule.push((
                    slot,
                    SlotSchedule {
                        date: meta.date,
                        time: meta.time,
                        location: meta.location,
                    },
                ));
            }
        }
    }
    results.sort_by_key(|r| r.slot);
    schedule.sort_by_key(|(slot, _)| *slot);

    PersistedBracket {
        id: dto.id.unwrap_or_default(),
        season_id: dto.season_id,
        name: dto.bracket_name.unwrap_or_else(|| "Playoffs".into()),
        is_completed: dto.is_completed.unwrap_or(false),
        results,
        schedule,
    }
}

fn match_slot(m: &PlayoffMatchDto) -> Option<SlotId> {
    let round = RoundKind::from_number(m.round_number?)?;
    let position = u8::try_from(m.position_in_round?).ok().filter(|p| *p > 0)?;
    Some(SlotId::new(round, position))
}

fn map_match_result(slot: SlotId, m: &PlayoffMatchDto) -> Option<ReportedResult> {
    if m.is_completed == Some(false) {
        return None;
    }
    let winner = m.winner_id?;
    let (winner_score, loser_score) = m
        .game
        .as_ref()
        .and_then(|g| {
            let home = g.home_score.and_then(|s| u16::try_from(s).ok());
            let away = g.away_score.and_then(|s| u16::try_from(s).ok());
            if g.home_team_id == Some(winner) {
                Some((home, away))
            } else if g.away_team_id == Some(winner) {
                Some((away, home))
            } else {
                None
            }
        })
        .unwrap_or((None, None));

    Some(ReportedResult {
        slot,
        winning_team_id: winner,
        winner_score,
        loser_score,
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Times come back as `HH:MM` when the seconds are zero.
fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn team_dto(id: u64, name: &str, wins: i64, losses: i64) -> TeamDto {
        TeamDto {
            id: Some(id),
            name: Some(name.into()),
            wins: Some(wins),
            losses: Some(losses),
            points_for: Some(500),
            points_against: Some(480),
            is_active: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_map_team() {
        let team = map_team(team_dto(7, "Palakers", 9, 2)).unwrap();
        assert_eq!(team.id, 7);
        assert_eq!(team.wins, 9);
        assert_eq!(team.point_differential(), 20);
        assert!(team.is_active);
    }

    #[test]
    fn test_map_team_rejects_negative_counts() {
        let err = map_team(team_dto(7, "Palakers", -1, 2)).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(ref msg) if msg.contains("wins")));
    }

    #[test]
    fn test_map_team_rejects_missing_fields() {
        let no_id = TeamDto { id: None, ..team_dto(1, "A", 1, 1) };
        assert!(matches!(map_team(no_id), Err(ApiError::Malformed(_))));

        let blank_name = TeamDto { name: Some("  ".into()), ..team_dto(1, "A", 1, 1) };
        assert!(matches!(map_team(blank_name), Err(ApiError::Malformed(_))));

        let no_losses = TeamDto { losses: None, ..team_dto(1, "A", 1, 1) };
        assert!(matches!(map_team(no_losses), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_parse_time_accepts_both_formats() {
        assert_eq!(parse_time("19:30"), NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(parse_time("19:30:15"), NaiveTime::from_hms_opt(19, 30, 15));
        assert_eq!(parse_time("7pm"), None);
    }

    #[test]
    fn test_map_game_nested_teams_and_score() {
        let raw: GameDto = serde_json::from_str(
            r#"{
                "id": 42,
                "homeTeam": {"id": 1, "name": "Hoopers"},
                "awayTeam": {"id": 2, "name": "Ballers"},
                "gameDate": "2026-01-17",
                "gameTime": "18:00",
                "location": "Rec Center",
                "courtNumber": "2",
                "weekNumber": 3,
                "isCompleted": true,
                "homeScore": 55,
                "awayScore": 49
            }"#,
        )
        .unwrap();
        let game = map_game(&raw);
        assert_eq!(game.home_team_id, Some(1));
        assert_eq!(game.away_team_name, "Ballers");
        assert_eq!(game.time, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(game.location.as_deref(), Some("Rec Center (Court 2)"));
        assert_eq!(game.status, GameStatus::Final);
        assert_eq!(game.score, Some((55, 49)));
    }

    #[test]
    fn test_map_bracket_orients_scores_to_winner() {
        let raw: PlayoffBracketDto = serde_json::from_str(
            r#"{
                "id": 1,
                "bracketName": "Winter Playoffs",
                "isCompleted": false,
                "matches": [
                    {"roundNumber": 1, "positionInRound": 1, "winnerId": 11, "isCompleted": true,
                     "game": {"homeTeamId": 6, "awayTeamId": 11, "homeScore": 40, "awayScore": 44,
                              "gameDate": "2026-03-01", "gameTime": "10:00"}},
                    {"roundNumber": 2, "positionInRound": 1, "isCompleted": false},
                    {"roundNumber": 9, "positionInRound": 1, "winnerId": 3}
                ]
            }"#,
        )
        .unwrap();
        let bracket = map_bracket(raw);
        assert_eq!(bracket.name, "Winter Playoffs");
        assert_eq!(bracket.results.len(), 1);
        let r = &bracket.results[0];
        assert_eq!(r.slot, SlotId::new(RoundKind::PlayIn, 1));
        assert_eq!((r.winning_team_id, r.winner_score, r.loser_score), (11, Some(44), Some(40)));
        assert_eq!(bracket.schedule.len(), 1);
        assert_eq!(bracket.schedule[0].1.date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[tokio::test]
    async fn test_fetch_teams_sends_season_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/teams")
            .match_query(Matcher::UrlEncoded("seasonId".into(), "3".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 1, "name": "Hoopers", "wins": 4, "losses": 1, "pointsFor": 300, "pointsAgainst": 250, "isActive": true},
                    {"id": 2, "name": "Ballers", "wins": 1, "losses": 4, "pointsFor": 240, "pointsAgainst": 290, "isActive": false}]"#,
            )
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let teams = api.fetch_teams(3).await.unwrap();
        mock.assert_async().await;
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Hoopers");
        assert!(!teams[1].is_active);
    }

    #[tokio::test]
    async fn test_fetch_bracket_404_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/public/bracket")
            .with_status(404)
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        assert!(api.fetch_bracket().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/public/seasons/current")
            .with_status(500)
            .create_async()
            .await;

        let api = LeagueApi::new(format!("{}/", server.url()));
        let err = api.fetch_current_season().await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_snapshot_for_current_season() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/public/seasons/current")
            .with_status(200)
            .with_body(r#"{"id": 5, "name": "Winter 2026", "year": 2026, "isActive": true, "playoffStartDate": "2026-03-01"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/teams")
            .match_query(Matcher::UrlEncoded("seasonId".into(), "5".into()))
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Hoopers", "wins": 0, "losses": 0, "pointsFor": 0, "pointsAgainst": 0}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/schedule/season/5")
            .with_status(200)
            .with_body(r#"[{"id": 9, "homeTeamId": 1, "homeTeamName": "Hoopers", "gameTime": "19:00:00"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/public/bracket")
            .with_status(200)
            .with_body(r#"{"id": 2, "seasonId": 4, "matches": []}"#)
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let snapshot = api.fetch_snapshot(None).await.unwrap();
        assert_eq!(snapshot.season.name, "Winter 2026");
        assert_eq!(snapshot.season.playoff_start_date, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(snapshot.teams[0].win_percentage(), 0.0);
        assert_eq!(snapshot.games[0].away_team_name, "TBD");
        // Bracket belongs to an earlier season.
        assert!(snapshot.bracket.is_none());
    }
}
