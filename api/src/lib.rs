pub mod bracket;
pub mod client;
pub mod playoffs;
pub mod seeding;
pub mod standings;
pub mod wire;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub use bracket::{
    Bracket, BracketConfig, BracketError, BracketSlot, BracketView, OddPlayInPolicy, Participant,
    PinOverride, ReportedResult, Round, Side, SlotId, SlotResult, SlotSchedule, SlotState,
    Unavailable, build_bracket,
};
pub use client::{ApiError, ApiResult, LeagueApi};
pub use playoffs::{PlayoffConfig, PlayoffPicture, playoff_picture};
pub use seeding::{SeedAssignment, SeededTeam, assign_seeds, default_bye_count};
pub use standings::{SortColumn, SortOrder, Standing, TieBreak, rank_teams, win_percentage};

pub type TeamId = u64;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// One team's season record. Owned by the league backend; we only read snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub season_id: Option<u64>,
    pub name: String,
    pub city: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub is_active: bool,
}

impl Team {
    pub fn games_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// `wins / (wins + losses)`, or exactly `0.0` before the first game.
    pub fn win_percentage(&self) -> f64 {
        win_percentage(self.wins, self.losses)
    }

    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Season {
    pub id: u64,
    pub name: String,
    pub year: Option<u16>,
    pub is_active: bool,
    pub playoff_start_date: Option<NaiveDate>,
}

/// Ordered playoff rounds. The topology is fixed: every bracket has all four.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RoundKind {
    #[default]
    PlayIn,
    Quarterfinal,
    Semifinal,
    Championship,
}

impl RoundKind {
    pub const ALL: [RoundKind; 4] = [
        RoundKind::PlayIn,
        RoundKind::Quarterfinal,
        RoundKind::Semifinal,
        RoundKind::Championship,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoundKind::PlayIn => "Play-in Round",
            RoundKind::Quarterfinal => "Quarterfinals",
            RoundKind::Semifinal => "Semifinals",
            RoundKind::Championship => "Championship",
        }
    }

    /// Short code used in slot ids ("PI1", "QF3", ...).
    pub fn code(&self) -> &'static str {
        match self {
            RoundKind::PlayIn => "PI",
            RoundKind::Quarterfinal => "QF",
            RoundKind::Semifinal => "SF",
            RoundKind::Championship => "CH",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RoundKind::PlayIn => 0,
            RoundKind::Quarterfinal => 1,
            RoundKind::Semifinal => 2,
            RoundKind::Championship => 3,
        }
    }

    /// Backend `roundNumber` (1-based) to round. Anything past the final is unknown.
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            1 => Some(RoundKind::PlayIn),
            2 => Some(RoundKind::Quarterfinal),
            3 => Some(RoundKind::Semifinal),
            4 => Some(RoundKind::Championship),
            _ => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            RoundKind::PlayIn => None,
            RoundKind::Quarterfinal => Some(RoundKind::PlayIn),
            RoundKind::Semifinal => Some(RoundKind::Quarterfinal),
            RoundKind::Championship => Some(RoundKind::Semifinal),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RoundKind::PlayIn => Some(RoundKind::Quarterfinal),
            RoundKind::Quarterfinal => Some(RoundKind::Semifinal),
            RoundKind::Semifinal => Some(RoundKind::Championship),
            RoundKind::Championship => None,
        }
    }
}

/// A regular-season game, shown on the schedule tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledGame {
    pub id: u64,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub home_team_name: String,
    pub away_team_name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub week: Option<u32>,
    pub status: GameStatus,
    pub score: Option<(u16, u16)>, // (home_score, away_score)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Scheduled,
    Final,
}

/// Bracket data the backend has stored, keyed by our slot ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedBracket {
    pub id: u64,
    pub season_id: Option<u64>,
    pub name: String,
    pub is_completed: bool,
    pub results: Vec<ReportedResult>,
    pub schedule: Vec<(SlotId, SlotSchedule)>,
}

/// Everything one refresh pulls from the backend.
#[derive(Debug, Clone, Default)]
pub struct LeagueSnapshot {
    pub season: Season,
    pub teams: Vec<Team>,
    pub games: Vec<ScheduledGame>,
    pub bracket: Option<PersistedBracket>,
}
