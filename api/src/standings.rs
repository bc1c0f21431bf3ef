//! Standings ranker: win percentage first, then a configurable tie-break.

use crate::Team;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// `wins / (wins + losses)`; `0.0` when no games were played.
pub fn win_percentage(wins: u32, losses: u32) -> f64 {
    let games = u64::from(wins) + u64::from(losses);
    if games == 0 {
        0.0
    } else {
        f64::from(wins) / games as f64
    }
}

/// How two teams with the same win percentage are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Point differential, then points scored. Still-equal teams keep input order.
    #[default]
    PointDifferential,
    /// Keep the order teams arrived in.
    InputOrder,
}

impl TieBreak {
    pub fn label(&self) -> &'static str {
        match self {
            TieBreak::PointDifferential => "point differential",
            TieBreak::InputOrder => "input order",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TieBreak::PointDifferential => TieBreak::InputOrder,
            TieBreak::InputOrder => TieBreak::PointDifferential,
        }
    }
}

/// A team in ranked position with its derived numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub team: Team,
    pub win_percentage: f64,
    pub point_differential: i64,
}

impl Standing {
    pub fn new(team: Team) -> Self {
        Self {
            win_percentage: team.win_percentage(),
            point_differential: team.point_differential(),
            team,
        }
    }
}

/// Rank teams by descending win percentage. Pure and stable, so ranking an
/// already-ranked list reproduces it.
pub fn rank_teams(teams: &[Team], tie_break: TieBreak) -> Vec<Standing> {
    let mut standings: Vec<Standing> = teams.iter().cloned().map(Standing::new).collect();
    standings.sort_by(|a, b| compare_teams(&a.team, &b.team, tie_break));
    standings
}

/// Ordering used by [`rank_teams`]: `Less` means `a` ranks ahead of `b`.
pub fn compare_teams(a: &Team, b: &Team, tie_break: TieBreak) -> Ordering {
    let by_pct = compare_win_percentage(b, a);
    match tie_break {
        TieBreak::InputOrder => by_pct,
        TieBreak::PointDifferential => by_pct
            .then_with(|| b.point_differential().cmp(&a.point_differential()))
            .then_with(|| b.points_for.cmp(&a.points_for)),
    }
}

/// Exact comparison of `a.wins / a.games` against `b.wins / b.games` by
/// cross-multiplying. A team without games compares as `0 / 1`.
fn compare_win_percentage(a: &Team, b: &Team) -> Ordering {
    let a_games = u128::from(a.games_played().max(1));
    let b_games = u128::from(b.games_played().max(1));
    (u128::from(a.wins) * b_games).cmp(&(u128::from(b.wins) * a_games))
}

// ---------------------------------------------------------------------------
// Display sorting for the standings table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    /// Ranked order; seeds read top to bottom.
    #[default]
    Rank,
    Name,
    Wins,
    Losses,
    WinPercentage,
    PointsFor,
    PointsAgainst,
    PointDifferential,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        SortColumn::Rank,
        SortColumn::Name,
        SortColumn::Wins,
        SortColumn::Losses,
        SortColumn::WinPercentage,
        SortColumn::PointsFor,
        SortColumn::PointsAgainst,
        SortColumn::PointDifferential,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Rank => "Seed",
            SortColumn::Name => "Team",
            SortColumn::Wins => "W",
            SortColumn::Losses => "L",
            SortColumn::WinPercentage => "PCT",
            SortColumn::PointsFor => "PF",
            SortColumn::PointsAgainst => "PA",
            SortColumn::PointDifferential => "DIFF",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Re-sort ranked standings for display. `ranked` must be in ranked order;
/// the returned indices point into it, so seeds stay attached to rows.
pub fn display_order(ranked: &[Standing], column: SortColumn, order: SortOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..ranked.len()).collect();
    if column == SortColumn::Rank {
        if order == SortOrder::Ascending {
            idx.reverse();
        }
        return idx;
    }

    idx.sort_by(|&i, &j| {
        let (a, b) = (&ranked[i].team, &ranked[j].team);
        let ord = match column {
            SortColumn::Rank => i.cmp(&j),
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Wins => a.wins.cmp(&b.wins),
            SortColumn::Losses => a.losses.cmp(&b.losses),
            SortColumn::WinPercentage => compare_win_percentage(a, b),
            SortColumn::PointsFor => a.points_for.cmp(&b.points_for),
            SortColumn::PointsAgainst => a.points_against.cmp(&b.points_against),
            SortColumn::PointDifferential => a.point_differential().cmp(&b.point_differential()),
        };
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
        .then_with(|| i.cmp(&j))
    });
    idx
}
