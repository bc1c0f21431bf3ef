//! The whole ranking pipeline: teams in, standings + seeds + bracket out.

use crate::bracket::{
    BracketConfig, BracketError, BracketView, OddPlayInPolicy, PinOverride, SlotId, SlotSchedule,
    build_bracket,
};
use crate::seeding::{SeedAssignment, assign_seeds, default_bye_count};
use crate::standings::{Standing, TieBreak, rank_teams};
use crate::{PersistedBracket, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-tunable playoff rules, loaded from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoffConfig {
    pub tie_break: TieBreak,
    /// `None` derives the count from the field size, see [`default_bye_count`].
    pub bye_count: Option<usize>,
    pub odd_play_in: OddPlayInPolicy,
    pub pins: Vec<PinOverride>,
}

impl PlayoffConfig {
    pub fn effective_bye_count(&self, teams: usize) -> usize {
        self.bye_count
            .unwrap_or_else(|| default_bye_count(teams, self.odd_play_in))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayoffPicture {
    pub standings: Vec<Standing>,
    pub seeds: SeedAssignment,
    pub bye_count: usize,
    /// Kept separate so a bad pin or result never hides the standings.
    pub bracket: Result<BracketView, BracketError>,
}

/// Rank active teams, seed them and build the bracket from whatever results
/// and schedule the backend has stored.
pub fn playoff_picture(
    teams: &[Team],
    config: &PlayoffConfig,
    persisted: Option<&PersistedBracket>,
) -> PlayoffPicture {
    let active: Vec<Team> = teams.iter().filter(|t| t.is_active).cloned().collect();
    let standings = rank_teams(&active, config.tie_break);
    let bye_count = config.effective_bye_count(standings.len());
    let seeds = assign_seeds(standings.clone(), bye_count);

    let bracket_config = BracketConfig {
        odd_play_in: config.odd_play_in,
        pins: config.pins.clone(),
    };
    let (results, schedule) = match persisted {
        Some(p) => (
            p.results.clone(),
            p.schedule.iter().cloned().collect::<HashMap<SlotId, SlotSchedule>>(),
        ),
        None => (Vec::new(), HashMap::new()),
    };
    let bracket = build_bracket(&seeds, &bracket_config, &results, &schedule);

    PlayoffPicture {
        standings,
        seeds,
        bye_count,
        bracket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{ReportedResult, Unavailable};
    use crate::RoundKind;

    fn team(id: u64, wins: u32, losses: u32, active: bool) -> Team {
        Team {
            id,
            name: format!("Team {id}"),
            wins,
            losses,
            is_active: active,
            ..Default::default()
        }
    }

    fn league() -> Vec<Team> {
        (1..=11).map(|id| team(id, 12 - id as u32, id as u32, true)).collect()
    }

    #[test]
    fn derives_five_byes_for_eleven_teams() {
        let picture = playoff_picture(&league(), &PlayoffConfig::default(), None);
        assert_eq!(picture.bye_count, 5);
        assert_eq!(picture.seeds.bye.len(), 5);
        assert_eq!(picture.seeds.play_in.len(), 6);
        let bracket = picture.bracket.unwrap();
        assert_eq!(bracket.bracket().unwrap().round(RoundKind::PlayIn).slots.len(), 3);
    }

    #[test]
    fn inactive_teams_are_left_out() {
        let mut teams = league();
        teams.push(team(99, 30, 0, false));
        let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
        assert_eq!(picture.standings.len(), 11);
        assert!(picture.seeds.find(99).is_none());
        assert_eq!(picture.seeds.bye[0].id(), 1);
    }

    #[test]
    fn explicit_bye_count_wins_over_derived() {
        let config = PlayoffConfig { bye_count: Some(3), ..Default::default() };
        assert_eq!(config.effective_bye_count(11), 3);
        assert_eq!(PlayoffConfig::default().effective_bye_count(20), 0);
        assert_eq!(PlayoffConfig::default().effective_bye_count(5), 3);
    }

    #[test]
    fn small_leagues_get_a_bracket_by_default() {
        for n in 4..=8u64 {
            let teams: Vec<Team> = (1..=n).map(|id| team(id, 10 - id as u32, id as u32, true)).collect();
            let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
            let view = picture.bracket.unwrap_or_else(|e| panic!("{n} teams: {e}"));
            let bracket = view.bracket().unwrap_or_else(|| panic!("{n} teams: unavailable"));
            assert_eq!(bracket.rounds.len(), 4);
            assert!(!bracket.round(RoundKind::PlayIn).slots.is_empty());
        }
    }

    #[test]
    fn eight_team_league_default_and_four_byes() {
        let teams: Vec<Team> = (1..=8).map(|id| team(id, 10 - id as u32, id as u32, true)).collect();
        let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
        assert_eq!(picture.bye_count, 6);

        let config = PlayoffConfig { bye_count: Some(4), ..Default::default() };
        let picture = playoff_picture(&teams, &config, None);
        let view = picture.bracket.unwrap();
        let play_in = &view.bracket().unwrap().round(RoundKind::PlayIn).slots;
        let pairs: Vec<_> = play_in
            .iter()
            .map(|s| (s.home_team.as_ref().map(|t| t.seed), s.away_team.as_ref().map(|t| t.seed)))
            .collect();
        assert_eq!(pairs, vec![(Some(5), Some(8)), (Some(6), Some(7))]);
    }

    #[test]
    fn small_league_reports_unavailable_with_standings() {
        let teams: Vec<Team> = (1..=3).map(|id| team(id, 5, 5, true)).collect();
        let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
        assert_eq!(picture.standings.len(), 3);
        assert_eq!(
            picture.bracket,
            Ok(BracketView::Unavailable(Unavailable::TooFewTeams { teams: 3 }))
        );
    }

    #[test]
    fn bracket_error_keeps_standings() {
        let persisted = PersistedBracket {
            results: vec![ReportedResult {
                slot: SlotId::new(RoundKind::PlayIn, 1),
                winning_team_id: 1,
                winner_score: None,
                loser_score: None,
            }],
            ..Default::default()
        };
        let picture = playoff_picture(&league(), &PlayoffConfig::default(), Some(&persisted));
        assert!(picture.bracket.is_err());
        assert_eq!(picture.standings.len(), 11);
    }

    #[test]
    fn persisted_results_flow_into_bracket() {
        let persisted = PersistedBracket {
            results: vec![ReportedResult {
                slot: SlotId::new(RoundKind::PlayIn, 1),
                winning_team_id: 11,
                winner_score: Some(44),
                loser_score: Some(40),
            }],
            schedule: vec![(
                SlotId::new(RoundKind::Quarterfinal, 1),
                SlotSchedule { location: Some("Court 2".into()), ..Default::default() },
            )],
            ..Default::default()
        };
        let picture = playoff_picture(&league(), &PlayoffConfig::default(), Some(&persisted));
        let view = picture.bracket.unwrap();
        let bracket = view.bracket().unwrap();
        let qf1 = bracket.slot(SlotId::new(RoundKind::Quarterfinal, 1)).unwrap();
        assert_eq!(qf1.away_team.as_ref().map(|t| t.id()), Some(11));
        assert_eq!(
            qf1.schedule.as_ref().and_then(|s| s.location.as_deref()),
            Some("Court 2")
        );
    }

    #[test]
    fn config_parses_from_json() {
        let json = r#"{
            "tie_break": "input_order",
            "bye_count": 4,
            "odd_play_in": "eliminate_bottom_seed",
            "pins": [{"slot": {"round": "PlayIn", "position": 1}, "side": "away", "team_id": 9}]
        }"#;
        let config: PlayoffConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tie_break, TieBreak::InputOrder);
        assert_eq!(config.bye_count, Some(4));
        assert_eq!(config.odd_play_in, OddPlayInPolicy::EliminateBottomSeed);
        assert_eq!(config.pins[0].slot, SlotId::new(RoundKind::PlayIn, 1));

        let empty: PlayoffConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PlayoffConfig::default());
    }
}
