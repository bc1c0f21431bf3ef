//! Seed assignment: rank position becomes the seed, and the top of the table
//! skips the play-in round.

use crate::bracket::{
    MAX_QUARTERFINAL_ENTRANTS, MIN_QUARTERFINAL_ENTRANTS, MIN_TEAMS, OddPlayInPolicy,
    QUARTERFINAL_SLOTS, play_in_shape,
};
use crate::standings::Standing;
use crate::{Team, TeamId};
use std::ops::RangeInclusive;

/// A ranked team with its 1-based seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededTeam {
    pub seed: u32,
    pub team: Team,
    pub win_percentage: f64,
    pub point_differential: i64,
}

impl SeededTeam {
    pub fn id(&self) -> TeamId {
        self.team.id
    }

    pub fn name(&self) -> &str {
        &self.team.name
    }
}

/// Seeded teams split into the bye partition (seeds `1..=bye_count`) and the
/// play-in partition (everyone else), both in seed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedAssignment {
    pub bye: Vec<SeededTeam>,
    pub play_in: Vec<SeededTeam>,
}

impl SeedAssignment {
    pub fn len(&self) -> usize {
        self.bye.len() + self.play_in.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bye.is_empty() && self.play_in.is_empty()
    }

    /// All teams, seed 1 first.
    pub fn all(&self) -> impl Iterator<Item = &SeededTeam> {
        self.bye.iter().chain(self.play_in.iter())
    }

    pub fn find(&self, team_id: TeamId) -> Option<&SeededTeam> {
        self.all().find(|t| t.id() == team_id)
    }
}

/// Give each standing its seed (`rank + 1`) and partition. A `bye_count`
/// larger than the field puts every team in the bye partition.
pub fn assign_seeds(ranked: Vec<Standing>, bye_count: usize) -> SeedAssignment {
    let mut assignment = SeedAssignment::default();
    for (idx, standing) in ranked.into_iter().enumerate() {
        let seeded = SeededTeam {
            seed: idx as u32 + 1,
            win_percentage: standing.win_percentage,
            point_differential: standing.point_differential,
            team: standing.team,
        };
        if idx < bye_count {
            assignment.bye.push(seeded);
        } else {
            assignment.play_in.push(seeded);
        }
    }
    assignment
}

/// Most byes that still leave a play-in game and a quarterfinal of four to
/// eight entrants. Fields too small for that settle for any playable bracket;
/// fields too large for it get no byes.
pub fn default_bye_count(n: usize, policy: OddPlayInPolicy) -> usize {
    if n < MIN_TEAMS {
        return n;
    }
    let fits = |bye_count: usize, entrants: RangeInclusive<usize>| {
        play_in_shape(n, bye_count, policy)
            .is_some_and(|(games, count)| games > 0 && entrants.contains(&count))
    };
    (0..=n)
        .rev()
        .find(|&b| fits(b, QUARTERFINAL_SLOTS..=MAX_QUARTERFINAL_ENTRANTS))
        .or_else(|| (0..=n).rev().find(|&b| fits(b, MIN_QUARTERFINAL_ENTRANTS..=MAX_QUARTERFINAL_ENTRANTS)))
        .unwrap_or(if n > 2 * MAX_QUARTERFINAL_ENTRANTS { 0 } else { n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::{TieBreak, rank_teams};

    fn league(n: u32) -> Vec<Standing> {
        let teams: Vec<Team> = (0..n)
            .map(|i| Team {
                id: u64::from(i) + 100,
                name: format!("Team {}", i + 1),
                wins: n - i,
                losses: i,
                is_active: true,
                ..Default::default()
            })
            .collect();
        rank_teams(&teams, TieBreak::default())
    }

    #[test]
    fn eleven_teams_five_byes() {
        let seeds = assign_seeds(league(11), 5);
        let bye: Vec<u32> = seeds.bye.iter().map(|t| t.seed).collect();
        let play_in: Vec<u32> = seeds.play_in.iter().map(|t| t.seed).collect();
        assert_eq!(bye, vec![1, 2, 3, 4, 5]);
        assert_eq!(play_in, vec![6, 7, 8, 9, 10, 11]);
        assert_eq!(seeds.bye[0].name(), "Team 1");
    }

    #[test]
    fn seeds_are_a_permutation_of_one_to_n() {
        for n in 0..=16 {
            for bye_count in 0..=n as usize + 2 {
                let seeds = assign_seeds(league(n), bye_count);
                let mut all: Vec<u32> = seeds.all().map(|t| t.seed).collect();
                all.sort_unstable();
                assert_eq!(all, (1..=n).collect::<Vec<_>>());
                assert_eq!(seeds.bye.len(), bye_count.min(n as usize));
            }
        }
    }

    #[test]
    fn oversized_bye_count_puts_everyone_in_bye() {
        let seeds = assign_seeds(league(3), 10);
        assert_eq!(seeds.bye.len(), 3);
        assert!(seeds.play_in.is_empty());
    }

    #[test]
    fn find_by_team_id() {
        let seeds = assign_seeds(league(6), 2);
        assert_eq!(seeds.find(103).map(|t| t.seed), Some(4));
        assert!(seeds.find(999).is_none());
    }

    #[test]
    fn derived_bye_count_fills_the_quarterfinal() {
        let policy = OddPlayInPolicy::AdvanceTopSeed;
        assert_eq!(default_bye_count(11, policy), 5);
        assert_eq!(default_bye_count(12, policy), 4);
        assert_eq!(default_bye_count(16, policy), 0);
    }

    #[test]
    fn derived_bye_count_keeps_a_play_in_game_for_small_leagues() {
        let policy = OddPlayInPolicy::AdvanceTopSeed;
        let derived: Vec<usize> = (4..=9).map(|n| default_bye_count(n, policy)).collect();
        assert_eq!(derived, vec![2, 3, 4, 5, 6, 7]);
        // Rejecting odd play-in fields steps down to an even partition.
        assert_eq!(default_bye_count(8, OddPlayInPolicy::Reject), 6);
        assert_eq!(default_bye_count(7, OddPlayInPolicy::Reject), 5);
    }

    #[test]
    fn derived_bye_count_outside_the_topology() {
        let policy = OddPlayInPolicy::AdvanceTopSeed;
        assert_eq!(default_bye_count(3, policy), 3);
        assert_eq!(default_bye_count(0, policy), 0);
        assert_eq!(default_bye_count(20, policy), 0);
        assert_eq!(default_bye_count(17, OddPlayInPolicy::EliminateBottomSeed), 0);
    }
}
