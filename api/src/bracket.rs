//! Playoff bracket construction.
//!
//! The topology is fixed: play-in, quarterfinal, semifinal, championship.
//! Slots live in a per-round arena addressed by [`SlotId`]; later rounds refer
//! to earlier slots by id ("winner of QF2") and resolve to a concrete team once
//! that slot has a reported result. Everything is rebuilt from scratch on each
//! call, so there is no incremental state to keep consistent.

use crate::seeding::{SeedAssignment, SeededTeam};
use crate::{RoundKind, TeamId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Smallest field that can fill the four-round topology.
pub const MIN_TEAMS: usize = 4;
pub const QUARTERFINAL_SLOTS: usize = 4;
pub const MIN_QUARTERFINAL_ENTRANTS: usize = 2;
pub const MAX_QUARTERFINAL_ENTRANTS: usize = 2 * QUARTERFINAL_SLOTS;

/// Quarterfinal slot for each entrant rank when fewer than four entrants
/// remain. QF2 (and QF4) stay empty so the top entrants get the semifinal byes.
const SHORT_FIELD_SLOTS: [usize; QUARTERFINAL_SLOTS] = [0, 2, 3, 1];

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable slot identity: round plus 1-based position within the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId {
    pub round: RoundKind,
    pub position: u8,
}

impl SlotId {
    pub const fn new(round: RoundKind, position: u8) -> Self {
        Self { round, position }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.round.code(), self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// Who occupies one side of a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Participant {
    Team(SeededTeam),
    WinnerOf(SlotId),
    Bye,
}

// ---------------------------------------------------------------------------
// External inputs: results, schedule, configuration
// ---------------------------------------------------------------------------

/// A finished game as reported by the league office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedResult {
    pub slot: SlotId,
    pub winning_team_id: TeamId,
    pub winner_score: Option<u16>,
    pub loser_score: Option<u16>,
}

/// A validated result, oriented to the slot's home/away sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotResult {
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub winning_team_id: TeamId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
}

/// What to do when the play-in partition has an odd number of teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddPlayInPolicy {
    /// Best play-in seed goes straight to the quarterfinal.
    #[default]
    AdvanceTopSeed,
    /// Worst play-in seed is left out of the bracket.
    EliminateBottomSeed,
    /// Refuse to build.
    Reject,
}

impl OddPlayInPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            OddPlayInPolicy::AdvanceTopSeed => "advance top seed",
            OddPlayInPolicy::EliminateBottomSeed => "eliminate bottom seed",
            OddPlayInPolicy::Reject => "reject",
        }
    }

    pub fn next(self) -> Self {
        match self {
            OddPlayInPolicy::AdvanceTopSeed => OddPlayInPolicy::EliminateBottomSeed,
            OddPlayInPolicy::EliminateBottomSeed => OddPlayInPolicy::Reject,
            OddPlayInPolicy::Reject => OddPlayInPolicy::AdvanceTopSeed,
        }
    }
}

/// Place `team_id` on `side` of `slot`, overriding the seed-derived placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinOverride {
    pub slot: SlotId,
    pub side: Side,
    pub team_id: TeamId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketConfig {
    pub odd_play_in: OddPlayInPolicy,
    pub pins: Vec<PinOverride>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BracketSlot {
    pub id: SlotId,
    pub home: Participant,
    pub away: Participant,
    /// Concrete team on each side; `None` while undetermined or for a bye.
    pub home_team: Option<SeededTeam>,
    pub away_team: Option<SeededTeam>,
    pub result: Option<SlotResult>,
    pub schedule: Option<SlotSchedule>,
}

impl BracketSlot {
    fn new(id: SlotId, home: Participant, away: Participant) -> Self {
        Self {
            id,
            home,
            away,
            home_team: None,
            away_team: None,
            result: None,
            schedule: None,
        }
    }

    pub fn round(&self) -> RoundKind {
        self.id.round
    }

    /// A bye has a single entrant and no game to play.
    pub fn is_bye(&self) -> bool {
        matches!(self.home, Participant::Bye) || matches!(self.away, Participant::Bye)
    }

    /// Both sides are byes: nobody enters and nobody advances.
    pub fn is_empty(&self) -> bool {
        matches!(self.home, Participant::Bye) && matches!(self.away, Participant::Bye)
    }

    pub fn state(&self) -> SlotState {
        if self.is_bye() || self.result.is_some() {
            SlotState::Completed
        } else {
            SlotState::Pending
        }
    }

    /// Both teams known and no result yet.
    pub fn is_playable(&self) -> bool {
        !self.is_bye() && self.result.is_none() && self.home_team.is_some() && self.away_team.is_some()
    }

    pub fn participant(&self, side: Side) -> &Participant {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team(&self, side: Side) -> Option<&SeededTeam> {
        match side {
            Side::Home => self.home_team.as_ref(),
            Side::Away => self.away_team.as_ref(),
        }
    }

    fn participant_mut(&mut self, side: Side) -> &mut Participant {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// The team that moves on from this slot, if decided.
    pub fn winner(&self) -> Option<&SeededTeam> {
        if self.is_bye() {
            return self.home_team.as_ref().or(self.away_team.as_ref());
        }
        let result = self.result.as_ref()?;
        [self.home_team.as_ref(), self.away_team.as_ref()]
            .into_iter()
            .flatten()
            .find(|t| t.id() == result.winning_team_id)
    }

    pub fn loser(&self) -> Option<&SeededTeam> {
        let winner = self.winner()?.id();
        if self.is_bye() {
            return None;
        }
        [self.home_team.as_ref(), self.away_team.as_ref()]
            .into_iter()
            .flatten()
            .find(|t| t.id() != winner)
    }

    fn validate(&self, reported: &ReportedResult) -> Result<SlotResult, BracketError> {
        if self.is_bye() {
            return Err(BracketError::ResultForBye { slot: self.id });
        }
        let (Some(home), Some(away)) = (&self.home_team, &self.away_team) else {
            return Err(BracketError::UnresolvedResult { slot: self.id });
        };
        if let (Some(w), Some(l)) = (reported.winner_score, reported.loser_score)
            && w < l
        {
            return Err(BracketError::InconsistentScore { slot: self.id, winner: w, loser: l });
        }
        let winner = reported.winning_team_id;
        if winner == home.id() {
            Ok(SlotResult {
                home_score: reported.winner_score,
                away_score: reported.loser_score,
                winning_team_id: winner,
            })
        } else if winner == away.id() {
            Ok(SlotResult {
                home_score: reported.loser_score,
                away_score: reported.winner_score,
                winning_team_id: winner,
            })
        } else {
            Err(BracketError::WinnerNotInSlot { slot: self.id, team_id: winner })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub kind: RoundKind,
    pub slots: Vec<BracketSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    /// Always four rounds, in [`RoundKind::ALL`] order.
    pub rounds: Vec<Round>,
    /// Teams left out by [`OddPlayInPolicy::EliminateBottomSeed`].
    pub eliminated: Vec<SeededTeam>,
}

impl Bracket {
    pub fn round(&self, kind: RoundKind) -> &Round {
        &self.rounds[kind.index()]
    }

    pub fn slot(&self, id: SlotId) -> Option<&BracketSlot> {
        let idx = usize::from(id.position).checked_sub(1)?;
        self.rounds.get(id.round.index())?.slots.get(idx)
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut BracketSlot> {
        let idx = usize::from(id.position).checked_sub(1)?;
        self.rounds.get_mut(id.round.index())?.slots.get_mut(idx)
    }

    pub fn slots(&self) -> impl Iterator<Item = &BracketSlot> {
        self.rounds.iter().flat_map(|r| r.slots.iter())
    }

    pub fn champion(&self) -> Option<&SeededTeam> {
        self.round(RoundKind::Championship).slots.first()?.winner()
    }

    /// Every real game has a result.
    pub fn is_completed(&self) -> bool {
        self.slots().all(|s| s.state() == SlotState::Completed)
    }

    /// Earliest round that still has a game to play.
    pub fn current_round(&self) -> Option<RoundKind> {
        self.rounds
            .iter()
            .find(|r| r.slots.iter().any(|s| s.state() == SlotState::Pending))
            .map(|r| r.kind)
    }

    /// Placeholder text for a participant: "(3) Name", "BYE", or
    /// "Winner of 6v11" when the feeder pairs two seeded teams.
    pub fn describe(&self, participant: &Participant) -> String {
        match participant {
            Participant::Team(t) => format!("({}) {}", t.seed, t.name()),
            Participant::Bye => "BYE".to_string(),
            Participant::WinnerOf(id) => match self.slot(*id).map(|s| (&s.home, &s.away)) {
                Some((Participant::Team(h), Participant::Team(a))) => {
                    format!("Winner of {}v{}", h.seed, a.seed)
                }
                _ => format!("Winner of {id}"),
            },
        }
    }

    /// Resolved team for one side of a slot, falling back to [`Self::describe`].
    pub fn side_label(&self, slot: &BracketSlot, side: Side) -> String {
        match slot.team(side) {
            Some(t) => format!("({}) {}", t.seed, t.name()),
            None => self.describe(slot.participant(side)),
        }
    }

    fn locate_team(&self, team_id: TeamId) -> Option<(SlotId, Side)> {
        self.rounds[..=RoundKind::Quarterfinal.index()]
            .iter()
            .flat_map(|r| r.slots.iter())
            .flat_map(|s| [(s, Side::Home), (s, Side::Away)])
            .find(|(s, side)| {
                matches!(s.participant(*side), Participant::Team(t) if t.id() == team_id)
            })
            .map(|(s, side)| (s.id, side))
    }

    fn apply_pins(&mut self, pins: &[PinOverride], seeds: &SeedAssignment) -> Result<(), BracketError> {
        let mut seen_teams = HashSet::new();
        let mut seen_targets = HashSet::new();
        for pin in pins {
            if !seen_teams.insert(pin.team_id) || !seen_targets.insert((pin.slot, pin.side)) {
                return Err(BracketError::DuplicatePin { team_id: pin.team_id, slot: pin.slot });
            }
        }

        for pin in pins {
            if !matches!(pin.slot.round, RoundKind::PlayIn | RoundKind::Quarterfinal) {
                return Err(BracketError::PinTargetNotTeam { slot: pin.slot, side: pin.side });
            }
            if seeds.find(pin.team_id).is_none() {
                return Err(BracketError::UnknownTeam { team_id: pin.team_id });
            }
            let target = self
                .slot(pin.slot)
                .ok_or(BracketError::UnknownSlot { slot: pin.slot })?;
            if !matches!(target.participant(pin.side), Participant::Team(_)) {
                return Err(BracketError::PinTargetNotTeam { slot: pin.slot, side: pin.side });
            }
            let (from_slot, from_side) = self
                .locate_team(pin.team_id)
                .ok_or(BracketError::PinnedTeamNotPlaced { team_id: pin.team_id })?;
            if (from_slot, from_side) == (pin.slot, pin.side) {
                continue;
            }

            let moving = self.take_participant(from_slot, from_side);
            let displaced = self.take_participant(pin.slot, pin.side);
            self.put_participant(pin.slot, pin.side, moving);
            self.put_participant(from_slot, from_side, displaced);
        }
        Ok(())
    }

    fn take_participant(&mut self, id: SlotId, side: Side) -> Participant {
        match self.slot_mut(id) {
            Some(slot) => std::mem::replace(slot.participant_mut(side), Participant::Bye),
            None => Participant::Bye,
        }
    }

    fn put_participant(&mut self, id: SlotId, side: Side, participant: Participant) {
        if let Some(slot) = self.slot_mut(id) {
            *slot.participant_mut(side) = participant;
        }
    }

    fn resolve(&mut self, results: &[ReportedResult]) -> Result<(), BracketError> {
        let mut by_slot: HashMap<SlotId, &ReportedResult> = HashMap::new();
        for reported in results {
            if self.slot(reported.slot).is_none() {
                return Err(BracketError::UnknownSlot { slot: reported.slot });
            }
            if by_slot.insert(reported.slot, reported).is_some() {
                return Err(BracketError::DuplicateResult { slot: reported.slot });
            }
        }

        // Round order guarantees every feeder is settled before it is read.
        for round_idx in 0..self.rounds.len() {
            for slot_idx in 0..self.rounds[round_idx].slots.len() {
                let home_team = self.resolve_participant(&self.rounds[round_idx].slots[slot_idx].home);
                let away_team = self.resolve_participant(&self.rounds[round_idx].slots[slot_idx].away);

                let slot = &mut self.rounds[round_idx].slots[slot_idx];
                slot.home_team = home_team;
                slot.away_team = away_team;
                if let Some(reported) = by_slot.get(&slot.id) {
                    slot.result = Some(slot.validate(reported)?);
                }
            }
        }
        Ok(())
    }

    fn resolve_participant(&self, participant: &Participant) -> Option<SeededTeam> {
        match participant {
            Participant::Team(t) => Some(t.clone()),
            Participant::Bye => None,
            Participant::WinnerOf(id) => self.slot(*id).and_then(|s| s.winner()).cloned(),
        }
    }

    fn attach_schedule(&mut self, schedule: &HashMap<SlotId, SlotSchedule>) {
        for (id, meta) in schedule {
            if let Some(slot) = self.slot_mut(*id) {
                slot.schedule = Some(meta.clone());
            }
        }
    }
}

/// Why no bracket can be drawn yet. Not an error: the league is simply too
/// small or the configuration leaves nobody to play in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    TooFewTeams { teams: usize },
    NoPlayInRound,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::TooFewTeams { teams } => write!(
                f,
                "Not enough teams for playoffs ({teams} active, at least {MIN_TEAMS} needed)"
            ),
            Unavailable::NoPlayInRound => write!(f, "No play-in games with the current bye count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BracketView {
    Available(Bracket),
    Unavailable(Unavailable),
}

impl BracketView {
    pub fn bracket(&self) -> Option<&Bracket> {
        match self {
            BracketView::Available(b) => Some(b),
            BracketView::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    DuplicateTeam { team_id: TeamId },
    OddPlayIn { teams: usize },
    QuarterfinalEntrants { entrants: usize },
    UnknownSlot { slot: SlotId },
    UnknownTeam { team_id: TeamId },
    PinTargetNotTeam { slot: SlotId, side: Side },
    DuplicatePin { team_id: TeamId, slot: SlotId },
    PinnedTeamNotPlaced { team_id: TeamId },
    ResultForBye { slot: SlotId },
    UnresolvedResult { slot: SlotId },
    WinnerNotInSlot { slot: SlotId, team_id: TeamId },
    InconsistentScore { slot: SlotId, winner: u16, loser: u16 },
    DuplicateResult { slot: SlotId },
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::DuplicateTeam { team_id } => write!(f, "Team {team_id} appears more than once"),
            BracketError::OddPlayIn { teams } => {
                write!(f, "Odd number of play-in teams ({teams}) and odd play-in policy is reject")
            }
            BracketError::QuarterfinalEntrants { entrants } => write!(
                f,
                "Bye count yields {entrants} quarterfinal entrants, expected {MIN_QUARTERFINAL_ENTRANTS} to {MAX_QUARTERFINAL_ENTRANTS}"
            ),
            BracketError::UnknownSlot { slot } => write!(f, "Unknown bracket slot {slot}"),
            BracketError::UnknownTeam { team_id } => write!(f, "Unknown team {team_id}"),
            BracketError::PinTargetNotTeam { slot, side } => {
                write!(f, "Cannot pin to {slot} {side:?}: not a seeded team position")
            }
            BracketError::DuplicatePin { team_id, slot } => {
                write!(f, "Conflicting pins for team {team_id} / slot {slot}")
            }
            BracketError::PinnedTeamNotPlaced { team_id } => {
                write!(f, "Pinned team {team_id} has no place in the bracket")
            }
            BracketError::ResultForBye { slot } => write!(f, "Result reported for bye {slot}"),
            BracketError::UnresolvedResult { slot } => {
                write!(f, "Result reported for {slot} before both teams are known")
            }
            BracketError::WinnerNotInSlot { slot, team_id } => {
                write!(f, "Team {team_id} did not play in {slot}")
            }
            BracketError::InconsistentScore { slot, winner, loser } => {
                write!(f, "Score for {slot} has the winner losing ({winner}-{loser})")
            }
            BracketError::DuplicateResult { slot } => write!(f, "More than one result for {slot}"),
        }
    }
}

impl std::error::Error for BracketError {}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Play-in games and quarterfinal entrants for `teams` seeds of which
/// `bye_count` skip the play-in, or `None` when `policy` refuses the field.
pub fn play_in_shape(teams: usize, bye_count: usize, policy: OddPlayInPolicy) -> Option<(usize, usize)> {
    let bye = bye_count.min(teams);
    let play_in = teams - bye;
    let advanced = match (play_in % 2, policy) {
        (0, _) | (_, OddPlayInPolicy::EliminateBottomSeed) => 0,
        (_, OddPlayInPolicy::AdvanceTopSeed) => 1,
        (_, OddPlayInPolicy::Reject) => return None,
    };
    let games = play_in / 2;
    Some((games, bye + advanced + games))
}

struct PlayInField {
    games: Vec<(SeededTeam, SeededTeam)>,
    advanced: Option<SeededTeam>,
    eliminated: Option<SeededTeam>,
}

/// Fold the play-in partition: best remaining seed hosts worst remaining seed.
fn fold_play_in(play_in: &[SeededTeam], policy: OddPlayInPolicy) -> Result<PlayInField, BracketError> {
    let mut pool: Vec<SeededTeam> = play_in.to_vec();
    let mut advanced = None;
    let mut eliminated = None;
    if pool.len() % 2 == 1 {
        match policy {
            OddPlayInPolicy::AdvanceTopSeed => advanced = Some(pool.remove(0)),
            OddPlayInPolicy::EliminateBottomSeed => eliminated = pool.pop(),
            OddPlayInPolicy::Reject => return Err(BracketError::OddPlayIn { teams: pool.len() }),
        }
    }

    let half = pool.len() / 2;
    let low: Vec<SeededTeam> = pool.split_off(half);
    let games = pool.into_iter().zip(low.into_iter().rev()).collect();
    Ok(PlayInField { games, advanced, eliminated })
}

/// Entrants in seed order. A full field pairs best with worst (1 v 8, 2 v 7,
/// ...); a short field fills home sides along [`SHORT_FIELD_SLOTS`].
fn place_quarterfinals(entrants: Vec<Participant>) -> Vec<BracketSlot> {
    let short = entrants.len() < QUARTERFINAL_SLOTS;
    let mut sides: Vec<Option<Participant>> = vec![None; MAX_QUARTERFINAL_ENTRANTS];
    for (rank, entrant) in entrants.into_iter().enumerate() {
        let idx = if short { SHORT_FIELD_SLOTS[rank] } else { rank };
        sides[idx] = Some(entrant);
    }
    (0..QUARTERFINAL_SLOTS)
        .zip(1u8..)
        .map(|(q, position)| {
            let home = sides[q].take().unwrap_or(Participant::Bye);
            let away = sides[MAX_QUARTERFINAL_ENTRANTS - 1 - q].take().unwrap_or(Participant::Bye);
            BracketSlot::new(SlotId::new(RoundKind::Quarterfinal, position), home, away)
        })
        .collect()
}

/// Feeder reference into `round`; an empty slot sends a bye forward.
fn winner_of(round: &[BracketSlot], idx: usize) -> Participant {
    match round.get(idx) {
        Some(slot) if !slot.is_empty() => Participant::WinnerOf(slot.id),
        _ => Participant::Bye,
    }
}

fn check_unique(seeds: &SeedAssignment) -> Result<(), BracketError> {
    let mut seen = HashSet::new();
    for team in seeds.all() {
        if !seen.insert(team.id()) {
            return Err(BracketError::DuplicateTeam { team_id: team.id() });
        }
    }
    Ok(())
}

/// Build the bracket for a seeded field.
///
/// Returns `Ok(BracketView::Unavailable)` when the field cannot fill four
/// rounds, and `Err` for inputs that contradict each other (duplicate teams,
/// bad pins, results that do not fit the bracket).
pub fn build_bracket(
    seeds: &SeedAssignment,
    config: &BracketConfig,
    results: &[ReportedResult],
    schedule: &HashMap<SlotId, SlotSchedule>,
) -> Result<BracketView, BracketError> {
    check_unique(seeds)?;

    let teams = seeds.len();
    if teams < MIN_TEAMS {
        return Ok(BracketView::Unavailable(Unavailable::TooFewTeams { teams }));
    }
    if seeds.play_in.is_empty() {
        return Ok(BracketView::Unavailable(Unavailable::NoPlayInRound));
    }

    let field = fold_play_in(&seeds.play_in, config.odd_play_in)?;
    if field.games.is_empty() {
        return Ok(BracketView::Unavailable(Unavailable::NoPlayInRound));
    }

    let entrant_count = seeds.bye.len() + usize::from(field.advanced.is_some()) + field.games.len();
    if !(MIN_QUARTERFINAL_ENTRANTS..=MAX_QUARTERFINAL_ENTRANTS).contains(&entrant_count) {
        return Err(BracketError::QuarterfinalEntrants { entrants: entrant_count });
    }

    // Quarterfinal entrants keyed by seed; a play-in game counts as its away seed.
    let mut entrants: Vec<(u32, Participant)> = seeds
        .bye
        .iter()
        .chain(field.advanced.iter())
        .map(|t| (t.seed, Participant::Team(t.clone())))
        .collect();

    let mut play_in_slots = Vec::with_capacity(field.games.len());
    for (position, (home, away)) in (1u8..).zip(field.games) {
        let id = SlotId::new(RoundKind::PlayIn, position);
        entrants.push((away.seed, Participant::WinnerOf(id)));
        play_in_slots.push(BracketSlot::new(id, Participant::Team(home), Participant::Team(away)));
    }
    entrants.sort_by_key(|(seed, _)| *seed);

    let quarterfinals = place_quarterfinals(entrants.into_iter().map(|(_, p)| p).collect());
    let semifinals = vec![
        BracketSlot::new(
            SlotId::new(RoundKind::Semifinal, 1),
            winner_of(&quarterfinals, 0),
            winner_of(&quarterfinals, 1),
        ),
        BracketSlot::new(
            SlotId::new(RoundKind::Semifinal, 2),
            winner_of(&quarterfinals, 2),
            winner_of(&quarterfinals, 3),
        ),
    ];
    let championship = vec![BracketSlot::new(
        SlotId::new(RoundKind::Championship, 1),
        winner_of(&semifinals, 0),
        winner_of(&semifinals, 1),
    )];

    let mut bracket = Bracket {
        rounds: vec![
            Round { kind: RoundKind::PlayIn, slots: play_in_slots },
            Round { kind: RoundKind::Quarterfinal, slots: quarterfinals },
            Round { kind: RoundKind::Semifinal, slots: semifinals },
            Round { kind: RoundKind::Championship, slots: championship },
        ],
        eliminated: field.eliminated.into_iter().collect(),
    };

    bracket.apply_pins(&config.pins, seeds)?;
    bracket.resolve(results)?;
    bracket.attach_schedule(schedule);
    Ok(BracketView::Available(bracket))
}
