use crate::app::MenuItem;
use league_api::standings::display_order;
use league_api::{Bracket, LeagueSnapshot, PlayoffPicture, RoundKind, SlotId, SortColumn, SortOrder, Standing};

// ---------------------------------------------------------------------------
// Standings table state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StandingsState {
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
    /// Row cursor, as a position in `order`.
    pub selected: usize,
    /// Display order: indices into the ranked standings.
    pub order: Vec<usize>,
}

impl StandingsState {
    pub fn resort(&mut self, standings: &[Standing]) {
        self.order = display_order(standings, self.sort_column, self.sort_order);
        self.selected = self.selected.min(self.order.len().saturating_sub(1));
    }

    pub fn cycle_column(&mut self, standings: &[Standing]) {
        self.sort_column = self.sort_column.next();
        self.sort_order = match self.sort_column {
            SortColumn::Name | SortColumn::Losses | SortColumn::PointsAgainst => SortOrder::Ascending,
            _ => SortOrder::Descending,
        };
        self.resort(standings);
    }

    pub fn toggle_order(&mut self, standings: &[Standing]) {
        self.sort_order = self.sort_order.toggle();
        self.resort(standings);
    }

    pub fn reset_sort(&mut self, standings: &[Standing]) {
        self.sort_column = SortColumn::Rank;
        self.sort_order = SortOrder::Descending;
        self.resort(standings);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.order.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Index into the ranked standings of the highlighted row.
    pub fn selected_index(&self) -> Option<usize> {
        self.order.get(self.selected).copied()
    }
}

// ---------------------------------------------------------------------------
// Bracket navigation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    /// The round the user has navigated to.
    pub view_round: RoundKind,
    /// Slot index within `view_round` (0-based).
    pub selected_slot: usize,
}

impl BracketState {
    /// Jump to the round that still has games to play, or the final once done.
    pub fn reset(&mut self, bracket: Option<&Bracket>) {
        self.view_round = bracket
            .map(|b| b.current_round().unwrap_or(RoundKind::Championship))
            .unwrap_or_default();
        self.selected_slot = 0;
    }

    /// Keep the cursor inside the bracket after a rebuild.
    pub fn clamp(&mut self, bracket: Option<&Bracket>) {
        let len = bracket.map(|b| b.round(self.view_round).slots.len()).unwrap_or(0);
        self.selected_slot = self.selected_slot.min(len.saturating_sub(1));
    }

    pub fn navigate_round_next(&mut self, bracket: Option<&Bracket>) {
        if let Some(next) = self.view_round.next() {
            self.view_round = next;
            self.clamp(bracket);
        }
    }

    pub fn navigate_round_prev(&mut self, bracket: Option<&Bracket>) {
        if let Some(prev) = self.view_round.prev() {
            self.view_round = prev;
            self.clamp(bracket);
        }
    }

    pub fn navigate_slot_down(&mut self, bracket: Option<&Bracket>) {
        let len = bracket.map(|b| b.round(self.view_round).slots.len()).unwrap_or(0);
        if self.selected_slot + 1 < len {
            self.selected_slot += 1;
        }
    }

    pub fn navigate_slot_up(&mut self) {
        self.selected_slot = self.selected_slot.saturating_sub(1);
    }

    pub fn selected_slot_id(&self) -> SlotId {
        SlotId::new(self.view_round, self.selected_slot as u8 + 1)
    }
}

// ---------------------------------------------------------------------------
// Schedule state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScheduleState {
    pub scroll_offset: u16,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<String>,
    pub snapshot: Option<LeagueSnapshot>,
    /// Recomputed from `snapshot` and the playoff settings, never edited in place.
    pub picture: Option<PlayoffPicture>,
    pub standings: StandingsState,
    pub bracket: BracketState,
    pub schedule: ScheduleState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        built_bracket(&self.picture)
    }

    pub fn ranked(&self) -> &[Standing] {
        self.picture.as_ref().map(|p| p.standings.as_slice()).unwrap_or(&[])
    }
}

/// The drawable bracket, if the picture produced one.
pub fn built_bracket(picture: &Option<PlayoffPicture>) -> Option<&Bracket> {
    picture
        .as_ref()
        .and_then(|p| p.bracket.as_ref().ok())
        .and_then(|view| view.bracket())
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_api::{TieBreak, Team, rank_teams};

    fn ranked() -> Vec<Standing> {
        let teams = vec![
            Team { id: 1, name: "Zephyrs".into(), wins: 8, losses: 2, points_for: 600, points_against: 500, ..Default::default() },
            Team { id: 2, name: "Aces".into(), wins: 5, losses: 5, points_for: 650, points_against: 640, ..Default::default() },
            Team { id: 3, name: "Mavens".into(), wins: 2, losses: 8, points_for: 480, points_against: 610, ..Default::default() },
        ];
        rank_teams(&teams, TieBreak::default())
    }

    #[test]
    fn resort_keeps_rank_order_by_default() {
        let standings = ranked();
        let mut state = StandingsState::default();
        state.resort(&standings);
        assert_eq!(state.order, vec![0, 1, 2]);
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn cycling_to_name_sorts_alphabetically() {
        let standings = ranked();
        let mut state = StandingsState::default();
        state.resort(&standings);
        state.cycle_column(&standings);
        assert_eq!(state.sort_column, SortColumn::Name);
        assert_eq!(state.order, vec![1, 2, 0]);

        state.toggle_order(&standings);
        assert_eq!(state.order, vec![0, 2, 1]);

        state.reset_sort(&standings);
        assert_eq!(state.order, vec![0, 1, 2]);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let standings = ranked();
        let mut state = StandingsState::default();
        state.resort(&standings);
        for _ in 0..10 {
            state.move_down();
        }
        assert_eq!(state.selected, 2);
        state.resort(&standings[..1]);
        assert_eq!(state.selected, 0);
        state.move_up();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn bracket_state_without_bracket_stays_put() {
        let mut state = BracketState::default();
        state.reset(None);
        assert_eq!(state.view_round, RoundKind::PlayIn);
        state.navigate_slot_down(None);
        assert_eq!(state.selected_slot, 0);
        state.navigate_round_next(None);
        assert_eq!(state.view_round, RoundKind::Quarterfinal);
        assert_eq!(state.selected_slot_id(), SlotId::new(RoundKind::Quarterfinal, 1));
    }
}
