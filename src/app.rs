use crate::draw::schedule_line_count;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, built_bracket};
use chrono::Local;
use league_api::{LeagueSnapshot, playoff_picture};
use log::{info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Standings,
    Bracket,
    Schedule,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_league_loaded(&mut self, snapshot: LeagueSnapshot) {
        self.store_snapshot(snapshot);
        self.state.standings.selected = 0;
        let AppState { bracket, picture, .. } = &mut self.state;
        bracket.reset(built_bracket(picture));
    }

    pub fn on_league_refreshed(&mut self, snapshot: LeagueSnapshot) {
        self.store_snapshot(snapshot);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    fn store_snapshot(&mut self, snapshot: LeagueSnapshot) {
        self.state.last_error = None;
        self.state.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
        self.state.snapshot = Some(snapshot);
        self.recompute();
    }

    /// Rebuild standings, seeds and bracket from the current snapshot and
    /// playoff settings.
    pub fn recompute(&mut self) {
        let Some(snapshot) = self.state.snapshot.as_ref() else {
            return;
        };
        let picture = playoff_picture(
            &snapshot.teams,
            &self.settings.playoffs,
            snapshot.bracket.as_ref(),
        );
        if let Err(e) = &picture.bracket {
            warn!("bracket not built: {e}");
        }
        self.state.standings.resort(&picture.standings);
        self.state.picture = Some(picture);
        let AppState { bracket, picture, .. } = &mut self.state;
        bracket.clamp(built_bracket(picture));
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Standings: delegated to StandingsState
    // -----------------------------------------------------------------------

    pub fn standings_down(&mut self) {
        self.state.standings.move_down();
    }

    pub fn standings_up(&mut self) {
        self.state.standings.move_up();
    }

    pub fn standings_cycle_sort(&mut self) {
        let AppState { standings, picture, .. } = &mut self.state;
        let ranked = picture.as_ref().map(|p| p.standings.as_slice()).unwrap_or(&[]);
        standings.cycle_column(ranked);
    }

    pub fn standings_toggle_order(&mut self) {
        let AppState { standings, picture, .. } = &mut self.state;
        let ranked = picture.as_ref().map(|p| p.standings.as_slice()).unwrap_or(&[]);
        standings.toggle_order(ranked);
    }

    pub fn standings_reset_sort(&mut self) {
        let AppState { standings, picture, .. } = &mut self.state;
        let ranked = picture.as_ref().map(|p| p.standings.as_slice()).unwrap_or(&[]);
        standings.reset_sort(ranked);
    }

    // -----------------------------------------------------------------------
    // Bracket navigation: delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        let AppState { bracket, picture, .. } = &mut self.state;
        bracket.navigate_round_next(built_bracket(picture));
    }

    pub fn bracket_prev_round(&mut self) {
        let AppState { bracket, picture, .. } = &mut self.state;
        bracket.navigate_round_prev(built_bracket(picture));
    }

    pub fn bracket_slot_down(&mut self) {
        let AppState { bracket, picture, .. } = &mut self.state;
        bracket.navigate_slot_down(built_bracket(picture));
    }

    pub fn bracket_slot_up(&mut self) {
        self.state.bracket.navigate_slot_up();
    }

    // -----------------------------------------------------------------------
    // Schedule
    // -----------------------------------------------------------------------

    pub fn schedule_scroll_down(&mut self) {
        let lines = self
            .state
            .snapshot
            .as_ref()
            .map(|s| schedule_line_count(&s.games))
            .unwrap_or(0);
        let max = u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX);
        self.state.schedule.scroll_offset = self.state.schedule.scroll_offset.saturating_add(1).min(max);
    }

    pub fn schedule_scroll_up(&mut self) {
        self.state.schedule.scroll_offset = self.state.schedule.scroll_offset.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Playoff rule tweaks; every change rebuilds the picture
    // -----------------------------------------------------------------------

    pub fn increase_bye_count(&mut self) {
        let Some(picture) = self.state.picture.as_ref() else {
            return;
        };
        let teams = picture.standings.len();
        let next = (picture.bye_count + 1).min(teams);
        self.set_bye_count(next);
    }

    pub fn decrease_bye_count(&mut self) {
        let Some(picture) = self.state.picture.as_ref() else {
            return;
        };
        let next = picture.bye_count.saturating_sub(1);
        self.set_bye_count(next);
    }

    /// Go back to the derived bye count.
    pub fn reset_bye_count(&mut self) {
        self.settings.playoffs.bye_count = None;
        info!("bye count: automatic");
        self.recompute();
    }

    fn set_bye_count(&mut self, count: usize) {
        self.settings.playoffs.bye_count = Some(count);
        info!("bye count: {count}");
        self.recompute();
    }

    pub fn cycle_tie_break(&mut self) {
        self.settings.playoffs.tie_break = self.settings.playoffs.tie_break.next();
        info!("tie-break: {}", self.settings.playoffs.tie_break.label());
        self.recompute();
    }

    pub fn cycle_odd_play_in(&mut self) {
        self.settings.playoffs.odd_play_in = self.settings.playoffs.odd_play_in.next();
        info!("odd play-in: {}", self.settings.playoffs.odd_play_in.label());
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_api::{
        BracketView, OddPlayInPolicy, PersistedBracket, ReportedResult, RoundKind, ScheduledGame,
        Season, SlotId, Team, TieBreak, Unavailable,
    };

    fn team(id: u64, wins: u32, losses: u32) -> Team {
        Team {
            id,
            name: format!("Team {id}"),
            wins,
            losses,
            points_for: 500 + id as u32,
            points_against: 500,
            is_active: true,
            ..Default::default()
        }
    }

    fn snapshot(n: u64) -> LeagueSnapshot {
        LeagueSnapshot {
            season: Season { id: 1, name: "Fall".into(), is_active: true, ..Default::default() },
            teams: (1..=n).map(|id| team(id, 20 - id as u32, id as u32)).collect(),
            games: Vec::new(),
            bracket: None,
        }
    }

    fn app() -> App {
        App {
            settings: AppSettings::default(),
            state: AppState::new(),
        }
    }

    #[test]
    fn loading_builds_picture_and_opens_play_in() {
        let mut app = app();
        app.on_league_loaded(snapshot(11));

        let picture = app.state.picture.as_ref().unwrap();
        assert_eq!(picture.standings.len(), 11);
        assert_eq!(picture.bye_count, 5);
        assert!(app.state.bracket().is_some());
        assert_eq!(app.state.bracket.view_round, RoundKind::PlayIn);
        assert!(app.state.last_updated.is_some());
    }

    #[test]
    fn loading_jumps_to_current_round() {
        let mut snap = snapshot(11);
        snap.bracket = Some(PersistedBracket {
            results: (1..=3)
                .map(|p| ReportedResult {
                    slot: SlotId::new(RoundKind::PlayIn, p),
                    winning_team_id: 5 + u64::from(p),
                    winner_score: Some(60),
                    loser_score: Some(50),
                })
                .collect(),
            ..Default::default()
        });
        let mut app = app();
        app.on_league_loaded(snap);
        assert_eq!(app.state.bracket.view_round, RoundKind::Quarterfinal);
    }

    #[test]
    fn refresh_keeps_cursor() {
        let mut app = app();
        app.on_league_loaded(snapshot(11));
        app.bracket_slot_down();
        app.bracket_slot_down();
        assert_eq!(app.state.bracket.selected_slot, 2);

        app.on_league_refreshed(snapshot(11));
        assert_eq!(app.state.bracket.selected_slot, 2);
        assert_eq!(app.state.bracket.view_round, RoundKind::PlayIn);
    }

    #[test]
    fn small_league_has_no_bracket() {
        let mut app = app();
        app.on_league_loaded(snapshot(3));
        let picture = app.state.picture.as_ref().unwrap();
        assert_eq!(
            picture.bracket,
            Ok(BracketView::Unavailable(Unavailable::TooFewTeams { teams: 3 }))
        );
        assert!(app.state.bracket().is_none());
        app.bracket_slot_down();
        assert_eq!(app.state.bracket.selected_slot, 0);
    }

    #[test]
    fn bye_count_changes_rebuild() {
        let mut app = app();
        app.on_league_loaded(snapshot(11));
        app.decrease_bye_count();
        assert_eq!(app.settings.playoffs.bye_count, Some(4));
        let picture = app.state.picture.as_ref().unwrap();
        assert_eq!(picture.bye_count, 4);
        assert_eq!(picture.seeds.play_in.len(), 7);

        app.reset_bye_count();
        assert_eq!(app.state.picture.as_ref().unwrap().bye_count, 5);
    }

    #[test]
    fn schedule_scrolls_through_week_headings() {
        let mut snap = snapshot(4);
        snap.games = (1..=4)
            .map(|id| ScheduledGame { id, week: Some(id as u32), ..Default::default() })
            .collect();
        let mut app = app();
        app.on_league_loaded(snap);

        // Four games over four weeks render as 4 + 4 headings + 3 gaps.
        for _ in 0..20 {
            app.schedule_scroll_down();
        }
        assert_eq!(app.state.schedule.scroll_offset, 10);
        app.schedule_scroll_up();
        assert_eq!(app.state.schedule.scroll_offset, 9);
    }

    #[test]
    fn bye_count_cannot_exceed_field() {
        let mut app = app();
        app.on_league_loaded(snapshot(5));
        for _ in 0..10 {
            app.increase_bye_count();
        }
        assert_eq!(app.settings.playoffs.bye_count, Some(5));
    }

    #[test]
    fn cycling_rules_recomputes() {
        let mut app = app();
        app.on_league_loaded(snapshot(11));
        app.cycle_tie_break();
        assert_eq!(app.settings.playoffs.tie_break, TieBreak::InputOrder);
        app.cycle_odd_play_in();
        assert_eq!(app.settings.playoffs.odd_play_in, OddPlayInPolicy::EliminateBottomSeed);
        assert!(app.state.picture.is_some());
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Bracket);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
    }

    #[test]
    fn error_is_cleared_by_next_load() {
        let mut app = app();
        app.on_error("connection refused".into());
        assert!(app.state.last_error.is_some());
        app.on_league_loaded(snapshot(8));
        assert!(app.state.last_error.is_none());
    }
}
