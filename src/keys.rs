use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Schedule),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Standings
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => guard.standings_down(),
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => guard.standings_up(),
        (MenuItem::Standings, Char('s'), _) => guard.standings_cycle_sort(),
        (MenuItem::Standings, Char('o'), _) => guard.standings_toggle_order(),
        (MenuItem::Standings, Char('d'), _) => guard.standings_reset_sort(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.bracket_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.bracket_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.bracket_slot_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.bracket_slot_up(),

        // Playoff rules
        (MenuItem::Standings | MenuItem::Bracket, Char('+') | Char('='), _) => {
            guard.increase_bye_count()
        }
        (MenuItem::Standings | MenuItem::Bracket, Char('-'), _) => guard.decrease_bye_count(),
        (MenuItem::Standings | MenuItem::Bracket, Char('a'), _) => guard.reset_bye_count(),
        (MenuItem::Standings | MenuItem::Bracket, Char('t'), _) => guard.cycle_tie_break(),
        (MenuItem::Standings | MenuItem::Bracket, Char('p'), _) => guard.cycle_odd_play_in(),

        // Schedule
        (MenuItem::Schedule, Char('j') | KeyCode::Down, _) => guard.schedule_scroll_down(),
        (MenuItem::Schedule, Char('k') | KeyCode::Up, _) => guard.schedule_scroll_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),
        (_, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::RefreshLeague).await;
        }

        _ => {}
    }
}
