use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use league_api::LeagueSnapshot;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadLeague,
    RefreshLeague,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LeagueLoaded { snapshot: LeagueSnapshot },
    /// Same data as `LeagueLoaded`; the UI keeps its current selection.
    LeagueRefreshed { snapshot: LeagueSnapshot },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
