mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, config_path};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use league_api::LeagueApi;
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(CliAction::Run(cli)) => cli,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("leaguetui {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let mut settings = AppSettings::load();
    cli.apply(&mut settings);
    info!("league server: {}", settings.api_url);

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let client = LeagueApi::new(settings.api_url.clone());
    let season_id = settings.season_id;
    let refresh_interval = settings.refresh_interval;
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, season_id, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic league refresh thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), refresh_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger league load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Overrides from the command line; applied after the config file and env.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    api_url: Option<String>,
    season_id: Option<u64>,
}

impl CliArgs {
    fn apply(self, settings: &mut AppSettings) {
        if let Some(url) = self.api_url {
            settings.api_url = url;
        }
        if self.season_id.is_some() {
            settings.season_id = self.season_id;
        }
    }
}

#[derive(Debug, PartialEq)]
enum CliAction {
    Run(CliArgs),
    Help,
    Version,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliAction, String> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "--api" => {
                let url = args.next().ok_or("--api needs a URL")?;
                cli.api_url = Some(url);
            }
            "--season" => {
                let raw = args.next().ok_or("--season needs a season id")?;
                let id = raw
                    .parse()
                    .map_err(|_| format!("--season expects a number, got {raw:?}"))?;
                cli.season_id = Some(id);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(CliAction::Run(cli))
}

fn usage_text() -> String {
    let config = config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/leaguetui/config.json".to_string());
    format!(
        "leaguetui - league standings and playoff bracket in the terminal

Usage:
  leaguetui [--api URL] [--season ID]
  leaguetui --help
  leaguetui --version

Options:
  --api URL        League server base URL (default http://localhost:8080/api)
  --season ID      Season to show (default: the active season)

Config file:
  {config}

Environment:
  LEAGUE_API_URL       League server base URL
  LEAGUE_SEASON_ID     Season to show
  LEAGUE_BYE_COUNT     Teams that skip the play-in round
  LEAGUE_REFRESH_SECS  Seconds between refreshes, 0 to disable (default 60)
  LEAGUE_LOG           Log level: error, warn, info, debug, trace"
    )
}

// ---------------------------------------------------------------------------
// UI loop
// ---------------------------------------------------------------------------

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadLeague).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::LeagueLoaded { snapshot } => {
            let mut guard = app.lock().await;
            guard.on_league_loaded(snapshot);
        }
        NetworkResponse::LeagueRefreshed { snapshot } => {
            let mut guard = app.lock().await;
            guard.on_league_refreshed(snapshot);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook, where there is nobody left to
/// report a failure to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_runs_with_defaults() {
        assert_eq!(parse_args(args(&[])), Ok(CliAction::Run(CliArgs::default())));
    }

    #[test]
    fn test_api_and_season_flags() {
        let action = parse_args(args(&["--api", "https://league.example.org/api", "--season", "3"]));
        assert_eq!(
            action,
            Ok(CliAction::Run(CliArgs {
                api_url: Some("https://league.example.org/api".into()),
                season_id: Some(3),
            }))
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(args(&["--help"])), Ok(CliAction::Help));
        assert_eq!(parse_args(args(&["-V"])), Ok(CliAction::Version));
    }

    #[test]
    fn test_bad_args_are_errors() {
        assert!(parse_args(args(&["--season", "fall"])).is_err());
        assert!(parse_args(args(&["--api"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let mut settings = AppSettings::default();
        settings.season_id = Some(1);
        CliArgs { api_url: None, season_id: Some(9) }.apply(&mut settings);
        assert_eq!(settings.season_id, Some(9));
        assert_eq!(settings.api_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_usage_lists_env_vars() {
        let usage = usage_text();
        for var in ["LEAGUE_API_URL", "LEAGUE_SEASON_ID", "LEAGUE_BYE_COUNT", "LEAGUE_REFRESH_SECS", "LEAGUE_LOG"] {
            assert!(usage.contains(var), "missing {var}");
        }
    }
}
