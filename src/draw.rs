use std::collections::HashSet;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BRACKET_HEIGHT, BracketDiagram, BracketGrid};
use crate::components::standings::{StandingRow, StandingsTable, berth_for};
use crate::components::theme::{ThemeColor, resolve};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use league_api::{
    Bracket, BracketView, GameStatus, PlayoffPicture, ScheduledGame, Side, SlotState,
};

static TABS: &[&str; 3] = &["Standings", "Bracket", "Schedule"];

const DETAIL_MIN_WIDTH: u16 = 120;
const DETAIL_WIDTH: u16 = 36;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Standings => 0,
        MenuItem::Bracket => 1,
        MenuItem::Schedule => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Message shown in place of data that has not arrived.
fn draw_not_loaded(f: &mut Frame, area: Rect, app: &App, what: &str) {
    let (msg, style) = match app.state.last_error.as_deref() {
        Some(err) => (format!("{what} load failed:\n{err}"), resolve(ThemeColor::Error)),
        None => (format!("Loading {}...", what.to_lowercase()), resolve(ThemeColor::Dim)),
    };
    f.render_widget(Paragraph::new(msg).style(style).alignment(Alignment::Center), area);
}

fn season_title(app: &App, tab: &str) -> String {
    match app.state.snapshot.as_ref() {
        Some(snapshot) => format!(" {tab} | {} ", snapshot.season.name),
        None => format!(" {tab} "),
    }
}

/// One-line summary of the active playoff rules.
fn rules_line(app: &App, picture: &PlayoffPicture) -> String {
    let rules = &app.settings.playoffs;
    let byes = match rules.bye_count {
        Some(_) => format!("Byes: {}", picture.bye_count),
        None => format!("Byes: {} (auto)", picture.bye_count),
    };
    let mut line = format!(
        "{byes} | Tie-break: {} | Odd play-in: {}",
        rules.tie_break.label(),
        rules.odd_play_in.label()
    );
    if let Some(updated) = app.state.last_updated.as_deref() {
        line.push_str(&format!(" | Updated {updated}"));
    }
    line
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(season_title(app, "Standings"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(picture) = app.state.picture.as_ref() else {
        draw_not_loaded(f, inner, app, "Standings");
        return;
    };

    let [header, key_legend, _gap, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(rules_line(app, picture)), header);
    f.render_widget(
        Paragraph::new("Keys: j/k=move  s=sort column  o=order  d=default  +/-=byes  a=auto  t=tie-break  p=odd play-in")
            .style(resolve(ThemeColor::Dim)),
        key_legend,
    );

    if picture.standings.is_empty() {
        f.render_widget(
            Paragraph::new("No active teams this season")
                .style(resolve(ThemeColor::Dim))
                .alignment(Alignment::Center),
            content,
        );
        return;
    }

    let standings_state = &app.state.standings;
    let rows: Vec<StandingRow> = standings_state
        .order
        .iter()
        .filter_map(|&i| {
            let standing = picture.standings.get(i)?;
            Some(StandingRow {
                rank: i + 1,
                standing,
                berth: berth_for(picture, standing.team.id),
            })
        })
        .collect();

    f.render_widget(
        StandingsTable {
            rows,
            sort_column: standings_state.sort_column,
            sort_order: standings_state.sort_order,
            selected: Some(standings_state.selected),
        },
        content,
    );
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(season_title(app, "Bracket"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(picture) = app.state.picture.as_ref() else {
        draw_not_loaded(f, inner, app, "Bracket");
        return;
    };

    let [header, status, key_legend, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(rules_line(app, picture)), header);
    f.render_widget(
        Paragraph::new("Keys: h/l=round  j/k=game  +/-=byes  a=auto  t=tie-break  p=odd play-in  r=refresh")
            .style(resolve(ThemeColor::Dim)),
        key_legend,
    );

    let bracket = match &picture.bracket {
        Ok(BracketView::Available(bracket)) => bracket,
        Ok(BracketView::Unavailable(reason)) => {
            f.render_widget(Paragraph::new(""), status);
            f.render_widget(
                Paragraph::new(reason.to_string())
                    .style(resolve(ThemeColor::Dim))
                    .alignment(Alignment::Center),
                content,
            );
            return;
        }
        Err(e) => {
            f.render_widget(
                Paragraph::new(format!("Bracket could not be built:\n{e}"))
                    .style(resolve(ThemeColor::Error))
                    .alignment(Alignment::Center),
                content,
            );
            return;
        }
    };

    f.render_widget(Paragraph::new(bracket_status_line(app, bracket)), status);

    let (diagram_area, detail_area) = if content.width >= DETAIL_MIN_WIDTH {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(DETAIL_WIDTH)]).areas(content);
        (left, Some(right))
    } else if content.height >= BRACKET_HEIGHT / 2 + 9 {
        let [top, bottom] = Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).areas(content);
        (top, Some(bottom))
    } else {
        (content, None)
    };

    let selected = app.state.bracket.selected_slot_id();
    let grid = BracketGrid::compute(diagram_area.width);
    let scroll_offset = grid
        .row_of(bracket, selected)
        .map(|row| diagram_scroll(row, diagram_area.height))
        .unwrap_or(0);

    f.render_widget(
        BracketDiagram {
            bracket,
            grid: &grid,
            selected: Some(selected),
            scroll_offset,
        },
        diagram_area,
    );

    if let Some(detail) = detail_area {
        draw_slot_detail(f, detail, app, bracket);
    }
}

/// Champion once decided, otherwise the round being viewed and the one in play.
fn bracket_status_line(app: &App, bracket: &Bracket) -> Line<'static> {
    if let Some(champion) = bracket.champion() {
        return Line::from(vec![
            Span::styled("Champion: ", resolve(ThemeColor::Accent)),
            Span::styled(format!("({}) {}", champion.seed, champion.name()), resolve(ThemeColor::Winner)),
        ]);
    }
    let viewing = app.state.bracket.view_round.label();
    let current = bracket
        .current_round()
        .map(|r| r.label())
        .unwrap_or("Complete");
    Line::from(vec![
        Span::styled(viewing, resolve(ThemeColor::Accent)),
        Span::styled(format!("  (in play: {current})"), resolve(ThemeColor::Dim)),
    ])
}

/// Keep the selected row roughly centered without scrolling past the diagram.
fn diagram_scroll(row: u16, height: u16) -> u16 {
    if height >= BRACKET_HEIGHT {
        return 0;
    }
    row.saturating_sub(height / 2).min(BRACKET_HEIGHT - height)
}

fn draw_slot_detail(f: &mut Frame, area: Rect, app: &App, bracket: &Bracket) {
    let id = app.state.bracket.selected_slot_id();
    let block = default_border(Color::DarkGray).title(format!(" {id} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(slot) = bracket.slot(id) else {
        f.render_widget(
            Paragraph::new(format!("No games in the {}", id.round.label()))
                .style(resolve(ThemeColor::Dim)),
            inner,
        );
        return;
    };

    let label = Style::default().fg(Color::Gray);
    let winner_id = slot.winner().map(|t| t.id());
    let side_line = |side: Side| {
        let name = bracket.side_label(slot, side);
        let score = slot
            .result
            .and_then(|r| match side {
                Side::Home => r.home_score,
                Side::Away => r.away_score,
            })
            .map(|s| format!("  {s}"))
            .unwrap_or_default();
        let style = match slot.team(side) {
            Some(t) if winner_id == Some(t.id()) => resolve(ThemeColor::Winner),
            _ => Style::default().fg(Color::White),
        };
        let tag = match side {
            Side::Home => "Home ",
            Side::Away => "Away ",
        };
        Line::from(vec![Span::styled(tag, label), Span::styled(format!("{name}{score}"), style)])
    };

    let mut lines = vec![
        Line::from(Span::styled(id.round.label(), resolve(ThemeColor::Accent))),
        Line::from(""),
        side_line(Side::Home),
        side_line(Side::Away),
        Line::from(""),
    ];

    let state = if slot.is_bye() {
        "Bye".to_string()
    } else {
        match (slot.state(), slot.winner()) {
            (SlotState::Completed, Some(w)) => format!("Final, {} advance", w.name()),
            (SlotState::Completed, None) => "Final".to_string(),
            (SlotState::Pending, _) if slot.is_playable() => "Ready to play".to_string(),
            (SlotState::Pending, _) => "Waiting on earlier games".to_string(),
        }
    };
    lines.push(Line::from(vec![Span::styled("Status ", label), Span::raw(state)]));

    if let Some(schedule) = &slot.schedule {
        if let Some(date) = schedule.date {
            lines.push(Line::from(vec![
                Span::styled("Date   ", label),
                Span::raw(date.format("%a %b %d").to_string()),
            ]));
        }
        if let Some(time) = schedule.time {
            lines.push(Line::from(vec![
                Span::styled("Time   ", label),
                Span::raw(time.format("%-I:%M %p").to_string()),
            ]));
        }
        if let Some(location) = schedule.location.as_deref() {
            lines.push(Line::from(vec![Span::styled("Where  ", label), Span::raw(location.to_string())]));
        }
    }

    if !bracket.eliminated.is_empty() {
        lines.push(Line::from(""));
        let names: Vec<String> = bracket
            .eliminated
            .iter()
            .map(|t| format!("({}) {}", t.seed, t.name()))
            .collect();
        lines.push(Line::from(vec![
            Span::styled("Out    ", label),
            Span::styled(names.join(", "), resolve(ThemeColor::Dim)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(season_title(app, "Schedule"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(snapshot) = app.state.snapshot.as_ref() else {
        draw_not_loaded(f, inner, app, "Schedule");
        return;
    };

    if snapshot.games.is_empty() {
        f.render_widget(
            Paragraph::new("No games scheduled")
                .style(resolve(ThemeColor::Dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let lines = schedule_lines(&snapshot.games);
    let offset = usize::from(app.state.schedule.scroll_offset);
    let window: Vec<Line> = lines.into_iter().skip(offset).collect();
    f.render_widget(Paragraph::new(window), inner);
}

/// Games ordered by week then kickoff, with a heading per week.
/// Rows [`schedule_lines`] renders: every game, a heading per week and a
/// blank row between weeks.
pub fn schedule_line_count(games: &[ScheduledGame]) -> usize {
    let weeks: HashSet<Option<u32>> = games.iter().map(|g| g.week).collect();
    games.len() + (2 * weeks.len()).saturating_sub(1)
}

fn schedule_lines(games: &[ScheduledGame]) -> Vec<Line<'static>> {
    let mut ordered: Vec<&ScheduledGame> = games.iter().collect();
    ordered.sort_by_key(|g| (g.week.unwrap_or(u32::MAX), g.date, g.time, g.id));

    let mut lines = Vec::with_capacity(ordered.len() * 2);
    let mut current_week: Option<Option<u32>> = None;
    for game in ordered {
        if current_week != Some(game.week) {
            if current_week.is_some() {
                lines.push(Line::from(""));
            }
            let heading = match game.week {
                Some(w) => format!("Week {w}"),
                None => "Unscheduled week".to_string(),
            };
            lines.push(Line::from(Span::styled(heading, resolve(ThemeColor::Accent))));
            current_week = Some(game.week);
        }
        lines.push(schedule_line(game));
    }
    lines
}

fn schedule_line(game: &ScheduledGame) -> Line<'static> {
    let when = match (game.date, game.time) {
        (Some(d), Some(t)) => format!("{} {:>8}", d.format("%a %b %d"), t.format("%-I:%M %p")),
        (Some(d), None) => format!("{} {:>8}", d.format("%a %b %d"), "TBD"),
        _ => format!("{:<10} {:>8}", "TBD", ""),
    };
    let matchup = format!("{} vs {}", game.home_team_name, game.away_team_name);
    let (result, style) = match (game.status, game.score) {
        (GameStatus::Final, Some((home, away))) => {
            (format!("FINAL {home}-{away}"), Style::default().fg(Color::White))
        }
        (GameStatus::Final, None) => ("FINAL".to_string(), Style::default().fg(Color::White)),
        (GameStatus::Scheduled, _) => (String::new(), Style::default().fg(Color::Gray)),
    };
    let location = game.location.clone().unwrap_or_default();
    Line::from(vec![
        Span::styled(format!("  {when}  "), resolve(ThemeColor::Dim)),
        Span::styled(format!("{matchup:<40} "), style),
        Span::styled(format!("{result:<14} "), resolve(ThemeColor::Winner)),
        Span::styled(location, resolve(ThemeColor::Dim)),
    ])
}

// ---------------------------------------------------------------------------
// Help, logs, spinner
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let entries: &[(&str, &str)] = &[
        ("1 / 2 / 3", "Standings / Bracket / Schedule"),
        ("?  Esc", "open / close help"),
        ("j k  ↓ ↑", "move selection or scroll"),
        ("h l  ← →", "previous / next bracket round"),
        ("s  o  d", "standings: sort column / flip order / default order"),
        ("+  -  a", "one more / one fewer bye, back to automatic"),
        ("t", "cycle tie-break"),
        ("p", "cycle odd play-in policy"),
        ("r", "refresh from the league server"),
        ("f", "full screen"),
        ("\"", "show / hide logs"),
        ("q  Ctrl-C", "quit"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), resolve(ThemeColor::Accent)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn game(id: u64, week: Option<u32>, day: u32) -> ScheduledGame {
        ScheduledGame {
            id,
            home_team_name: format!("Home {id}"),
            away_team_name: format!("Away {id}"),
            date: NaiveDate::from_ymd_opt(2025, 3, day),
            time: NaiveTime::from_hms_opt(19, 0, 0),
            week,
            ..Default::default()
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_schedule_groups_by_week() {
        let games = vec![game(3, Some(2), 10), game(1, Some(1), 3), game(2, Some(1), 4), game(4, None, 1)];
        let lines: Vec<String> = schedule_lines(&games).iter().map(text).collect();
        assert_eq!(lines[0], "Week 1");
        assert!(lines[1].contains("Home 1 vs Away 1"));
        assert!(lines[2].contains("Home 2 vs Away 2"));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Week 2");
        assert_eq!(lines[7], "Unscheduled week");
        assert_eq!(lines.len(), 9);
        assert_eq!(schedule_line_count(&games), 9);
        assert_eq!(schedule_line_count(&games[..1]), 2);
        assert_eq!(schedule_line_count(&[]), 0);
    }

    #[test]
    fn test_schedule_line_shows_final_score() {
        let mut g = game(1, Some(1), 3);
        g.status = GameStatus::Final;
        g.score = Some((55, 48));
        g.location = Some("Eastside Gym - Court 2".into());
        let line = text(&schedule_line(&g));
        assert!(line.contains("Mon Mar 03"), "{line}");
        assert!(line.contains("7:00 PM"));
        assert!(line.contains("FINAL 55-48"));
        assert!(line.ends_with("Eastside Gym - Court 2"));
    }

    #[test]
    fn test_diagram_scroll_keeps_row_visible() {
        assert_eq!(diagram_scroll(29, 40), 0);
        assert_eq!(diagram_scroll(1, 10), 0);
        assert_eq!(diagram_scroll(15, 10), 10);
        assert_eq!(diagram_scroll(29, 10), BRACKET_HEIGHT - 10);
    }
}
