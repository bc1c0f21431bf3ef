use league_api::{Bracket, BracketSlot, Participant, RoundKind, SeededTeam, Side, SlotId, SlotState};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Modifier, Style};
use tui::widgets::Widget;

use crate::components::theme::{ThemeColor, normal, resolve, selected};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per game cell: home line, status line, away line.
pub const GAME_HEIGHT: u16 = 3;

/// Slot heights for each bracket depth (d=0 = play-in feeder, d=3 = final).
/// Formula: SH[0] = GAME_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
const SH: [u16; 4] = [
    GAME_HEIGHT,
    2 * GAME_HEIGHT + 1,
    2 * (2 * GAME_HEIGHT + 1) + 1,
    2 * (2 * (2 * GAME_HEIGHT + 1) + 1) + 1,
];

/// Total terminal rows the diagram needs. Equals SH[3] = 31.
pub const BRACKET_HEIGHT: u16 = SH[3];

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

const CELL_W_FULL: u16 = 26;

/// Cells per depth: two feeder positions per quarterfinal, then 4, 2, 1.
const CELL_COUNTS: [usize; 4] = [8, 4, 2, 1];

// ---------------------------------------------------------------------------
// GameCell
// ---------------------------------------------------------------------------

/// Layout position for one cell of the diagram.
#[derive(Debug, Clone)]
pub struct GameCell {
    /// Row of the status line (center of the 3-row cell), relative to the
    /// diagram origin. Not scroll-adjusted.
    pub center_row: u16,
    pub col: u16,
    pub cell_width: u16,
    pub round: RoundKind,
    /// Position within its depth column (0-based).
    pub index: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid
// ---------------------------------------------------------------------------

/// Column order left to right: play-in | conn | QF | conn | SF | conn | final.
///
/// The play-in column is laid out by quarterfinal feeder position, not by
/// play-in slot number: cell `2q` feeds the home side of QF(q+1) and cell
/// `2q+1` its away side.
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// Depth-major: feeders(8) + QF(4) + SF(2) + final(1) = 15 cells.
    pub cells: Vec<GameCell>,
    pub round_cols: [u16; 4],
    pub cell_width: u16,
}

impl BracketGrid {
    /// Center rows follow the triangle formula
    /// `center[d][i] = SH[d]/2 + i * (SH[d+1] - SH[d])`:
    ///
    ///   feeders (d=0): [1, 5, 9, 13, 17, 21, 25, 29]
    ///   QF      (d=1): [3, 11, 19, 27]
    ///   SF      (d=2): [7, 23]
    ///   final   (d=3): [15]
    pub fn compute(width: u16) -> Self {
        let per_col = width.saturating_sub(CONNECTOR_WIDTH * 3) / 4;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols = [0u16, stride, stride * 2, stride * 3];

        let first_center = [SH[0] / 2, SH[1] / 2, SH[2] / 2, SH[3] / 2];
        let spacing: [u16; 4] = [SH[1] - SH[0], SH[2] - SH[1], SH[3] - SH[2], 0];

        let mut cells = Vec::with_capacity(15);
        for (d, round) in RoundKind::ALL.into_iter().enumerate() {
            for i in 0..CELL_COUNTS[d] {
                cells.push(GameCell {
                    center_row: first_center[d] + i as u16 * spacing[d],
                    col: round_cols[d],
                    cell_width,
                    round,
                    index: i,
                });
            }
        }

        Self { cells, round_cols, cell_width }
    }

    pub fn cells_for_depth(&self, depth: usize) -> &[GameCell] {
        const OFFSETS: [usize; 5] = [0, 8, 12, 14, 15];
        &self.cells[OFFSETS[depth]..OFFSETS[depth + 1]]
    }

    /// Row of the cell showing `slot`, for scrolling it into view.
    pub fn row_of(&self, bracket: &Bracket, slot: SlotId) -> Option<u16> {
        self.cells
            .iter()
            .find(|cell| match cell_content(bracket, cell) {
                CellContent::Slot(s) => s.id == slot,
                _ => false,
            })
            .map(|cell| cell.center_row)
    }
}

// ---------------------------------------------------------------------------
// Cell content
// ---------------------------------------------------------------------------

/// What one grid cell shows.
pub enum CellContent<'a> {
    Slot(&'a BracketSlot),
    /// A team that skips the play-in and waits in the quarterfinal.
    Seeded(&'a SeededTeam),
    Empty,
}

pub fn cell_content<'a>(bracket: &'a Bracket, cell: &GameCell) -> CellContent<'a> {
    if cell.round != RoundKind::PlayIn {
        return match bracket.round(cell.round).slots.get(cell.index) {
            Some(slot) => CellContent::Slot(slot),
            None => CellContent::Empty,
        };
    }

    let Some(qf) = bracket.round(RoundKind::Quarterfinal).slots.get(cell.index / 2) else {
        return CellContent::Empty;
    };
    let side = if cell.index % 2 == 0 { Side::Home } else { Side::Away };
    match qf.participant(side) {
        Participant::WinnerOf(id) => match bracket.slot(*id) {
            Some(slot) => CellContent::Slot(slot),
            None => CellContent::Empty,
        },
        Participant::Team(team) => CellContent::Seeded(team),
        Participant::Bye => CellContent::Empty,
    }
}

// ---------------------------------------------------------------------------
// BracketDiagram widget
// ---------------------------------------------------------------------------

pub struct BracketDiagram<'a> {
    pub bracket: &'a Bracket,
    pub grid: &'a BracketGrid,
    /// Highlighted slot.
    pub selected: Option<SlotId>,
    /// Vertical scroll offset in terminal rows.
    pub scroll_offset: u16,
}

impl Widget for BracketDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < GAME_HEIGHT {
            return;
        }

        // Pass 1: cells
        for cell in &self.grid.cells {
            let x = area.x + cell.col;
            if x >= area.x + area.width {
                continue;
            }
            match cell_content(self.bracket, cell) {
                CellContent::Slot(slot) => {
                    let is_selected = self.selected == Some(slot.id);
                    draw_slot_cell(self.bracket, slot, cell, is_selected, area, self.scroll_offset, buf);
                }
                CellContent::Seeded(team) => {
                    draw_seeded_cell(team, cell, area, self.scroll_offset, buf);
                }
                CellContent::Empty => {}
            }
        }

        // Pass 2: connectors. Each parent at depth d+1 joins two children at depth d.
        for depth in 0..3usize {
            let child_cells = self.grid.cells_for_depth(depth);
            let parent_cells = self.grid.cells_for_depth(depth + 1);
            let conn_x = area.x + self.grid.round_cols[depth] + self.grid.cell_width;

            for (j, parent) in parent_cells.iter().enumerate() {
                if matches!(cell_content(self.bracket, parent), CellContent::Empty) {
                    continue;
                }
                let top = &child_cells[2 * j];
                let bot = &child_cells[2 * j + 1];
                let arms = (
                    !matches!(cell_content(self.bracket, top), CellContent::Empty),
                    !matches!(cell_content(self.bracket, bot), CellContent::Empty),
                );
                draw_connector(
                    top.center_row,
                    parent.center_row,
                    bot.center_row,
                    arms,
                    conn_x,
                    area,
                    self.scroll_offset,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Convert a diagram row to an absolute screen y, applying scroll + area bounds.
/// Returns `None` if the row is off-screen.
fn screen_y(row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if row < scroll {
        return None;
    }
    let rel = row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn draw_slot_cell(
    bracket: &Bracket,
    slot: &BracketSlot,
    cell: &GameCell,
    is_selected: bool,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    let avail_w = usize::from((area.x + area.width).saturating_sub(x));
    let width = usize::from(cell.cell_width);
    let base_style = if is_selected { selected() } else { normal() };
    let winner_id = slot.winner().map(SeededTeam::id);

    let rows = [
        (cell.center_row.saturating_sub(1), Some(Side::Home)),
        (cell.center_row, None),
        (cell.center_row.saturating_add(1), Some(Side::Away)),
    ];
    for (row, side) in rows {
        let Some(sy) = screen_y(row, scroll, area) else {
            continue;
        };
        let (content, style) = match side {
            Some(side) => {
                let (seed, name) = match slot.team(side) {
                    Some(t) => (Some(t.seed), t.name().to_string()),
                    None => (None, bracket.describe(slot.participant(side))),
                };
                let score = slot.result.and_then(|r| match side {
                    Side::Home => r.home_score,
                    Side::Away => r.away_score,
                });
                let is_winner = slot.team(side).map(SeededTeam::id).is_some_and(|id| winner_id == Some(id));
                let style = if is_winner {
                    resolve(ThemeColor::Winner)
                } else if is_selected {
                    base_style
                } else if winner_id.is_some() {
                    resolve(ThemeColor::Dim)
                } else {
                    base_style
                };
                (format_team_line(seed, &name, score, width), style)
            }
            None => {
                let style = if is_selected {
                    resolve(ThemeColor::Accent)
                } else {
                    resolve(ThemeColor::Dim)
                };
                (format_status_line(slot, width), style)
            }
        };
        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, sy, &text, style);
    }
}

fn draw_seeded_cell(team: &SeededTeam, cell: &GameCell, area: Rect, scroll: u16, buf: &mut Buffer) {
    let Some(sy) = screen_y(cell.center_row, scroll, area) else {
        return;
    };
    let x = area.x + cell.col;
    let avail_w = usize::from((area.x + area.width).saturating_sub(x));
    let line = format_team_line(Some(team.seed), team.name(), None, usize::from(cell.cell_width));
    let text: String = line.chars().take(avail_w).collect();
    buf.set_string(x, sy, &text, normal().add_modifier(Modifier::ITALIC));
}

/// `"[seed] [name       ] [score] "`, exactly `width` columns.
pub fn format_team_line(seed: Option<u32>, name: &str, score: Option<u16>, width: usize) -> String {
    let seed = match seed {
        Some(s) => format!("{s:2}"),
        None => "  ".to_string(),
    };
    let score = match score {
        Some(s) => format!("{s:3}"),
        None => "   ".to_string(),
    };
    // seed(2) + sp + name + sp + score(3) + sp
    let name_w = width.saturating_sub(8);
    let name: String = name.chars().take(name_w).collect();
    let line = format!("{seed} {name:<name_w$} {score} ");
    line.chars().take(width).collect()
}

/// Center row of a cell: slot id plus result, bye, or schedule.
pub fn format_status_line(slot: &BracketSlot, width: usize) -> String {
    let status = if slot.is_bye() {
        "BYE".to_string()
    } else if slot.state() == SlotState::Completed {
        "FINAL".to_string()
    } else if let Some(schedule) = &slot.schedule {
        match (schedule.date, schedule.time) {
            (Some(d), Some(t)) => format!("{} {}", d.format("%b %d"), t.format("%-I:%M %p")),
            (Some(d), None) => d.format("%b %d").to_string(),
            _ => "TBD".to_string(),
        }
    } else {
        "TBD".to_string()
    };
    let raw = format!("   {} {status}", slot.id);
    let padded = format!("{raw:<width$}");
    padded.chars().take(width).collect()
}

/// Box-drawing connector between one parent and up to two children.
///
/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    arms: (bool, bool),
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = resolve(ThemeColor::Dim);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if $x < limit_x {
                if let Some(sy) = screen_y($row, scroll, area) {
                    put_char(buf, $x, sy, $ch, style);
                }
            }
        };
    }

    let (has_top, has_bot) = arms;
    if has_top {
        put!(col_a, r_top, '─');
        put!(col_b, r_top, '┐');
        for row in (r_top + 1)..r_mid {
            put!(col_b, row, '│');
        }
    }
    if has_bot {
        for row in (r_mid + 1)..r_bot {
            put!(col_b, row, '│');
        }
        put!(col_a, r_bot, '─');
        put!(col_b, r_bot, '┘');
    }
    let junction = match arms {
        (true, true) => '├',
        (true, false) => '└',
        (false, true) => '┌',
        (false, false) => '─',
    };
    put!(col_b, r_mid, junction);
    put!(col_c, r_mid, '─');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
