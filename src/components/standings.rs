//! Column-driven standings table.

use std::sync::LazyLock;

use league_api::{PlayoffPicture, SortColumn, SortOrder, Standing, TeamId};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

use crate::components::theme::{ThemeColor, normal, resolve, selected};

const SELECTOR: &str = "▶ ";
const GUTTER: u16 = 2;

/// How a team enters the playoff bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Berth {
    Bye,
    PlayIn,
    /// Dropped by the odd play-in policy.
    Out,
    /// No bracket could be built.
    Unknown,
}

impl Berth {
    fn label(self) -> &'static str {
        match self {
            Berth::Bye => "Bye",
            Berth::PlayIn => "Play-in",
            Berth::Out => "Out",
            Berth::Unknown => "-",
        }
    }
}

pub fn berth_for(picture: &PlayoffPicture, team_id: TeamId) -> Berth {
    let Some(bracket) = picture.bracket.as_ref().ok().and_then(|v| v.bracket()) else {
        return Berth::Unknown;
    };
    if bracket.eliminated.iter().any(|t| t.id() == team_id) {
        Berth::Out
    } else if picture.seeds.bye.iter().any(|t| t.id() == team_id) {
        Berth::Bye
    } else {
        Berth::PlayIn
    }
}

/// One rendered row: the team's rank (1-based), its record and berth.
pub struct StandingRow<'a> {
    pub rank: usize,
    pub standing: &'a Standing,
    pub berth: Berth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct ColumnDef {
    pub header: &'static str,
    /// `None` for columns the table cannot be sorted by.
    pub sort: Option<SortColumn>,
    pub width: u16,
    pub align: Align,
    pub value: fn(&StandingRow) -> String,
}

static STANDINGS_COLUMNS: LazyLock<Vec<ColumnDef>> = LazyLock::new(|| {
    vec![
        ColumnDef {
            header: "Seed",
            sort: Some(SortColumn::Rank),
            width: 5,
            align: Align::Right,
            value: |r| r.rank.to_string(),
        },
        ColumnDef {
            header: "Team",
            sort: Some(SortColumn::Name),
            width: 22,
            align: Align::Left,
            value: |r| r.standing.team.name.clone(),
        },
        ColumnDef {
            header: "W",
            sort: Some(SortColumn::Wins),
            width: 4,
            align: Align::Right,
            value: |r| r.standing.team.wins.to_string(),
        },
        ColumnDef {
            header: "L",
            sort: Some(SortColumn::Losses),
            width: 4,
            align: Align::Right,
            value: |r| r.standing.team.losses.to_string(),
        },
        ColumnDef {
            header: "PCT",
            sort: Some(SortColumn::WinPercentage),
            width: 6,
            align: Align::Right,
            value: |r| format_pct(r.standing.win_percentage),
        },
        ColumnDef {
            header: "PF",
            sort: Some(SortColumn::PointsFor),
            width: 6,
            align: Align::Right,
            value: |r| r.standing.team.points_for.to_string(),
        },
        ColumnDef {
            header: "PA",
            sort: Some(SortColumn::PointsAgainst),
            width: 6,
            align: Align::Right,
            value: |r| r.standing.team.points_against.to_string(),
        },
        ColumnDef {
            header: "DIFF",
            sort: Some(SortColumn::PointDifferential),
            width: 6,
            align: Align::Right,
            value: |r| format_diff(r.standing.point_differential),
        },
        ColumnDef {
            header: "Berth",
            sort: None,
            width: 9,
            align: Align::Left,
            value: |r| r.berth.label().to_string(),
        },
    ]
});

pub fn standings_columns() -> &'static [ColumnDef] {
    &STANDINGS_COLUMNS
}

/// `.727`, and `1.000` for an unbeaten team.
pub fn format_pct(pct: f64) -> String {
    let s = format!("{pct:.3}");
    match s.strip_prefix('0') {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

pub fn format_diff(diff: i64) -> String {
    if diff > 0 { format!("+{diff}") } else { diff.to_string() }
}

fn pad(text: &str, width: u16, align: Align) -> String {
    let width = usize::from(width);
    let clipped: String = text.chars().take(width).collect();
    match align {
        Align::Left => format!("{clipped:<width$}"),
        Align::Right => format!("{clipped:>width$}"),
    }
}

pub struct StandingsTable<'a> {
    /// Already in display order.
    pub rows: Vec<StandingRow<'a>>,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
    pub selected: Option<usize>,
}

impl StandingsTable<'_> {
    fn header_line(&self) -> String {
        let mut line = " ".repeat(usize::from(GUTTER));
        for col in standings_columns() {
            let mut header = col.header.to_string();
            if col.sort == Some(self.sort_column) {
                header.push(match self.sort_order {
                    SortOrder::Ascending => '▲',
                    SortOrder::Descending => '▼',
                });
            }
            line.push_str(&pad(&header, col.width, col.align));
            line.push(' ');
        }
        line.trim_end().to_string()
    }

    fn row_line(&self, idx: usize, row: &StandingRow) -> String {
        let mut line = if self.selected == Some(idx) {
            SELECTOR.to_string()
        } else {
            " ".repeat(usize::from(GUTTER))
        };
        for col in standings_columns() {
            line.push_str(&pad(&(col.value)(row), col.width, col.align));
            line.push(' ');
        }
        line.trim_end().to_string()
    }

    fn total_width() -> u16 {
        standings_columns().iter().map(|c| c.width + 1).sum::<u16>()
    }

    fn row_style(&self, idx: usize, row: &StandingRow) -> Style {
        if self.selected == Some(idx) {
            selected()
        } else if row.berth == Berth::Out {
            resolve(ThemeColor::Dim)
        } else {
            normal()
        }
    }
}

impl Widget for StandingsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width == 0 {
            return;
        }
        let width = usize::from(area.width);

        buf.set_stringn(area.x, area.y, self.header_line(), width, resolve(ThemeColor::Accent));
        let rule = "─".repeat(usize::from(Self::total_width()));
        buf.set_stringn(area.x + GUTTER, area.y + 1, rule, width.saturating_sub(2), resolve(ThemeColor::Dim));

        // Scroll just enough to keep the cursor on screen.
        let visible = usize::from(area.height - 2);
        let offset = self
            .selected
            .map(|s| s.saturating_sub(visible.saturating_sub(1)))
            .unwrap_or(0);

        for (i, (idx, row)) in self.rows.iter().enumerate().skip(offset).take(visible).enumerate() {
            let y = area.y + 2 + i as u16;
            buf.set_stringn(area.x, y, self.row_line(idx, row), width, self.row_style(idx, row));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_api::{PlayoffConfig, Team, playoff_picture};

    fn team(id: u64, name: &str, wins: u32, losses: u32, pf: u32, pa: u32) -> Team {
        Team {
            id,
            name: name.into(),
            wins,
            losses,
            points_for: pf,
            points_against: pa,
            is_active: true,
            ..Default::default()
        }
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn render(table: StandingsTable, width: u16, height: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        table.render(buf.area, &mut buf);
        buf
    }

    #[test]
    fn test_columns_initialized() {
        let headers: Vec<&str> = standings_columns().iter().map(|c| c.header).collect();
        assert_eq!(headers, vec!["Seed", "Team", "W", "L", "PCT", "PF", "PA", "DIFF", "Berth"]);
        for col in standings_columns() {
            if let Some(sort) = col.sort {
                assert_eq!(sort.label(), col.header);
            }
        }
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(8.0 / 11.0), ".727");
        assert_eq!(format_pct(1.0), "1.000");
        assert_eq!(format_pct(0.0), ".000");
    }

    #[test]
    fn test_format_diff() {
        assert_eq!(format_diff(12), "+12");
        assert_eq!(format_diff(-5), "-5");
        assert_eq!(format_diff(0), "0");
    }

    #[test]
    fn test_renders_rows_with_selector_and_sort_marker() {
        let teams = vec![
            team(1, "Hawks", 9, 1, 700, 600),
            team(2, "Otters", 4, 6, 610, 640),
        ];
        let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
        let rows: Vec<StandingRow> = picture
            .standings
            .iter()
            .enumerate()
            .map(|(i, s)| StandingRow {
                rank: i + 1,
                standing: s,
                berth: berth_for(&picture, s.team.id),
            })
            .collect();
        let table = StandingsTable {
            rows,
            sort_column: SortColumn::Rank,
            sort_order: SortOrder::Descending,
            selected: Some(1),
        };
        let buf = render(table, 90, 6);

        let header = line(&buf, 0);
        assert!(header.starts_with("  Seed▼ Team"), "header: {header:?}");
        assert!(line(&buf, 1).starts_with("  ───"));

        let first = line(&buf, 2);
        assert!(first.starts_with("      1 Hawks"), "row: {first:?}");
        assert!(first.contains(".900"));
        assert!(first.contains("+100"));
        // Two teams is too few for a bracket.
        assert!(first.ends_with('-'));

        let second = line(&buf, 3);
        assert!(second.starts_with("▶     2 Otters"), "row: {second:?}");
        assert!(second.contains("-30"));
        assert_eq!(line(&buf, 4), "");
    }

    #[test]
    fn test_berths_follow_bye_count() {
        let teams: Vec<Team> = (1..=11)
            .map(|id| team(id, &format!("T{id}"), 20 - id as u32, id as u32, 500, 500))
            .collect();
        let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
        assert_eq!(berth_for(&picture, 1), Berth::Bye);
        assert_eq!(berth_for(&picture, 5), Berth::Bye);
        assert_eq!(berth_for(&picture, 6), Berth::PlayIn);
        assert_eq!(berth_for(&picture, 11), Berth::PlayIn);
    }

    #[test]
    fn test_scrolls_to_keep_selection_visible() {
        let teams: Vec<Team> = (1..=6)
            .map(|id| team(id, &format!("Team {id}"), 10 - id as u32, id as u32, 500, 500))
            .collect();
        let picture = playoff_picture(&teams, &PlayoffConfig::default(), None);
        let rows: Vec<StandingRow> = picture
            .standings
            .iter()
            .enumerate()
            .map(|(i, s)| StandingRow { rank: i + 1, standing: s, berth: Berth::Unknown })
            .collect();
        let table = StandingsTable {
            rows,
            sort_column: SortColumn::Rank,
            sort_order: SortOrder::Descending,
            selected: Some(5),
        };
        // Room for three rows.
        let buf = render(table, 90, 5);
        assert!(line(&buf, 2).contains("Team 4"));
        assert!(line(&buf, 4).starts_with("▶"));
        assert!(line(&buf, 4).contains("Team 6"));
    }
}
