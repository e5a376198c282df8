use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    form::RecordTable,
    presentation::view::{Pane, UiContext},
};

const ACTIONS_HEADER: &str = "Actions";
const ACTIONS_CELL: &str = "[e] Edit  [d] Delete";
const EMPTY_PLACEHOLDER: &str = "No entries submitted yet";

pub fn render_records_pane(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let focused = ctx.pane == Pane::Records;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title("Entries")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if ctx.tables.is_empty() {
        let placeholder = Paragraph::new(Line::from(EMPTY_PLACEHOLDER))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
        return;
    }

    let heights: Vec<u16> = ctx.tables.iter().map(table_height).collect();
    let focus_table = focused_table(ctx.tables, ctx.record_focus);
    let first = first_visible_table(&heights, focus_table, inner.height);

    let mut constraints: Vec<Constraint> = heights[first..]
        .iter()
        .map(|height| Constraint::Length((*height).min(inner.height)))
        .collect();
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut row_offset: usize = ctx.tables[..first].iter().map(RecordTable::len).sum();
    for (table, chunk) in ctx.tables[first..].iter().zip(chunks.iter()) {
        let selected = (focused
            && ctx.record_focus >= row_offset
            && ctx.record_focus < row_offset + table.len())
        .then(|| ctx.record_focus - row_offset);
        let editing = ctx
            .edit_cursor
            .filter(|cursor| cursor.category == table.category)
            .map(|cursor| cursor.index);
        render_table(frame, *chunk, table, selected, editing);
        row_offset += table.len();
    }
}

/// Header, title and one line per row.
fn table_height(table: &RecordTable) -> u16 {
    u16::try_from(table.len())
        .unwrap_or(u16::MAX)
        .saturating_add(3)
}

fn focused_table(tables: &[RecordTable], record_focus: usize) -> usize {
    let mut offset = record_focus;
    for (idx, table) in tables.iter().enumerate() {
        if offset < table.len() {
            return idx;
        }
        offset -= table.len();
    }
    tables.len().saturating_sub(1)
}

/// Earliest table to draw so that the focused one still fits in `available`
/// lines; an oversized focused table is drawn first and scrolls internally.
fn first_visible_table(heights: &[u16], focus_table: usize, available: u16) -> usize {
    let mut first = focus_table.min(heights.len().saturating_sub(1));
    let mut used = heights.get(first).copied().unwrap_or(0);
    while first > 0 {
        let next = used.saturating_add(heights[first - 1]);
        if next > available {
            break;
        }
        used = next;
        first -= 1;
    }
    first
}

fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    table: &RecordTable,
    selected: Option<usize>,
    editing: Option<usize>,
) {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        table
            .headers
            .iter()
            .map(|name| Cell::from(name.clone()))
            .chain(std::iter::once(Cell::from(ACTIONS_HEADER))),
    )
    .style(header_style);

    let rows = table.rows.iter().enumerate().map(|(idx, cells)| {
        let row = Row::new(
            cells
                .iter()
                .map(|value| Cell::from(value.clone()))
                .chain(std::iter::once(Cell::from(ACTIONS_CELL))),
        );
        if editing == Some(idx) {
            row.style(Style::default().fg(Color::Blue))
        } else {
            row
        }
    });

    let columns = table.headers.len() + 1;
    let widths = (0..columns).map(|idx| {
        if idx + 1 == columns {
            Constraint::Length(ACTIONS_CELL.len() as u16)
        } else {
            Constraint::Fill(1)
        }
    });

    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(table.category.clone()))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");

    let mut state = TableState::default();
    state.select(selected);
    frame.render_stateful_widget(widget, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(category: &str, rows: usize) -> RecordTable {
        RecordTable {
            category: category.to_string(),
            headers: vec!["name".to_string()],
            rows: vec![vec!["x".to_string()]; rows],
        }
    }

    #[test]
    fn height_saturates_for_huge_tables() {
        assert_eq!(table_height(&table("A", 2)), 5);
        assert_eq!(table_height(&table("A", usize::from(u16::MAX) + 10)), u16::MAX);
    }

    #[test]
    fn focus_maps_to_its_table() {
        let tables = [table("A", 2), table("B", 3)];
        assert_eq!(focused_table(&tables, 0), 0);
        assert_eq!(focused_table(&tables, 2), 1);
        assert_eq!(focused_table(&tables, 4), 1);
    }

    #[test]
    fn earlier_tables_scroll_away_when_focus_does_not_fit() {
        let heights = [5, 5, 5];
        assert_eq!(first_visible_table(&heights, 0, 12), 0);
        assert_eq!(first_visible_table(&heights, 1, 12), 0);
        assert_eq!(first_visible_table(&heights, 2, 12), 1);
        assert_eq!(first_visible_table(&heights, 2, 4), 2);
    }
}
