use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::domain::{FieldSchema, FieldType};

use super::banner::{render_feedback, render_progress};
use crate::presentation::view::{Pane, UiContext};

const CATEGORY_PLACEHOLDER: &str = "<Select Form Type>";
const HIGHLIGHT_SYMBOL: &str = "» ";

pub fn render_form_pane(
    frame: &mut Frame<'_>,
    area: Rect,
    ctx: &UiContext<'_>,
    enable_cursor: bool,
) {
    let mut constraints = vec![Constraint::Length(3)];
    if ctx.feedback.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_progress(frame, chunks[0], ctx.progress);
    let mut index = 1;
    if let Some(feedback) = ctx.feedback {
        render_feedback(frame, chunks[index], feedback);
        index += 1;
    }
    render_fields(frame, chunks[index], ctx, enable_cursor);
}

fn render_fields(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>, enable_cursor: bool) {
    let focused = ctx.pane == Pane::Form;
    let content_width = area.width.saturating_sub(6).max(4);

    let mut renders = Vec::with_capacity(ctx.fields.len() + 1);
    renders.push(category_render(ctx, focused && ctx.form_focus == 0));
    for (idx, field) in ctx.fields.iter().enumerate() {
        let selected = focused && ctx.form_focus == idx + 1;
        let value = ctx.values.get(&field.name).map(String::as_str).unwrap_or("");
        let error = ctx.errors.get(&field.name).map(String::as_str);
        renders.push(build_field_render(field, value, error, selected, content_width));
    }

    let mut cursor_hint = None;
    let mut line_offset = 0usize;
    for (idx, render) in renders.iter().enumerate() {
        if idx == ctx.form_focus {
            cursor_hint = render.cursor_hint.as_ref().map(|hint| CursorHint {
                line_offset: hint.line_offset + line_offset,
                value_width: hint.value_width,
            });
        }
        line_offset += render.lines.len();
    }
    let total_lines = line_offset;

    let items: Vec<ListItem<'static>> = renders
        .into_iter()
        .map(|render| ListItem::new(render.lines))
        .collect();

    let title = match (ctx.category, ctx.edit_cursor) {
        (Some(category), Some(cursor)) => format!("{category} • entry #{}", cursor.index + 1),
        (Some(category), None) => category.to_string(),
        (None, _) => ctx.title.to_string(),
    };
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(ctx.form_focus.min(ctx.fields.len())));
    }
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(HIGHLIGHT_SYMBOL);
    frame.render_stateful_widget(list, area, &mut list_state);

    // Cursor placement assumes the list is not scrolled.
    let visible_lines = area.height.saturating_sub(2) as usize;
    if enable_cursor
        && total_lines <= visible_lines
        && let Some(cursor) = cursor_hint
    {
        let cursor_y = area.y + 1 + cursor.line_offset as u16;
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(HIGHLIGHT_SYMBOL.width() as u16)
            .saturating_add(2)
            .saturating_add(cursor.value_width);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

struct FieldRender {
    lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

struct CursorHint {
    line_offset: usize,
    value_width: u16,
}

fn label_style(is_selected: bool) -> Style {
    let color = if is_selected { Color::Yellow } else { Color::Cyan };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn category_render(ctx: &UiContext<'_>, is_selected: bool) -> FieldRender {
    let value = ctx.category.unwrap_or(CATEGORY_PLACEHOLDER);
    let mut lines = vec![Line::from(Span::styled("Form Type", label_style(is_selected)))];
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(hint_line("  ←/→ or Enter to choose"));
    FieldRender {
        lines,
        cursor_hint: None,
    }
}

fn build_field_render(
    field: &FieldSchema,
    value: &str,
    error: Option<&str>,
    is_selected: bool,
    max_width: u16,
) -> FieldRender {
    let mut lines = Vec::new();
    let mut label = vec![Span::styled(field.label.clone(), label_style(is_selected))];
    if field.required {
        label.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(label));

    let shown = display_value(field, value);
    let value_line_index = lines.len();
    let value_width = if is_selected {
        lines.extend(boxed_value(&shown, max_width));
        shown.width()
    } else {
        let style = if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![Span::raw("  "), Span::styled(shown, style)]));
        0
    };

    lines.push(meta_line(field, error.is_some()));

    if let Some(message) = error {
        for line in wrap(message, max_width as usize) {
            lines.push(Line::from(Span::styled(
                format!("  {}", line.into_owned()),
                Style::default().fg(Color::Red),
            )));
        }
    }

    // Dropdown values are not typed, so they get no text cursor.
    let cursor_hint = (is_selected && field.kind != FieldType::Dropdown).then(|| CursorHint {
        line_offset: value_line_index + 1,
        value_width: value_width.min(max_width as usize) as u16,
    });
    FieldRender { lines, cursor_hint }
}

fn display_value(field: &FieldSchema, value: &str) -> String {
    if value.is_empty() {
        return match field.kind {
            FieldType::Dropdown => "<choose>".to_string(),
            FieldType::Date => "YYYY-MM-DD".to_string(),
            _ => String::new(),
        };
    }
    if field.is_masked() {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    }
}

fn boxed_value(shown: &str, max_width: u16) -> Vec<Line<'static>> {
    let inner_width = shown.width().clamp(1, max_width.max(1) as usize);
    let border = "─".repeat(inner_width + 2);
    let border_style = Style::default().fg(Color::Yellow);
    let mut content = shown.to_string();
    let mut width = content.width();
    while width < inner_width {
        content.push(' ');
        width += 1;
    }
    vec![
        Line::from(Span::styled(format!("┌{border}┐"), border_style)),
        Line::from(vec![
            Span::styled("│ ", border_style),
            Span::styled(
                content,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │", border_style),
        ]),
        Line::from(Span::styled(format!("└{border}┘"), border_style)),
    ]
}

fn meta_line(field: &FieldSchema, invalid: bool) -> Line<'static> {
    let mut meta = vec![Span::styled(
        format!("  type: {}", field.kind),
        Style::default().fg(Color::DarkGray),
    )];
    if invalid {
        meta.push(Span::styled(
            "  • invalid",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(meta)
}

fn hint_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}
