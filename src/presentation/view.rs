use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    domain::FieldSchema,
    form::{EditCursor, Feedback, FormValues, RecordTable, ValidationErrors},
};

use super::components::{render_footer, render_form_pane, render_popup, render_records_pane};

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Form,
    Records,
}

pub struct UiContext<'a> {
    pub title: &'a str,
    pub category: Option<&'a str>,
    pub fields: &'a [FieldSchema],
    pub values: &'a FormValues,
    pub errors: &'a ValidationErrors,
    pub progress: f64,
    pub feedback: Option<Feedback>,
    pub edit_cursor: Option<&'a EditCursor>,
    pub tables: &'a [RecordTable],
    pub pane: Pane,
    /// 0 is the category selector, `n` the n-th field.
    pub form_focus: usize,
    /// Position across all table rows, in render order.
    pub record_focus: usize,
    pub status_message: &'a str,
    pub help: Option<&'a str>,
    pub popup: Option<PopupRender<'a>>,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: usize,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(4)])
        .split(frame.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let cursor_enabled = ctx.popup.is_none() && ctx.pane == Pane::Form;
    render_form_pane(frame, columns[0], &ctx, cursor_enabled);
    render_records_pane(frame, columns[1], &ctx);
    render_footer(frame, rows[1], &ctx);

    if let Some(popup) = &ctx.popup {
        render_popup(frame, popup);
    }
}
