use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::form::{Feedback, FeedbackKind};

pub fn render_progress(frame: &mut Frame<'_>, area: Rect, progress: f64) {
    let ratio = (progress / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!("{}% completed", progress.round() as i64));
    frame.render_widget(gauge, area);
}

pub fn render_feedback(frame: &mut Frame<'_>, area: Rect, feedback: Feedback) {
    let color = feedback_color(feedback.kind);
    let banner = Paragraph::new(feedback.message())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title("Esc to dismiss"),
        );
    frame.render_widget(banner, area);
}

fn feedback_color(kind: FeedbackKind) -> Color {
    match kind {
        FeedbackKind::Created => Color::Green,
        FeedbackKind::Edited => Color::Blue,
        FeedbackKind::Deleted => Color::Red,
    }
}
