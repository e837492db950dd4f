//! Field rendering utilities for forms

use crate::form::{FieldKind, FieldWidget};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw a live field widget as a bordered input box
pub fn draw_field(frame: &mut Frame, area: Rect, widget: &FieldWidget, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if widget.flagged {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = widget.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_value
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = if widget.kind == FieldKind::TextArea {
        let mut lines: Vec<Line> = display_str
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    cursor,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_str, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let block = Block::default()
        .title(title_line(widget))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw a single input-list entry row
pub fn draw_entry(frame: &mut Frame, area: Rect, title: &str, value: &str, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = if value.is_empty() && !is_active {
        "(empty)"
    } else {
        value
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_value.to_string(), style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Field box title: label plus validation message or unit hint
fn title_line(widget: &FieldWidget) -> Line<'static> {
    let label = widget
        .label
        .clone()
        .unwrap_or_else(|| widget.name.clone());
    let mut spans = vec![Span::raw(format!(" {label} "))];
    if widget.error_visible {
        spans.push(Span::styled(
            format!("{} ", widget.validation_message),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(sub_text) = widget.sub_text.as_deref() {
        spans.push(Span::styled(
            format!("({sub_text}) "),
            Style::default().fg(Color::DarkGray),
        ));
    } else if widget.kind == FieldKind::Datalist && !widget.options.is_empty() {
        // suggestions show their display text
        let suggestions: Vec<&str> = widget
            .options
            .iter()
            .take(3)
            .map(|opt| opt.text.as_str())
            .collect();
        spans.push(Span::styled(
            format!("(e.g. {}) ", suggestions.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
