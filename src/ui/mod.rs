//! UI module for rendering the TUI

mod field_renderer;

use crate::app::{App, Focus};
use crate::form::{FieldKind, FieldValue, FieldWidget, FormTree, NodeId, NodeKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    draw_title(frame, chunks[0]);
    draw_form(frame, chunks[1], app);
    draw_status_bar(frame, chunks[2], app);
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = format!(" Consultation | consult-tui v{} ", env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        area,
    );
}

/// One renderable row group of the form
enum FormItem<'a> {
    Heading(&'a str),
    Rule,
    Note(&'a str),
    Field { widget: &'a FieldWidget, focused: bool },
    Entry {
        base: &'a str,
        index: usize,
        value: &'a str,
        focused: bool,
    },
}

impl FormItem<'_> {
    fn height(&self) -> u16 {
        match self {
            FormItem::Heading(_) | FormItem::Rule | FormItem::Note(_) => 1,
            FormItem::Field { widget, .. } if widget.kind == FieldKind::TextArea => 4,
            FormItem::Field { .. } | FormItem::Entry { .. } => 3,
        }
    }

    fn is_focused(&self) -> bool {
        matches!(
            self,
            FormItem::Field { focused: true, .. } | FormItem::Entry { focused: true, .. }
        )
    }
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let mut items = Vec::new();
    collect_items(
        app.page.tree(),
        app.page.tree().root(),
        app.focus(),
        &mut items,
    );

    // keep the focused item inside the visible window
    let mut before_focused = 0u16;
    let mut found = false;
    for item in &items {
        before_focused += item.height();
        if item.is_focused() {
            found = true;
            break;
        }
    }
    let offset = if found {
        before_focused.saturating_sub(area.height)
    } else {
        0
    };

    let mut y = 0u16;
    for item in &items {
        let top = y as i32 - offset as i32;
        y += item.height();
        if top < 0 {
            continue;
        }
        let top = top as u16;
        if top + item.height() > area.height {
            break;
        }
        let rect = Rect::new(area.x, area.y + top, area.width, item.height());
        render_item(frame, rect, item);
    }
}

fn render_item(frame: &mut Frame, area: Rect, item: &FormItem) {
    match item {
        FormItem::Heading(text) => {
            frame.render_widget(
                Paragraph::new(text.to_string()).style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                area,
            );
        }
        FormItem::Rule => {
            frame.render_widget(
                Paragraph::new("─".repeat(area.width as usize))
                    .style(Style::default().fg(Color::DarkGray)),
                area,
            );
        }
        FormItem::Note(text) => {
            // passthrough text may carry report header markers
            let text = text.trim().trim_start_matches('#').trim_start();
            frame.render_widget(
                Paragraph::new(text.to_string()).style(Style::default().fg(Color::Gray)),
                area,
            );
        }
        FormItem::Field { widget, focused } => {
            field_renderer::draw_field(frame, area, widget, *focused);
        }
        FormItem::Entry {
            base,
            index,
            value,
            focused,
        } => {
            field_renderer::draw_entry(frame, area, &format!("{base} {index}"), value, *focused);
        }
    }
}

fn collect_items<'a>(
    tree: &'a FormTree,
    id: NodeId,
    focus: Option<&Focus>,
    out: &mut Vec<FormItem<'a>>,
) {
    for &child in tree.children(id) {
        let node = tree.node(child);
        match &node.kind {
            NodeKind::Header { text, .. } => out.push(FormItem::Heading(text)),
            NodeKind::Separator | NodeKind::LineSpacer => out.push(FormItem::Rule),
            NodeKind::Element { text } => {
                if !text.trim().is_empty() {
                    out.push(FormItem::Note(text));
                }
            }
            NodeKind::FieldGroup(widget) => {
                let focused =
                    matches!(focus, Some(Focus::Field(name)) if name == &widget.name);
                out.push(FormItem::Field { widget, focused });
            }
            NodeKind::InputList { base_name } => {
                let mut index = 1;
                for &entry in tree.children(child) {
                    if let NodeKind::ListEntry { id: entry_id, value } = &tree.node(entry).kind
                    {
                        let focused = matches!(
                            focus,
                            Some(Focus::ListEntry { id, .. }) if id == entry_id
                        );
                        out.push(FormItem::Entry {
                            base: base_name,
                            index,
                            value,
                            focused,
                        });
                        index += 1;
                    }
                }
            }
            NodeKind::Container { .. } => collect_items(tree, child, focus, out),
            NodeKind::ListEntry { .. } => {}
        }
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let filled = app
        .page
        .form_values()
        .values()
        .filter(|value| match value {
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::Flag(flag) => *flag,
            FieldValue::List(items) => !items.is_empty(),
        })
        .count();
    let total = app.page.field_order().len();

    let line = match &app.status.message {
        Some(message) => {
            let style = if app.status.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(vec![
                Span::styled(format!(" {message} "), style),
                Span::styled(
                    format!("· {filled}/{total} filled"),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        None => Line::from(vec![
            Span::styled(
                " Tab next · Space toggle · Ctrl+E export · Ctrl+S save · Ctrl+L load · Ctrl+R reset · Ctrl+N/Ctrl+D list item · Esc quit ",
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("· {filled}/{total} filled"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}
