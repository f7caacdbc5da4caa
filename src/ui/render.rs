use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::{DOCUMENT_LEFT_PADDING, status, style};

/// Maximum rows the diagnostics panel may take, border included.
const DIAGNOSTICS_PANEL_MAX: u16 = 10;

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();

    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);
    // Reserve last line for status bar (+ one toast line when active).
    let doc_outer_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    render_document(model, frame, doc_outer_area);

    if model.diagnostics_visible {
        render_diagnostics_panel(model, frame, doc_outer_area);
    }

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let mut content: Vec<Line> = Vec::new();

    if model.page_views().is_empty() {
        content.push(Line::styled(
            "(empty document)",
            Style::default().fg(Color::DarkGray).italic(),
        ));
    } else {
        for line in model.visible_lines() {
            let line_style = style::style_for_line(&line.kind);
            let text = if line.kind == crate::render::LineKind::Placeholder {
                "\u{b7}".to_string()
            } else {
                line.content.clone()
            };
            content.push(Line::styled(text, line_style));
        }
    }

    let doc_block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::left(DOCUMENT_LEFT_PADDING));
    let doc = Paragraph::new(content).block(doc_block);
    // Clear first so placeholder styles from previous frames do not leak.
    frame.render_widget(Clear, area);
    frame.render_widget(doc, area);
}

fn render_diagnostics_panel(model: &Model, frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(err) = &model.last_error {
        lines.push(Line::styled(
            format!("error: {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    if model.diagnostics.is_empty() && model.last_error.is_none() {
        lines.push(Line::styled(
            "no diagnostics",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for diagnostic in &model.diagnostics {
        lines.push(Line::styled(
            diagnostic.to_string(),
            style::diagnostic_style(),
        ));
    }

    #[allow(clippy::cast_possible_truncation)]
    // Panel content is clamped well below u16::MAX.
    let wanted = (lines.len() as u16).saturating_add(2).min(DIAGNOSTICS_PANEL_MAX);
    let height = wanted.min(area.height);
    let panel_area = Rect {
        y: area.y + area.height.saturating_sub(height),
        height,
        ..area
    };

    let title = format!("Diagnostics ({})", model.diagnostics.len());
    let block = Block::default().title(title).borders(Borders::ALL);
    let panel = Paragraph::new(lines).block(block);
    frame.render_widget(Clear, panel_area);
    frame.render_widget(panel, panel_area);
}
