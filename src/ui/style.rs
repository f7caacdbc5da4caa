//! Theming and color definitions.
//!
//! Uses semantic ANSI colors that respect the terminal's palette.

use ratatui::style::{Color, Modifier, Style};

use crate::render::LineKind;

/// Get the style for a rendered line.
pub fn style_for_line(kind: &LineKind) -> Style {
    match kind {
        LineKind::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(4) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(5) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineKind::Heading(_) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),

        LineKind::CodeFence | LineKind::Code => Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::DIM),

        // Pending pages render as dim outlines until materialized
        LineKind::Placeholder => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),

        LineKind::ListItem(_) | LineKind::Paragraph | LineKind::Blank => Style::default(),
    }
}

/// Style for diagnostic messages in the diagnostics panel.
pub fn diagnostic_style() -> Style {
    Style::default().fg(Color::Yellow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels_are_distinct() {
        let h1 = style_for_line(&LineKind::Heading(1));
        let h2 = style_for_line(&LineKind::Heading(2));
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_paragraph_is_unstyled() {
        assert_eq!(style_for_line(&LineKind::Paragraph), Style::default());
    }

    #[test]
    fn test_placeholder_is_dim() {
        let style = style_for_line(&LineKind::Placeholder);
        assert!(style.add_modifier.contains(Modifier::DIM));
    }
}
