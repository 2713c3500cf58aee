//! The navigation bar and the scroll-to-top hint.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::page::Page;

/// Renders the nav bar: one entry per section, the active one
/// highlighted, with a solid background once the page has scrolled.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_nav(page: &Page, frame: &mut Frame, area: Rect) {
    let active = page.active_section().map(|section| section.id);
    let scrolled = page.viewport().scrolled();

    let base = if scrolled {
        Style::default().bg(Color::Indexed(236))
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(
        " parlor ",
        base.fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for section in page.sections() {
        let style = if active == Some(section.id) {
            base.fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            base.fg(Color::Gray)
        };
        spans.push(Span::styled(format!("  {}  ", section.title), style));
    }
    if page.viewport().scroll_top_visible() {
        spans.push(Span::styled(
            "  [t] back to top",
            base.fg(Color::DarkGray),
        ));
    }

    let bar = Paragraph::new(Line::from(spans))
        .style(base)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(bar, area);
}
