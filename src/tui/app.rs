use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::form::{FormAction, FormEvent};
use crate::page::Page;
use crate::transport::{Payload, Transport};

use super::error::AppError;
use super::widgets::{FormEditor, draw_contact_form, draw_nav};

/// Rows reserved for the nav bar at the top of the screen.
const NAV_ROWS: u16 = 2;

/// Frame interval: drives glides, reveals, and form timers.
const TICK: Duration = Duration::from_millis(100);

/// What keystrokes currently mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reading the page; keys navigate and scroll.
    Browse,
    /// Editing the contact form; keys type.
    Edit,
}

/// Top-level application state.
pub struct App {
    page: Page,
    editor: FormEditor,
    mode: Mode,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` in [`Mode::Browse`] at the top of the page.
    pub fn new() -> Self {
        Self {
            page: Page::default(),
            editor: FormEditor::new(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }

    /// Main loop: draw, then race terminal events, settled submissions,
    /// and the frame ticker. Submissions run on spawned tasks and report
    /// back over the channel.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        transport: Arc<dyn Transport>,
    ) -> Result<(), AppError> {
        let size = terminal.size()?;
        self.page
            .viewport_mut()
            .resize(usize::from(size.height.saturating_sub(NAV_ROWS)));

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK);
        let (tx, mut rx) = mpsc::unbounded_channel();

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if let Some(payload) = self.handle_key(key) {
                            let transport = Arc::clone(&transport);
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let outcome = transport.submit(payload).await;
                                let _ = tx.send(outcome);
                            });
                        }
                    }
                    Some(Ok(Event::Resize(_, rows))) => {
                        self.page
                            .viewport_mut()
                            .resize(usize::from(rows.saturating_sub(NAV_ROWS)));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(outcome) = rx.recv() => {
                    let action = self.page.handle_form_event(FormEvent::Settled {
                        outcome,
                        now: Instant::now(),
                    });
                    self.apply(action);
                }
                _ = ticker.tick() => {
                    let action = self.page.tick(Instant::now());
                    self.apply(action);
                }
            }
        }
        Ok(())
    }

    /// Handles a key event. Returns a payload when the form dispatched a
    /// submission the caller must run.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Payload> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match self.mode {
            Mode::Browse => {
                self.browse_key(key);
                None
            }
            Mode::Edit => self.edit_key(key),
        }
    }

    fn browse_key(&mut self, key: KeyEvent) {
        let view_rows = self.page.viewport().view_rows() as isize;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.page.viewport_mut().scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.page.viewport_mut().scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.page.viewport_mut().scroll_by(view_rows)
            }
            KeyCode::PageUp => self.page.viewport_mut().scroll_by(-view_rows),
            KeyCode::Char('g') | KeyCode::Home => self.page.viewport_mut().to_top(),
            KeyCode::Char('t') => {
                if self.page.viewport().scroll_top_visible() {
                    self.page.viewport_mut().to_top();
                }
            }
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                if let Some(id) = self.page.sections().get(index).map(|s| s.id) {
                    self.page.scroll_to_section(id);
                }
            }
            KeyCode::Char('c') | KeyCode::Enter | KeyCode::Tab => {
                self.page.scroll_to_section("contact");
                self.mode = Mode::Edit;
            }
            _ => {}
        }
    }

    fn edit_key(&mut self, key: KeyEvent) -> Option<Payload> {
        match key.code {
            KeyCode::Esc => {
                // First Esc clears a dirty form; a clean form drops back
                // to browsing.
                if self.page.form().is_dirty() {
                    let action = self.page.reset_form();
                    self.apply(action);
                } else {
                    self.mode = Mode::Browse;
                }
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.blur_focused();
                if key.code == KeyCode::Tab {
                    self.editor.focus_next(self.page.form().registry());
                } else {
                    self.editor.focus_prev(self.page.form().registry());
                }
                None
            }
            KeyCode::Enter
                if self.editor.focused_field(self.page.form().registry())
                    == Some("message")
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                // Plain Enter stays a newline inside the message; Alt+Enter
                // submits from anywhere.
                self.forward_to_editor(key);
                None
            }
            KeyCode::Enter => {
                self.blur_focused();
                let action = self.page.handle_form_event(FormEvent::Submit);
                self.apply(action)
            }
            _ => {
                self.forward_to_editor(key);
                None
            }
        }
    }

    /// Applies the field's blur formatting and re-validates it.
    fn blur_focused(&mut self) {
        if let Some(field) = self.editor.focused_field(self.page.form().registry()) {
            self.page.form_mut().focus_left(field);
            self.editor.sync_from(self.page.form());
        }
    }

    fn forward_to_editor(&mut self, key: KeyEvent) {
        if let Some(event) = self.editor.apply_key(key, self.page.form()) {
            let action = self.page.handle_form_event(event);
            self.apply(action);
        }
    }

    /// Carries out what the form asked for.
    fn apply(&mut self, action: FormAction) -> Option<Payload> {
        match action {
            FormAction::None => None,
            FormAction::Dispatch(payload) => Some(payload),
            FormAction::Focus(name) => {
                self.editor.focus_field(self.page.form().registry(), name);
                self.editor.sync_from(self.page.form());
                None
            }
            FormAction::RevealSuccess => {
                self.page.scroll_to_section("contact");
                None
            }
        }
    }

    /// Renders the nav bar, the visible slice of the page, and any notices.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [nav_area, body] =
            Layout::vertical([Constraint::Length(NAV_ROWS), Constraint::Min(0)])
                .areas(frame.area());
        draw_nav(&self.page, frame, nav_area);

        let offset = self.page.viewport().offset() as isize;
        for section in self.page.sections() {
            let top = section.top as isize - offset;
            let bottom = top + section.height as isize;
            if bottom <= 0 || top >= body.height as isize {
                continue;
            }
            let skip = (-top).max(0) as u16;
            let rect = Rect {
                x: body.x,
                y: body.y + top.max(0) as u16,
                width: body.width,
                height: (bottom.min(body.height as isize) - top.max(0)) as u16,
            };
            if section.id == "contact" {
                self.draw_contact(section, skip, frame, rect);
            } else {
                self.draw_section(section, skip, frame, rect);
            }
        }

        if let Some(banner) = self.page.form().banner() {
            let area = Rect {
                x: body.x,
                y: body.bottom().saturating_sub(1),
                width: body.width,
                height: 1,
            };
            let notice = Paragraph::new(Span::styled(
                format!(" {} ", banner.message),
                Style::default().fg(Color::White).bg(Color::Red),
            ));
            frame.render_widget(notice, area);
        }
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw_section(&self, section: &crate::page::Section, skip: u16, frame: &mut Frame, area: Rect) {
        let body_style = if self.page.viewport().is_revealed(section.id) {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Indexed(238))
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", section.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for paragraph in section.blurb {
            lines.push(Line::from(Span::styled(format!("  {paragraph}"), body_style)));
        }

        frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), area);
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw_contact(&self, section: &crate::page::Section, skip: u16, frame: &mut Frame, area: Rect) {
        // The heading shrinks as it scrolls off the top, keeping the form
        // aligned with the rest of the page.
        let heading_rows = 3_u16.saturating_sub(skip);
        let [heading, form_area] =
            Layout::vertical([Constraint::Length(heading_rows), Constraint::Min(0)]).areas(area);

        if heading_rows > 0 {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", section.title),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", section.blurb.first().copied().unwrap_or("")),
                    Style::default().fg(Color::Gray),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), heading);
        }
        draw_contact_form(self.page.form(), &self.editor, frame, form_area);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use crate::form::FormPhase;
    use crate::transport::TransportError;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn alt(code: KeyCode) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::ALT,
            ..press(code)
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            kind: KeyEventKind::Release,
            ..press(code)
        }
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(press(KeyCode::Char(ch)));
        }
    }

    /// Enters edit mode and fills every field with a valid value.
    fn fill_form(app: &mut App) {
        app.handle_key(press(KeyCode::Char('c')));
        type_str(app, "Jane Doe");
        app.handle_key(press(KeyCode::Tab));
        type_str(app, "jane@example.com");
        app.handle_key(press(KeyCode::Tab));
        type_str(app, "Hello");
        app.handle_key(press(KeyCode::Tab));
        type_str(app, "A message long enough to pass.");
    }

    #[test]
    fn starts_browsing_at_the_top() {
        let app = App::new();
        assert_eq!(app.mode(), Mode::Browse);
        assert_eq!(app.page().viewport().offset(), 0);
        assert!(!app.should_quit());
    }

    #[test]
    fn q_quits_from_browse() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = App::new();
        app.handle_key(release(KeyCode::Char('q')));
        assert!(!app.should_quit());
    }

    #[test]
    fn j_and_k_scroll_one_row() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('j')));
        app.handle_key(press(KeyCode::Char('j')));
        app.handle_key(press(KeyCode::Char('k')));
        assert_eq!(app.page().viewport().offset(), 1);
    }

    #[test]
    fn number_keys_glide_to_sections() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('2')));
        assert!(app.page().viewport().gliding());
        while app.page().viewport().gliding() {
            app.page.viewport_mut().tick();
        }
        assert_eq!(app.page().active_section().unwrap().id, "about");
    }

    #[test]
    fn out_of_range_number_is_ignored() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('9')));
        assert!(!app.page().viewport().gliding());
    }

    #[test]
    fn c_enters_edit_mode_heading_for_contact() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('c')));
        assert_eq!(app.mode(), Mode::Edit);
        assert!(app.page().viewport().gliding());
    }

    #[test]
    fn typing_lands_in_the_focused_field() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('c')));
        type_str(&mut app, "jane doe");
        assert_eq!(app.page().form().value("full_name"), "jane doe");
    }

    #[test]
    fn tab_blurs_formats_and_advances() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('c')));
        type_str(&mut app, "jane doe");
        app.handle_key(press(KeyCode::Tab));
        // Blur formatting title-cased the name before focus moved on.
        assert_eq!(app.page().form().value("full_name"), "Jane Doe");
        type_str(&mut app, "x");
        assert_eq!(app.page().form().value("email"), "x");
    }

    #[test]
    fn submitting_a_valid_form_returns_the_payload() {
        let mut app = App::new();
        fill_form(&mut app);
        let payload = app.handle_key(alt(KeyCode::Enter)).expect("a dispatch");
        assert_eq!(payload["full_name"], "Jane Doe");
        assert_eq!(app.page().form().phase(), FormPhase::Submitting);
    }

    #[test]
    fn submitting_an_invalid_form_focuses_the_first_offender() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('c')));
        let payload = app.handle_key(press(KeyCode::Enter));
        assert!(payload.is_none());
        assert_eq!(app.page().form().phase(), FormPhase::Idle);
        assert!(app.page().form().view("full_name").is_invalid());
        assert_eq!(
            app.editor.focused_field(app.page().form().registry()),
            Some("full_name")
        );
    }

    #[test]
    fn enter_in_the_message_field_is_a_newline() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('c')));
        for _ in 0..3 {
            app.handle_key(press(KeyCode::Tab));
        }
        type_str(&mut app, "hi");
        let payload = app.handle_key(press(KeyCode::Enter));
        assert!(payload.is_none());
        type_str(&mut app, "there");
        assert_eq!(app.page().form().value("message"), "hi\nthere");
    }

    #[test]
    fn esc_clears_a_dirty_form_then_leaves_edit_mode() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('c')));
        type_str(&mut app, "draft");
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.mode(), Mode::Edit);
        assert_eq!(app.page().form().value("full_name"), "");

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.mode(), Mode::Browse);
    }

    #[test]
    fn settled_success_reveals_and_arms_auto_reset() {
        let mut app = App::new();
        fill_form(&mut app);
        app.handle_key(alt(KeyCode::Enter)).expect("a dispatch");

        let now = Instant::now();
        let action = app.page.handle_form_event(FormEvent::Settled {
            outcome: Ok(()),
            now,
        });
        app.apply(action);
        assert!(app.page().form().success_visible());

        let action = app
            .page
            .tick(now + crate::form::SUCCESS_RESET_DELAY);
        app.apply(action);
        assert_eq!(app.page().form().value("full_name"), "");
        assert_eq!(
            app.editor.focused_field(app.page().form().registry()),
            Some("full_name")
        );
    }

    #[test]
    fn settled_failure_shows_the_banner() {
        let mut app = App::new();
        fill_form(&mut app);
        app.handle_key(alt(KeyCode::Enter)).expect("a dispatch");

        let action = app.page.handle_form_event(FormEvent::Settled {
            outcome: Err(TransportError::Rejected("down".into())),
            now: Instant::now(),
        });
        app.apply(action);
        assert!(app.page().form().banner().is_some());
        assert_eq!(app.page().form().value("email"), "jane@example.com");
    }

    #[test]
    fn home_at_the_top_survives_the_next_frame() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('g')));
        let action = app.page.tick(Instant::now());
        app.apply(action);
        assert_eq!(app.page().viewport().offset(), 0);
        assert!(!app.page().viewport().gliding());
    }

    #[test]
    fn contact_heading_scrolls_off_with_the_section() {
        let backend = ratatui::backend::TestBackend::new(40, 22);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = App::new();
        app.page.viewport_mut().resize(20);
        // Contact starts at row 38; offset 40 puts its heading two rows
        // above the view.
        app.page.viewport_mut().scroll_by(40);
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        for y in 2..buffer.area.height {
            let row: String = (0..buffer.area.width)
                .map(|x| buffer.cell((x, y)).unwrap().symbol())
                .collect();
            assert!(
                !row.contains("Contact"),
                "heading should be off-screen, found it at row {y}: {row:?}"
            );
        }
    }

    #[test]
    fn t_scrolls_to_top_only_when_the_control_is_visible() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Char('j')));
        app.handle_key(press(KeyCode::Char('t')));
        assert!(!app.page().viewport().gliding());

        for _ in 0..25 {
            app.handle_key(press(KeyCode::Char('j')));
        }
        app.handle_key(press(KeyCode::Char('t')));
        assert!(app.page().viewport().gliding());
    }
}
