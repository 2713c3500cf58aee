//! The landing page: section layout, the scrolling viewport, and the
//! contact form, behind one facade the terminal front end drives.

mod scroll;
mod section;

use std::time::Instant;

use crate::form::{ContactForm, FormAction, FormEvent};
use crate::transport::Payload;

pub use scroll::{
    ACTIVE_PROBE_ROWS, NAV_CLEARANCE_ROWS, SCROLL_TOP_AFTER_ROWS, SCROLLED_AFTER_ROWS, Viewport,
};
pub use section::{Section, landing_sections};

/// The whole page: what there is to read, where the window sits, and the
/// state of the contact form.
pub struct Page {
    sections: Vec<Section>,
    viewport: Viewport,
    form: ContactForm,
}

impl Page {
    pub fn new(view_rows: usize) -> Self {
        let sections = landing_sections();
        let page_rows = sections
            .last()
            .map(|last| last.top + last.height)
            .unwrap_or(0);
        let mut viewport = Viewport::new(view_rows, page_rows);
        viewport.observe(&sections);
        Self {
            sections,
            viewport,
            form: ContactForm::contact(),
        }
    }

    /// Validates every form field, updating the per-field views.
    /// Returns `true` when the whole form is valid.
    pub fn validate_form(&mut self) -> bool {
        self.form.validate_all()
    }

    /// Clears the form. No-op while a submission is in flight.
    pub fn reset_form(&mut self) -> FormAction {
        self.form.handle(FormEvent::Reset)
    }

    /// Glides the viewport to the named section, leaving clearance for the
    /// nav bar. Unknown ids are ignored.
    pub fn scroll_to_section(&mut self, id: &str) {
        if let Some(section) = self.sections.iter().find(|s| s.id == id) {
            self.viewport
                .glide_to(section.top.saturating_sub(NAV_CLEARANCE_ROWS));
        }
    }

    /// The form as it would be submitted right now.
    pub fn get_form_data(&self) -> Payload {
        self.form.form_data()
    }

    /// One frame: advances glides, records reveals, expires form timers.
    pub fn tick(&mut self, now: Instant) -> FormAction {
        self.viewport.tick();
        self.viewport.observe(&self.sections);
        self.form.handle(FormEvent::Tick(now))
    }

    pub fn handle_form_event(&mut self, event: FormEvent) -> FormAction {
        self.form.handle(event)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    /// The section the nav bar should highlight.
    pub fn active_section(&self) -> Option<&Section> {
        self.viewport.active_section(&self.sections)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_to_section_leaves_nav_clearance() {
        let mut page = Page::new(20);
        page.scroll_to_section("services");
        while page.viewport().gliding() {
            page.viewport_mut().tick();
        }
        let services = page.sections().iter().find(|s| s.id == "services").unwrap();
        assert_eq!(page.viewport().offset(), services.top - NAV_CLEARANCE_ROWS);
        assert_eq!(page.active_section().unwrap().id, "services");
    }

    #[test]
    fn scroll_to_unknown_section_is_a_no_op() {
        let mut page = Page::new(20);
        page.scroll_to_section("careers");
        assert!(!page.viewport().gliding());
        assert_eq!(page.viewport().offset(), 0);
    }

    #[test]
    fn scroll_to_home_lands_on_row_zero() {
        let mut page = Page::new(20);
        page.scroll_to_section("contact");
        while page.viewport().gliding() {
            page.viewport_mut().tick();
        }
        page.scroll_to_section("home");
        while page.viewport().gliding() {
            page.viewport_mut().tick();
        }
        assert_eq!(page.viewport().offset(), 0);
    }

    #[test]
    fn initial_view_reveals_only_whats_visible() {
        let page = Page::new(20);
        assert!(page.viewport().is_revealed("home"));
        assert!(!page.viewport().is_revealed("contact"));
    }

    #[test]
    fn validate_and_get_form_data_round_trip() {
        let mut page = Page::new(20);
        assert!(!page.validate_form());

        for (field, value) in [
            ("full_name", "Jane Doe"),
            ("email", "jane@example.com"),
            ("subject", "Hello"),
            ("message", "A message long enough to pass."),
        ] {
            page.handle_form_event(FormEvent::Input {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        assert!(page.validate_form());
        assert_eq!(page.get_form_data()["email"], "jane@example.com");
    }
}
