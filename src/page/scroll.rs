use std::collections::HashSet;

use super::section::Section;

/// Rows below the top of the view probed when deciding the active section.
pub const ACTIVE_PROBE_ROWS: usize = 3;

/// Rows left above a glide target so the section heading clears the nav bar.
pub const NAV_CLEARANCE_ROWS: usize = 2;

/// The nav bar switches to its scrolled style past this offset.
pub const SCROLLED_AFTER_ROWS: usize = 4;

/// The scroll-to-top control appears past this offset.
pub const SCROLL_TOP_AFTER_ROWS: usize = 18;

/// A window over the document, with eased glides and one-shot reveals.
///
/// The viewport never renders; it only tracks where the window sits, where
/// it is gliding to, and which sections have come into view at least once.
#[derive(Debug, Clone)]
pub struct Viewport {
    offset: usize,
    view_rows: usize,
    page_rows: usize,
    target: Option<usize>,
    revealed: HashSet<&'static str>,
}

impl Viewport {
    pub fn new(view_rows: usize, page_rows: usize) -> Self {
        Self {
            offset: 0,
            view_rows,
            page_rows,
            target: None,
            revealed: HashSet::new(),
        }
    }

    /// The first document row in view.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn view_rows(&self) -> usize {
        self.view_rows
    }

    /// Records a terminal resize; the offset is re-clamped.
    pub fn resize(&mut self, view_rows: usize) {
        self.view_rows = view_rows;
        self.offset = self.offset.min(self.max_offset());
    }

    fn max_offset(&self) -> usize {
        self.page_rows.saturating_sub(self.view_rows)
    }

    /// Moves the window immediately, cancelling any glide in progress.
    pub fn scroll_by(&mut self, delta: isize) {
        self.target = None;
        self.offset = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
    }

    /// Starts an eased glide toward the given document row.
    pub fn glide_to(&mut self, row: usize) {
        self.target = Some(row.min(self.max_offset()));
    }

    /// Starts an eased glide back to the top of the page.
    pub fn to_top(&mut self) {
        self.glide_to(0);
    }

    /// Advances any glide in progress by one frame.
    ///
    /// Each frame covers a quarter of the remaining distance, at least one
    /// row, so glides decelerate as they land.
    pub fn tick(&mut self) {
        let Some(target) = self.target else { return };
        // A glide to the current offset is already home.
        if target == self.offset {
            self.target = None;
            return;
        }
        let distance = target.abs_diff(self.offset);
        let step = (distance / 4).max(1);
        if target > self.offset {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        if self.offset == target {
            self.target = None;
        }
    }

    pub fn gliding(&self) -> bool {
        self.target.is_some()
    }

    /// The section under the probe row, used to highlight the nav entry.
    pub fn active_section<'a>(&self, sections: &'a [Section]) -> Option<&'a Section> {
        let probe = self.offset + ACTIVE_PROBE_ROWS;
        sections
            .iter()
            .find(|section| section.contains(probe))
            .or_else(|| sections.last().filter(|last| probe > last.bottom()))
    }

    /// Whether the nav bar should use its scrolled style.
    pub fn scrolled(&self) -> bool {
        self.offset > SCROLLED_AFTER_ROWS
    }

    /// Whether the scroll-to-top control should be shown.
    pub fn scroll_top_visible(&self) -> bool {
        self.offset > SCROLL_TOP_AFTER_ROWS
    }

    /// Marks every section currently in view as revealed. One-shot: once a
    /// section has been seen it stays revealed for the life of the page.
    pub fn observe(&mut self, sections: &[Section]) {
        let view_end = self.offset + self.view_rows;
        for section in sections {
            if section.top < view_end && section.bottom() >= self.offset {
                self.revealed.insert(section.id);
            }
        }
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }
}
