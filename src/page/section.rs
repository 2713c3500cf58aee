/// A titled region of the page, positioned in document rows.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    /// Stable identifier used by navigation.
    pub id: &'static str,
    /// Heading shown in the section and the nav bar.
    pub title: &'static str,
    /// Body copy, one entry per paragraph.
    pub blurb: &'static [&'static str],
    /// First document row of the section.
    pub top: usize,
    /// Rows the section occupies.
    pub height: usize,
}

impl Section {
    /// Whether the given document row falls inside this section.
    pub fn contains(&self, row: usize) -> bool {
        (self.top..self.top + self.height).contains(&row)
    }

    /// The last document row of the section.
    pub fn bottom(&self) -> usize {
        self.top + self.height.saturating_sub(1)
    }
}

/// The landing page's sections, in document order with cumulative tops.
pub fn landing_sections() -> Vec<Section> {
    let specs: [(&str, &str, &[&str], usize); 4] = [
        (
            "home",
            "Home",
            &[
                "Welcome to Parlor.",
                "A quiet corner of the terminal where you can read about what",
                "we do and drop us a line without leaving your keyboard.",
            ],
            14,
        ),
        (
            "about",
            "About",
            &[
                "Parlor is a small studio that builds calm, focused software.",
                "We favor plain text, fast feedback, and tools that stay out",
                "of the way.",
            ],
            12,
        ),
        (
            "services",
            "Services",
            &[
                "Product design and prototyping.",
                "Systems consulting and performance work.",
                "Long-term maintenance of the software you rely on.",
            ],
            12,
        ),
        (
            "contact",
            "Contact",
            &["Tell us what you are working on. We read every message."],
            26,
        ),
    ];

    let mut top = 0;
    specs
        .into_iter()
        .map(|(id, title, blurb, height)| {
            let section = Section {
                id,
                title,
                blurb,
                top,
                height,
            };
            top += height;
            section
        })
        .collect()
}
