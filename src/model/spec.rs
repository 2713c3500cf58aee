use std::sync::LazyLock;

use regex::Regex;

/// Email shape check: something@something.tld, no whitespace or extra `@`.
pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid hardcoded regex"));

/// A regex rule with its user-facing failure message.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub regex: &'static LazyLock<Regex>,
    pub message: &'static str,
}

/// A minimum-word-count rule with its user-facing failure message.
///
/// Words are whitespace-separated tokens; empty tokens are discarded, so
/// irregular spacing does not change the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRule {
    pub min_words: usize,
    pub message: &'static str,
}

/// Cosmetic formatting applied when focus leaves a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    /// Uppercase the first letter of each word (names).
    TitleCase,
    /// Lowercase the whole value (email addresses).
    Lowercase,
}

impl FormatRule {
    /// Applies the rule, returning the formatted value.
    pub fn apply(self, value: &str) -> String {
        match self {
            FormatRule::Lowercase => value.to_lowercase(),
            FormatRule::TitleCase => title_case(value),
        }
    }
}

/// Uppercases the first letter of each whitespace-separated word.
///
/// The rest of each word is left untouched ("mcLean" stays "McLean").
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Validation rules for a single form field.
///
/// Immutable after construction; one instance per logical field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Unique key identifying the field.
    pub name: &'static str,
    /// Display label shown next to the input.
    pub label: &'static str,
    /// Whether the field must be non-empty on submit.
    pub required: bool,
    /// Minimum length in characters, checked against the trimmed value.
    pub min_len: Option<usize>,
    /// Maximum length in characters, checked against the trimmed value.
    pub max_len: Option<usize>,
    /// Regex the trimmed value must match.
    pub pattern: Option<PatternRule>,
    /// Minimum word count the trimmed value must meet.
    pub word_rule: Option<WordRule>,
    /// Formatting applied when focus leaves the field.
    pub format: Option<FormatRule>,
}

impl FieldSpec {
    /// Creates a spec with no rules beyond the required flag.
    pub fn new(name: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            name,
            label,
            required,
            min_len: None,
            max_len: None,
            pattern: None,
            word_rule: None,
            format: None,
        }
    }
}

/// An ordered, immutable collection of field specs.
///
/// Iteration order is registration order, which defines what "first field"
/// means for focus handling. Lookup is by name.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    specs: Vec<FieldSpec>,
}

impl FieldRegistry {
    /// Creates a registry from the given specs. Names must be unique.
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        debug_assert!(
            specs
                .iter()
                .enumerate()
                .all(|(i, a)| specs[..i].iter().all(|b| a.name != b.name)),
            "field names must be unique"
        );
        Self { specs }
    }

    /// The reference contact-form registry: full name, email, subject, message.
    pub fn contact() -> Self {
        Self::new(vec![
            FieldSpec {
                min_len: Some(2),
                word_rule: Some(WordRule {
                    min_words: 2,
                    message: "Please enter your full name (first and last)",
                }),
                format: Some(FormatRule::TitleCase),
                ..FieldSpec::new("full_name", "Full Name", true)
            },
            FieldSpec {
                pattern: Some(PatternRule {
                    regex: &EMAIL_RE,
                    message: "Please enter a valid email address",
                }),
                format: Some(FormatRule::Lowercase),
                ..FieldSpec::new("email", "Email", true)
            },
            FieldSpec {
                min_len: Some(3),
                ..FieldSpec::new("subject", "Subject", true)
            },
            FieldSpec {
                min_len: Some(10),
                max_len: Some(1000),
                ..FieldSpec::new("message", "Message", true)
            },
        ])
    }

    /// Looks up a spec by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Iterates specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    /// Returns the first registered spec, if any.
    pub fn first(&self) -> Option<&FieldSpec> {
        self.specs.first()
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if the registry holds no fields.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
