/// Presentation state of a single field.
///
/// Derived from the last validation of that field; cleared back to
/// `Neutral` when the user edits the field again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldView {
    /// Untouched since the last edit or reset; no adornment.
    #[default]
    Neutral,
    /// Last validation passed.
    Valid,
    /// Last validation failed, with the message to show inline.
    Invalid(String),
}

impl FieldView {
    /// The inline error message, if the field is invalid.
    pub fn error(&self) -> Option<&str> {
        match self {
            FieldView::Invalid(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldView::Invalid(_))
    }
}
