mod counter;
mod spec;
mod validation;

pub use counter::{CharCount, CounterTier};
pub use spec::{EMAIL_RE, FieldRegistry, FieldSpec, FormatRule, PatternRule, WordRule};
pub use validation::{ValidationError, validate};
