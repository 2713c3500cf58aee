/// Severity tier for a character counter, by fraction of the maximum used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTier {
    /// At or below 70% of the maximum.
    Normal,
    /// Strictly above 70%, at or below 90%.
    Warning,
    /// Strictly above 90%.
    Critical,
}

/// A derived character count for a length-bounded field.
///
/// Recomputed from the raw (untrimmed) value on every input change; never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub len: usize,
    pub max: usize,
}

impl CharCount {
    /// Counts the `char`s of `value` against `max`.
    pub fn of(value: &str, max: usize) -> Self {
        Self {
            len: value.chars().count(),
            max,
        }
    }

    /// Classifies the count. The 0.7 and 0.9 boundaries are exclusive on the
    /// lower side: exactly 70% (or 90%) of the maximum stays in the lower
    /// tier. Integer arithmetic keeps the boundaries exact.
    pub fn tier(self) -> CounterTier {
        if self.len * 10 > self.max * 9 {
            CounterTier::Critical
        } else if self.len * 10 > self.max * 7 {
            CounterTier::Warning
        } else {
            CounterTier::Normal
        }
    }

    /// Characters left before the maximum is exceeded.
    pub fn remaining(self) -> usize {
        self.max.saturating_sub(self.len)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    fn tier_of(len: usize) -> CounterTier {
        CharCount { len, max: 1000 }.tier()
    }

    #[test]
    fn exactly_seventy_percent_is_normal() {
        assert_eq!(tier_of(700), CounterTier::Normal);
    }

    #[test]
    fn just_over_seventy_percent_is_warning() {
        assert_eq!(tier_of(701), CounterTier::Warning);
    }

    #[test]
    fn exactly_ninety_percent_is_warning() {
        assert_eq!(tier_of(900), CounterTier::Warning);
    }

    #[test]
    fn just_over_ninety_percent_is_critical() {
        assert_eq!(tier_of(901), CounterTier::Critical);
    }

    #[test]
    fn empty_is_normal() {
        assert_eq!(tier_of(0), CounterTier::Normal);
    }

    #[test]
    fn over_max_is_critical() {
        assert_eq!(tier_of(1200), CounterTier::Critical);
    }

    #[test]
    fn of_counts_chars() {
        let count = CharCount::of("héllo", 10);
        assert_eq!(count.len, 5);
        assert_eq!(count.remaining(), 5);
    }

    #[test]
    fn remaining_saturates_at_zero() {
        assert_eq!(CharCount { len: 12, max: 10 }.remaining(), 0);
    }

    #[quickcheck]
    fn tiers_partition_every_length(len: u16) -> bool {
        let count = CharCount {
            len: usize::from(len),
            max: 1000,
        };
        match count.tier() {
            CounterTier::Normal => count.len * 10 <= 7000,
            CounterTier::Warning => count.len * 10 > 7000 && count.len * 10 <= 9000,
            CounterTier::Critical => count.len * 10 > 9000,
        }
    }
}
