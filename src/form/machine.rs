use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::model::{CharCount, FieldRegistry, validate};
use crate::transport::Payload;

use super::event::{FormAction, FormEvent};
use super::view::FieldView;

/// How long the success confirmation stays up before the form clears itself.
pub const SUCCESS_RESET_DELAY: Duration = Duration::from_millis(3000);

/// How long the failure banner stays up before dismissing itself.
pub const BANNER_DISMISS_DELAY: Duration = Duration::from_millis(5000);

/// The user-facing failure banner text.
pub const SUBMISSION_FAILED_NOTICE: &str = "Something went wrong. Please try again.";

/// Lifecycle phase of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Waiting for input; the trigger is armed.
    Idle,
    /// Running validation over all fields.
    Validating,
    /// A dispatch is in flight; the trigger is disabled.
    Submitting,
    /// The last submission was delivered.
    Success,
    /// The last submission was refused.
    Failed,
}

/// A transient notice shown after a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banner {
    pub message: &'static str,
    pub expires_at: Instant,
}

/// The contact form: field values, per-field presentation, and the
/// submission lifecycle, driven entirely by [`FormEvent`]s.
///
/// The machine holds no clock and spawns no tasks. Timed behavior is
/// expressed as deadlines armed from the instants events carry and
/// expired by [`FormEvent::Tick`]; asynchronous work is delegated to the
/// driver through [`FormAction::Dispatch`].
pub struct ContactForm {
    registry: FieldRegistry,
    values: BTreeMap<&'static str, String>,
    views: BTreeMap<&'static str, FieldView>,
    phase: FormPhase,
    success_visible: bool,
    banner: Option<Banner>,
    auto_reset_at: Option<Instant>,
}

impl ContactForm {
    pub fn new(registry: FieldRegistry) -> Self {
        let values = registry.iter().map(|s| (s.name, String::new())).collect();
        let views = registry.iter().map(|s| (s.name, FieldView::Neutral)).collect();
        Self {
            registry,
            values,
            views,
            phase: FormPhase::Idle,
            success_visible: false,
            banner: None,
            auto_reset_at: None,
        }
    }

    /// A form over the reference contact registry.
    pub fn contact() -> Self {
        Self::new(FieldRegistry::contact())
    }

    /// Moves to `to`, asserting the move is one the lifecycle allows.
    fn transition(&mut self, to: FormPhase) {
        use FormPhase::*;
        debug_assert!(
            matches!(
                (self.phase, to),
                (Idle | Success | Failed, Validating)
                    | (Validating, Submitting)
                    | (Submitting, Success | Failed)
                    | (_, Idle)
            ),
            "illegal phase transition {:?} -> {to:?}",
            self.phase
        );
        self.phase = to;
    }

    /// Handles one event, returning what the driver must do next.
    pub fn handle(&mut self, event: FormEvent) -> FormAction {
        match event {
            FormEvent::Submit => self.submit(),
            FormEvent::Settled { outcome, now } => self.settle(outcome.is_ok(), now),
            FormEvent::Input { field, value } => self.input(&field, value),
            FormEvent::Reset => self.reset(),
            FormEvent::Tick(now) => self.tick(now),
        }
    }

    fn submit(&mut self) -> FormAction {
        // Re-entrant triggers while a dispatch is in flight are dropped.
        if self.phase == FormPhase::Submitting {
            return FormAction::None;
        }
        self.auto_reset_at = None;
        self.success_visible = false;
        self.banner = None;
        self.transition(FormPhase::Validating);
        if self.validate_all() {
            self.transition(FormPhase::Submitting);
            FormAction::Dispatch(self.form_data())
        } else {
            self.transition(FormPhase::Idle);
            match self.first_invalid() {
                Some(name) => FormAction::Focus(name),
                None => FormAction::None,
            }
        }
    }

    fn settle(&mut self, delivered: bool, now: Instant) -> FormAction {
        // A settle can only answer an in-flight dispatch; anything else is
        // stale (the user reset, or a duplicate completion) and is dropped.
        if self.phase != FormPhase::Submitting {
            return FormAction::None;
        }
        if delivered {
            self.transition(FormPhase::Success);
            self.success_visible = true;
            self.auto_reset_at = Some(now + SUCCESS_RESET_DELAY);
            FormAction::RevealSuccess
        } else {
            self.transition(FormPhase::Failed);
            self.banner = Some(Banner {
                message: SUBMISSION_FAILED_NOTICE,
                expires_at: now + BANNER_DISMISS_DELAY,
            });
            FormAction::None
        }
    }

    fn input(&mut self, field: &str, value: String) -> FormAction {
        let Some(name) = self.registry.get(field).map(|spec| spec.name) else {
            return FormAction::None;
        };
        self.values.insert(name, value);
        self.views.insert(name, FieldView::Neutral);
        // Editing keeps the form alive: a pending auto-reset would wipe the
        // new draft out from under the user, and a lingering confirmation
        // would misdescribe the draft being typed.
        self.auto_reset_at = None;
        self.success_visible = false;
        FormAction::None
    }

    fn reset(&mut self) -> FormAction {
        // The in-flight payload already left; clearing under it would make
        // the eventual settle describe a form the user no longer sees.
        if self.phase == FormPhase::Submitting {
            return FormAction::None;
        }
        self.clear();
        match self.registry.first() {
            Some(spec) => FormAction::Focus(spec.name),
            None => FormAction::None,
        }
    }

    fn tick(&mut self, now: Instant) -> FormAction {
        if let Some(banner) = self.banner
            && banner.expires_at <= now
        {
            self.banner = None;
            if self.phase == FormPhase::Failed {
                self.transition(FormPhase::Idle);
            }
        }
        if let Some(deadline) = self.auto_reset_at
            && deadline <= now
        {
            self.clear();
            return match self.registry.first() {
                Some(spec) => FormAction::Focus(spec.name),
                None => FormAction::None,
            };
        }
        FormAction::None
    }

    fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
        for view in self.views.values_mut() {
            *view = FieldView::Neutral;
        }
        if self.phase != FormPhase::Idle {
            self.transition(FormPhase::Idle);
        }
        self.success_visible = false;
        self.banner = None;
        self.auto_reset_at = None;
    }

    /// Validates every field against its spec, updating all views.
    /// Returns `true` when the whole form is valid.
    pub fn validate_all(&mut self) -> bool {
        let mut all_valid = true;
        for spec in self.registry.iter() {
            let raw = self.values.get(spec.name).map(String::as_str).unwrap_or("");
            let view = match validate(spec, raw) {
                Ok(()) => FieldView::Valid,
                Err(e) => {
                    all_valid = false;
                    FieldView::Invalid(e.to_string())
                }
            };
            self.views.insert(spec.name, view);
        }
        all_valid
    }

    /// Snapshot of the form as it would be submitted: trimmed values keyed
    /// by field name.
    pub fn form_data(&self) -> Payload {
        self.registry
            .iter()
            .map(|spec| {
                let raw = self.values.get(spec.name).map(String::as_str).unwrap_or("");
                (spec.name.to_string(), raw.trim().to_string())
            })
            .collect()
    }

    /// Applies the field's format rule (if any) to its value, then
    /// re-validates just that field. Called when input focus leaves it.
    pub fn focus_left(&mut self, field: &str) {
        let Some(spec) = self.registry.get(field) else {
            return;
        };
        let name = spec.name;
        if let Some(format) = spec.format
            && let Some(value) = self.values.get(name)
            && !value.trim().is_empty()
        {
            let formatted = format.apply(value);
            self.values.insert(name, formatted);
        }
        let raw = self.values.get(name).map(String::as_str).unwrap_or("");
        let view = match validate(spec, raw) {
            Ok(()) => FieldView::Valid,
            Err(e) => FieldView::Invalid(e.to_string()),
        };
        self.views.insert(name, view);
    }

    /// The character counter for a length-bounded field.
    pub fn counter(&self, field: &str) -> Option<CharCount> {
        let spec = self.registry.get(field)?;
        let max = spec.max_len?;
        let raw = self.values.get(spec.name).map(String::as_str).unwrap_or("");
        Some(CharCount::of(raw, max))
    }

    /// The first field, in registration order, whose view is invalid.
    pub fn first_invalid(&self) -> Option<&'static str> {
        self.registry
            .iter()
            .map(|spec| spec.name)
            .find(|name| self.views.get(name).is_some_and(FieldView::is_invalid))
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Whether activating the submit trigger would do anything.
    pub fn trigger_enabled(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    /// Whether a loading indicator should be shown on the trigger.
    pub fn loading(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn success_visible(&self) -> bool {
        self.success_visible
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// The raw (untrimmed) value of a field; empty for unknown names.
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn view(&self, field: &str) -> &FieldView {
        static NEUTRAL: FieldView = FieldView::Neutral;
        self.views.get(field).unwrap_or(&NEUTRAL)
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Whether any field holds a non-empty value.
    pub fn is_dirty(&self) -> bool {
        self.values.values().any(|v| !v.is_empty())
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::contact()
    }
}
