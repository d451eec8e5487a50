use serde::{Deserialize, Serialize};

/// Labels for the negative control, indexed by decline count. Counts past the
/// end stay on the last entry.
pub const DECLINE_PHRASES: [&str; 11] = [
    "No",
    "Are you sure?",
    "Really sure?",
    "Please be my girlfriend",
    "Don't do this to me",
    "I'm gonna cry...",
    "You're breaking my heart ;(",
    "Please be my girlfriend",
    "Pretty please?",
    "Please be my girlfriend",
    "No isn't an option",
];

/// Affirmative control size before any decline, in px.
pub const BASE_SIZE: u64 = 16;

/// Growth per decline, in px.
pub const SIZE_STEP: u64 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationState {
    decline_count: u64,
}

impl EscalationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume at a known count (e.g. one carried by a rendered page).
    pub fn with_count(decline_count: u64) -> Self {
        EscalationState { decline_count }
    }

    pub fn decline(&mut self) -> EscalationState {
        self.decline_count = self.decline_count.saturating_add(1);
        *self
    }

    pub fn decline_count(&self) -> u64 {
        self.decline_count
    }

    pub fn label(&self) -> &'static str {
        phrase_for(self.decline_count)
    }

    pub fn affirmative_size(&self) -> u64 {
        affirmative_size(self.decline_count)
    }
}

pub fn phrase_for(decline_count: u64) -> &'static str {
    let last = DECLINE_PHRASES.len() - 1;
    let idx = usize::try_from(decline_count).map_or(last, |n| n.min(last));
    DECLINE_PHRASES[idx]
}

/// `BASE_SIZE + SIZE_STEP * decline_count`, uncapped.
pub fn affirmative_size(decline_count: u64) -> u64 {
    BASE_SIZE.saturating_add(SIZE_STEP.saturating_mul(decline_count))
}
