//! Side effects of an accepted proposal: the local celebration and the
//! outbound message handoff. Both go through small capability traits so the
//! flow itself never touches a renderer or the host system.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{RECIPIENT_PLACEHOLDER, SENDER_PLACEHOLDER};
use crate::model::RecipientContext;

/// Parameters for the one-shot celebratory burst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Celebration {
    pub particle_count: u32,
    /// Degrees.
    pub spread: u32,
    /// Vertical origin as a fraction of the viewport, 0.0 at the top.
    pub origin_y: f32,
}

impl Default for Celebration {
    fn default() -> Self {
        Celebration {
            particle_count: 150,
            spread: 60,
            origin_y: 0.6,
        }
    }
}

pub trait EffectTrigger {
    /// Fire-and-forget.
    fn celebrate(&mut self, celebration: &Celebration);
}

impl<T: EffectTrigger + ?Sized> EffectTrigger for &mut T {
    fn celebrate(&mut self, celebration: &Celebration) {
        (**self).celebrate(celebration)
    }
}

/// Remembers what was fired so a front end can render it later.
#[derive(Clone, Debug, Default)]
pub struct RecordedEffects {
    pub celebrations: Vec<Celebration>,
}

impl EffectTrigger for RecordedEffects {
    fn celebrate(&mut self, celebration: &Celebration) {
        self.celebrations.push(celebration.clone());
    }
}

/// Where the outbound message goes and what it says.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareTarget {
    pub messaging_base: Url,
    pub message_template: String,
}

/// A pre-filled message draft in an external messaging application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareAction {
    pub url: Url,
    pub phone: String,
    pub message: String,
}

pub trait ExternalActionOpener {
    /// Hand the action to the host. Delivery is never observed.
    fn open(&mut self, action: &ShareAction);
}

impl<T: ExternalActionOpener + ?Sized> ExternalActionOpener for &mut T {
    fn open(&mut self, action: &ShareAction) {
        (**self).open(action)
    }
}

/// Opens actions with the platform's default handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemOpener;

impl ExternalActionOpener for SystemOpener {
    fn open(&mut self, action: &ShareAction) {
        match open::that_detached(action.url.as_str()) {
            Ok(()) => tracing::info!(url = %action.url, "opened share action"),
            Err(err) => tracing::warn!(url = %action.url, error = %err, "could not open share action"),
        }
    }
}

/// Build the message draft the recipient sends back to the sender.
///
/// The draft is addressed to the sender's phone; non-digits are dropped from
/// the path since messaging deep links expect a bare international number.
/// A phone with no digits leaves the contact for the user to pick.
pub fn build_share_action(
    context: &RecipientContext,
    recipient_display_name: &str,
    target: &ShareTarget,
) -> ShareAction {
    let message = render_template(
        &target.message_template,
        &context.sender_name,
        recipient_display_name,
    );
    let digits: String = context
        .sender_phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    let mut url = target.messaging_base.clone();
    if !digits.is_empty() {
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&digits);
        }
    }
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair("text", &message);

    ShareAction {
        url,
        phone: context.sender_phone.clone(),
        message,
    }
}

// Single pass so a name that itself contains a placeholder is left alone.
fn render_template(template: &str, sender: &str, recipient: &str) -> String {
    let mut out = String::with_capacity(template.len() + sender.len() + recipient.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(SENDER_PLACEHOLDER) {
            out.push_str(sender);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(RECIPIENT_PLACEHOLDER) {
            out.push_str(recipient);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
