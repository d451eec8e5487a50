//! The proposal flow as an explicit state machine.
//!
//! `Loading` reads the page URL once and moves to `Create`, `Intro` or
//! `Proposal`. From there the flow only moves forward (`Intro -> Proposal ->
//! Accepted`), except that `Create` may loop between its form and a generated
//! link. Every mode carries exactly the data that is valid in it.

use anyhow::Result;
use serde::Serialize;
use url::Url;

use crate::escalation::EscalationState;
use crate::link::{self, LinkParams, ShareLink};
use crate::model::{RecipientContext, SenderIdentity};
use crate::notify::{
    Celebration, EffectTrigger, ExternalActionOpener, ShareAction, ShareTarget, build_share_action,
};

#[derive(Clone, Debug, PartialEq)]
pub struct FlowSettings {
    pub base_url: Url,
    pub share: ShareTarget,
    pub celebration: Celebration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Loading,
    Create,
    Intro,
    Proposal,
    Accepted,
}

impl ModeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Loading => "loading",
            ModeKind::Create => "create",
            ModeKind::Intro => "intro",
            ModeKind::Proposal => "proposal",
            ModeKind::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowMode {
    Loading,
    Create(CreateStage),
    Intro { sender: SenderIdentity },
    Proposal(Proposal),
    Accepted(Acceptance),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CreateStage {
    Form,
    Generated {
        identity: SenderIdentity,
        link: ShareLink,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub sender: SenderIdentity,
    pub recipient_name: String,
    pub escalation: EscalationState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Acceptance {
    pub sender: SenderIdentity,
    pub recipient_name: String,
    /// Declines recorded before the proposal was accepted.
    pub declines: u64,
    pub share: ShareAction,
}

impl Proposal {
    pub fn context(&self) -> RecipientContext {
        RecipientContext {
            sender_name: self.sender.name.clone(),
            sender_phone: self.sender.phone.clone(),
            recipient_name: Some(self.recipient_name.clone()),
        }
    }
}

impl Acceptance {
    pub fn context(&self) -> RecipientContext {
        RecipientContext {
            sender_name: self.sender.name.clone(),
            sender_phone: self.sender.phone.clone(),
            recipient_name: Some(self.recipient_name.clone()),
        }
    }
}

impl FlowMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            FlowMode::Loading => ModeKind::Loading,
            FlowMode::Create(_) => ModeKind::Create,
            FlowMode::Intro { .. } => ModeKind::Intro,
            FlowMode::Proposal(_) => ModeKind::Proposal,
            FlowMode::Accepted(_) => ModeKind::Accepted,
        }
    }
}

/// Pick the starting mode from the page's query parameters.
pub fn select_mode(params: &LinkParams) -> FlowMode {
    let Some(context) = params.recipient_context() else {
        return FlowMode::Create(CreateStage::Form);
    };
    // Same trimming as the forms apply.
    let sender = SenderIdentity {
        name: context.sender_name.trim().to_string(),
        phone: context.sender_phone.trim().to_string(),
    };
    match context.recipient_name {
        Some(recipient_name) => FlowMode::Proposal(Proposal {
            sender,
            recipient_name: recipient_name.trim().to_string(),
            escalation: EscalationState::new(),
        }),
        None => FlowMode::Intro { sender },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// The one-time startup read of the page URL.
    Load { url: String },
    SubmitSender { name: String, phone: String },
    CreateAnother,
    SubmitRecipient { name: String },
    Decline,
    Accept,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Load { .. } => "load",
            FlowEvent::SubmitSender { .. } => "submit-sender",
            FlowEvent::CreateAnother => "create-another",
            FlowEvent::SubmitRecipient { .. } => "submit-recipient",
            FlowEvent::Decline => "decline",
            FlowEvent::Accept => "accept",
        }
    }
}

/// What an accepted event changed.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Entered(ModeKind),
    LinkGenerated(ShareLink),
    FormReset,
    Declined(EscalationState),
    Accepted(ShareAction),
    /// Accepted but nothing changed (blank name, repeated accept, ...).
    Ignored,
}

pub struct FlowController<E> {
    mode: FlowMode,
    settings: FlowSettings,
    effects: E,
}

impl<E: EffectTrigger> FlowController<E> {
    pub fn new(settings: FlowSettings, effects: E) -> Self {
        FlowController {
            mode: FlowMode::Loading,
            settings,
            effects,
        }
    }

    /// New controller that has already read `url`.
    pub fn start(settings: FlowSettings, effects: E, url: &str) -> Self {
        let mut flow = Self::new(settings, effects);
        flow.mode = select_mode(&link::decode(url));
        tracing::debug!(mode = %flow.kind(), "flow started");
        flow
    }

    /// Continue a proposal whose state lives elsewhere (e.g. in a rendered page).
    pub fn resume_proposal(settings: FlowSettings, effects: E, proposal: Proposal) -> Self {
        FlowController {
            mode: FlowMode::Proposal(proposal),
            settings,
            effects,
        }
    }

    pub fn mode(&self) -> &FlowMode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn into_effects(self) -> E {
        self.effects
    }

    /// Apply one event. Events that make no sense in the current mode are
    /// rejected and leave the mode untouched.
    pub fn dispatch(&mut self, event: FlowEvent) -> Result<Outcome> {
        let from = self.kind();
        let name = event.name();
        let mode = std::mem::replace(&mut self.mode, FlowMode::Loading);
        let (next, outcome) = self.transition(mode, event);
        self.mode = next;
        match &outcome {
            Ok(_) => tracing::debug!(event = name, %from, to = %self.kind(), "flow transition"),
            Err(err) => tracing::debug!(event = name, %from, error = %err, "flow event rejected"),
        }
        outcome
    }

    fn transition(&mut self, mode: FlowMode, event: FlowEvent) -> (FlowMode, Result<Outcome>) {
        match (mode, event) {
            (FlowMode::Loading, FlowEvent::Load { url }) => {
                let next = select_mode(&link::decode(&url));
                let kind = next.kind();
                (next, Ok(Outcome::Entered(kind)))
            }

            (FlowMode::Create(CreateStage::Form), FlowEvent::SubmitSender { name, phone }) => {
                match SenderIdentity::new(&name, &phone) {
                    Ok(identity) => {
                        let link = link::encode(&self.settings.base_url, &identity);
                        let out = Outcome::LinkGenerated(link.clone());
                        (
                            FlowMode::Create(CreateStage::Generated { identity, link }),
                            Ok(out),
                        )
                    }
                    Err(err) => (FlowMode::Create(CreateStage::Form), Err(err)),
                }
            }
            (FlowMode::Create(CreateStage::Generated { .. }), FlowEvent::CreateAnother) => {
                (FlowMode::Create(CreateStage::Form), Ok(Outcome::FormReset))
            }
            (FlowMode::Create(CreateStage::Form), FlowEvent::CreateAnother) => {
                (FlowMode::Create(CreateStage::Form), Ok(Outcome::Ignored))
            }

            (FlowMode::Intro { sender }, FlowEvent::SubmitRecipient { name }) => {
                let name = name.trim();
                if name.is_empty() {
                    return (FlowMode::Intro { sender }, Ok(Outcome::Ignored));
                }
                let next = FlowMode::Proposal(Proposal {
                    sender,
                    recipient_name: name.to_string(),
                    escalation: EscalationState::new(),
                });
                (next, Ok(Outcome::Entered(ModeKind::Proposal)))
            }

            (FlowMode::Proposal(mut proposal), FlowEvent::Decline) => {
                let state = proposal.escalation.decline();
                (FlowMode::Proposal(proposal), Ok(Outcome::Declined(state)))
            }
            (FlowMode::Proposal(proposal), FlowEvent::Accept) => {
                let share = build_share_action(
                    &proposal.context(),
                    &proposal.recipient_name,
                    &self.settings.share,
                );
                self.effects.celebrate(&self.settings.celebration);
                tracing::info!(
                    declines = proposal.escalation.decline_count(),
                    "proposal accepted"
                );
                let out = Outcome::Accepted(share.clone());
                let next = FlowMode::Accepted(Acceptance {
                    sender: proposal.sender,
                    recipient_name: proposal.recipient_name,
                    declines: proposal.escalation.decline_count(),
                    share,
                });
                (next, Ok(out))
            }
            (mode @ FlowMode::Accepted(_), FlowEvent::Accept) => (mode, Ok(Outcome::Ignored)),

            (mode, event) => {
                let err = anyhow::anyhow!(
                    "{} is not valid while in {} mode",
                    event.name(),
                    mode.kind()
                );
                (mode, Err(err))
            }
        }
    }

    pub fn submit_sender(&mut self, name: &str, phone: &str) -> Result<ShareLink> {
        match self.dispatch(FlowEvent::SubmitSender {
            name: name.to_string(),
            phone: phone.to_string(),
        })? {
            Outcome::LinkGenerated(link) => Ok(link),
            other => anyhow::bail!("unexpected outcome {:?}", other),
        }
    }

    pub fn create_another(&mut self) -> Result<()> {
        self.dispatch(FlowEvent::CreateAnother).map(|_| ())
    }

    /// Returns false (and stays in intro) for a blank name.
    pub fn submit_recipient(&mut self, name: &str) -> Result<bool> {
        let out = self.dispatch(FlowEvent::SubmitRecipient {
            name: name.to_string(),
        })?;
        Ok(out != Outcome::Ignored)
    }

    pub fn decline(&mut self) -> Result<EscalationState> {
        match self.dispatch(FlowEvent::Decline)? {
            Outcome::Declined(state) => Ok(state),
            other => anyhow::bail!("unexpected outcome {:?}", other),
        }
    }

    /// The share action is returned only by the call that performed the
    /// acceptance.
    pub fn accept(&mut self) -> Result<Option<ShareAction>> {
        match self.dispatch(FlowEvent::Accept)? {
            Outcome::Accepted(share) => Ok(Some(share)),
            _ => Ok(None),
        }
    }

    /// Hand the accepted proposal's share action to `opener`. Returns false
    /// when there is nothing to share yet.
    pub fn open_share<O: ExternalActionOpener + ?Sized>(&self, opener: &mut O) -> bool {
        match &self.mode {
            FlowMode::Accepted(acceptance) => {
                opener.open(&acceptance.share);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod tests;
