use super::*;
use crate::escalation::DECLINE_PHRASES;
use crate::notify::RecordedEffects;

fn settings() -> FlowSettings {
    FlowSettings {
        base_url: Url::parse("https://example.test/").unwrap(),
        share: ShareTarget {
            messaging_base: Url::parse("https://wa.me/").unwrap(),
            message_template: "Hi {sender}, {recipient} says yes".to_string(),
        },
        celebration: Celebration::default(),
    }
}

fn open_at(url: &str) -> FlowController<RecordedEffects> {
    let mut flow = FlowController::new(settings(), RecordedEffects::default());
    flow.dispatch(FlowEvent::Load {
        url: url.to_string(),
    })
    .unwrap();
    flow
}

#[derive(Default)]
struct CountingOpener {
    opened: Vec<ShareAction>,
}

impl ExternalActionOpener for CountingOpener {
    fn open(&mut self, action: &ShareAction) {
        self.opened.push(action.clone());
    }
}

#[test]
fn mode_selection_follows_query_parameters() {
    assert_eq!(open_at("https://example.test/").kind(), ModeKind::Create);
    assert_eq!(
        open_at("https://example.test/?sender=Alex&phone=1").kind(),
        ModeKind::Intro
    );

    let flow = open_at("https://example.test/?sender=Alex&phone=1&name=Sam");
    let FlowMode::Proposal(p) = flow.mode() else {
        panic!("expected proposal, got {:?}", flow.kind());
    };
    assert_eq!(p.recipient_name, "Sam");
    assert_eq!(p.sender.name, "Alex");
    assert_eq!(p.escalation.decline_count(), 0);
}

#[test]
fn partial_or_malformed_urls_fall_back_to_create() {
    for url in [
        "https://example.test/?sender=Alex",
        "https://example.test/?phone=1&name=Sam",
        "%%%not a url",
        "https://example.test/?sender=&phone=",
    ] {
        assert_eq!(open_at(url).kind(), ModeKind::Create, "url {url:?}");
    }
}

#[test]
fn new_controller_is_loading_and_load_happens_once() {
    let mut flow = FlowController::new(settings(), RecordedEffects::default());
    assert_eq!(flow.kind(), ModeKind::Loading);
    assert!(flow.decline().is_err());

    flow.dispatch(FlowEvent::Load {
        url: "?sender=Alex&phone=1".to_string(),
    })
    .unwrap();
    assert_eq!(flow.kind(), ModeKind::Intro);

    let err = flow
        .dispatch(FlowEvent::Load {
            url: "?sender=Alex&phone=1&name=Sam".to_string(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("load"));
    assert_eq!(flow.kind(), ModeKind::Intro);
}

#[test]
fn creator_generates_link_and_can_start_over() {
    let mut flow = open_at("https://example.test/");
    let link = flow.submit_sender("Alex", "15551234567").unwrap();

    let params = link::decode(link.as_str());
    assert_eq!(params.sender.as_deref(), Some("Alex"));
    assert_eq!(params.phone.as_deref(), Some("15551234567"));

    // Identity is frozen until an explicit reset.
    assert!(flow.submit_sender("Other", "2").is_err());
    let FlowMode::Create(CreateStage::Generated { identity, .. }) = flow.mode() else {
        panic!("expected generated link");
    };
    assert_eq!(identity.name, "Alex");

    flow.create_another().unwrap();
    assert_eq!(flow.mode(), &FlowMode::Create(CreateStage::Form));
    let again = flow.submit_sender("Jo", "2").unwrap();
    assert!(again.as_str().contains("sender=Jo"));
}

#[test]
fn creator_form_requires_both_fields() {
    let mut flow = open_at("https://example.test/");
    assert!(flow.submit_sender("", "1").is_err());
    assert!(flow.submit_sender("Alex", " ").is_err());
    assert_eq!(flow.mode(), &FlowMode::Create(CreateStage::Form));
}

#[test]
fn blank_recipient_name_is_a_no_op() {
    let mut flow = open_at("?sender=Alex&phone=1");
    assert!(!flow.submit_recipient("   ").unwrap());
    assert_eq!(flow.kind(), ModeKind::Intro);

    assert!(flow.submit_recipient(" Sam ").unwrap());
    let FlowMode::Proposal(p) = flow.mode() else {
        panic!("expected proposal");
    };
    assert_eq!(p.recipient_name, "Sam");
}

#[test]
fn recipient_accepts_right_away() {
    let mut flow = open_at("https://example.test/?sender=Alex&phone=15551234567");
    flow.submit_recipient("Sam").unwrap();

    let share = flow.accept().unwrap().expect("first accept builds the action");
    assert_eq!(flow.kind(), ModeKind::Accepted);
    assert_eq!(flow.effects().celebrations.len(), 1);
    assert_eq!(share.message, "Hi Alex, Sam says yes");
    assert_eq!(share.url.path(), "/15551234567");

    let mut opener = CountingOpener::default();
    assert!(flow.open_share(&mut opener));
    assert_eq!(opener.opened, vec![share]);
}

#[test]
fn declines_escalate_until_acceptance() {
    let mut flow = open_at("?sender=Alex&phone=1&name=Sam");
    for _ in 0..3 {
        flow.decline().unwrap();
    }
    let FlowMode::Proposal(p) = flow.mode() else {
        panic!("expected proposal");
    };
    assert_eq!(p.escalation.decline_count(), 3);
    assert_eq!(p.escalation.label(), DECLINE_PHRASES[3]);

    flow.accept().unwrap();
    let FlowMode::Accepted(a) = flow.mode() else {
        panic!("expected accepted");
    };
    assert_eq!(a.declines, 3);
    assert_eq!(a.context().recipient_name.as_deref(), Some("Sam"));
}

#[test]
fn second_accept_has_no_effect() {
    let mut flow = open_at("?sender=Alex&phone=1&name=Sam");
    assert!(flow.accept().unwrap().is_some());
    let before = flow.mode().clone();

    assert_eq!(flow.accept().unwrap(), None);
    assert_eq!(flow.dispatch(FlowEvent::Accept).unwrap(), Outcome::Ignored);
    assert_eq!(flow.mode(), &before);
    assert_eq!(flow.effects().celebrations.len(), 1);

    // Terminal: declining after acceptance is rejected.
    assert!(flow.decline().is_err());
}

#[test]
fn nothing_to_share_before_acceptance() {
    let flow = open_at("?sender=Alex&phone=1&name=Sam");
    let mut opener = CountingOpener::default();
    assert!(!flow.open_share(&mut opener));
    assert!(opener.opened.is_empty());
}

#[test]
fn resumed_proposal_keeps_its_count() {
    let proposal = Proposal {
        sender: SenderIdentity::new("Alex", "1").unwrap(),
        recipient_name: "Sam".to_string(),
        escalation: EscalationState::with_count(12),
    };
    let mut flow = FlowController::resume_proposal(settings(), RecordedEffects::default(), proposal);
    let state = flow.decline().unwrap();
    assert_eq!(state.decline_count(), 13);
    assert_eq!(state.label(), DECLINE_PHRASES[10]);

    flow.accept().unwrap();
    assert_eq!(flow.into_effects().celebrations.len(), 1);
}

#[test]
fn start_reads_url_without_dispatch() {
    let flow = FlowController::start(settings(), RecordedEffects::default(), "?sender=A&phone=1");
    assert_eq!(flow.kind(), ModeKind::Intro);
    assert_eq!(flow.settings().base_url.as_str(), "https://example.test/");
}

#[test]
fn url_values_are_trimmed_like_form_input() {
    let flow = open_at("?sender=%20Alex%20&phone=%201%20&name=%20%20Sam%20");
    let FlowMode::Proposal(p) = flow.mode() else {
        panic!("expected proposal");
    };
    assert_eq!(p.recipient_name, "Sam");
    assert_eq!(p.sender, SenderIdentity::new("Alex", "1").unwrap());

    let mut intro = open_at("?sender=Alex&phone=1");
    intro.submit_recipient("  Sam ").unwrap();
    let FlowMode::Proposal(q) = intro.mode() else {
        panic!("expected proposal");
    };
    assert_eq!(q.recipient_name, p.recipient_name);
}
