use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::handle_key;
use super::render::{button_widths, sparkle_cells};
use super::*;
use crate::config::AppConfig;
use crate::escalation::{DECLINE_PHRASES, EscalationState};
use crate::flow::ModeKind;
use crate::notify::ShareAction;

#[derive(Clone)]
struct Shared<T>(Rc<RefCell<Vec<T>>>);

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Shared(Rc::new(RefCell::new(Vec::new())))
    }
}

impl ClipboardWriter for Shared<String> {
    fn write_text(&mut self, text: &str) -> bool {
        self.0.borrow_mut().push(text.to_string());
        true
    }
}

impl ExternalActionOpener for Shared<ShareAction> {
    fn open(&mut self, action: &ShareAction) {
        self.0.borrow_mut().push(action.clone());
    }
}

struct Unavailable;

impl ClipboardWriter for Unavailable {
    fn write_text(&mut self, _text: &str) -> bool {
        false
    }
}

fn app_at(url: Option<&str>) -> App {
    App::load(crate::tui::TuiRunOptions {
        url: url.map(str::to_string),
        config: AppConfig::default(),
    })
    .unwrap()
}

fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[test]
fn creator_types_details_and_copies_link() {
    let mut app = app_at(None);
    let copied = Shared::<String>::default();
    app.clipboard = Box::new(copied.clone());
    assert_eq!(app.flow.kind(), ModeKind::Create);

    type_str(&mut app, "Alex");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.focus, Field::Phone);
    type_str(&mut app, "15551234567");
    press(&mut app, KeyCode::Enter);

    let FlowMode::Create(CreateStage::Generated { link, .. }) = app.flow.mode() else {
        panic!("expected a generated link");
    };
    let link = link.to_string();
    assert!(link.contains("sender=Alex&phone=15551234567"));

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(copied.0.borrow().as_slice(), &[link]);
    assert!(app.copy_ack.is_active(Instant::now()));

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.flow.mode(), &FlowMode::Create(CreateStage::Form));
    assert!(app.name_input.buf.is_empty());
    assert!(!app.copy_ack.is_active(Instant::now()));
}

#[test]
fn missing_field_shows_error_and_stays_on_form() {
    let mut app = app_at(None);
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "555");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.flow.mode(), &FlowMode::Create(CreateStage::Form));
    assert!(app.notice.as_ref().is_some_and(|n| n.error));
}

#[test]
fn clipboard_failure_is_reported_not_fatal() {
    let mut app = app_at(None);
    app.clipboard = Box::new(Unavailable);
    type_str(&mut app, "Alex");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "1");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('c'));
    assert!(!app.copy_ack.is_active(Instant::now()));
    assert!(app.notice.as_ref().is_some_and(|n| n.error));
    assert!(!app.quit);
}

#[test]
fn recipient_declines_then_accepts_and_shares() {
    let mut app = app_at(Some("http://127.0.0.1:8080/?sender=Alex&phone=15551234567"));
    let opened = Shared::<ShareAction>::default();
    app.opener = Box::new(opened.clone());
    assert_eq!(app.flow.kind(), ModeKind::Intro);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.flow.kind(), ModeKind::Intro);

    type_str(&mut app, "Sam");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.flow.kind(), ModeKind::Proposal);

    for _ in 0..3 {
        press(&mut app, KeyCode::Char('n'));
    }
    let FlowMode::Proposal(p) = app.flow.mode() else {
        panic!("expected proposal");
    };
    assert_eq!(p.escalation.label(), DECLINE_PHRASES[3]);

    press(&mut app, KeyCode::Right);
    assert_eq!(app.choice, Choice::No);
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.flow.kind(), ModeKind::Accepted);
    assert_eq!(app.flow.effects().fired, 1);

    // Further keys never re-fire the celebration.
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.flow.effects().fired, 1);

    press(&mut app, KeyCode::Char('s'));
    let opened = opened.0.borrow();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].message.contains("Alex"));
    assert!(opened[0].message.contains("Sam"));
}

#[test]
fn esc_clears_field_before_quitting() {
    let mut app = app_at(Some("?sender=Alex&phone=1"));
    type_str(&mut app, "Sa");
    press(&mut app, KeyCode::Esc);
    assert!(app.recipient_input.buf.is_empty());
    assert!(!app.quit);
    press(&mut app, KeyCode::Esc);
    assert!(app.quit);
}

#[test]
fn yes_button_widens_until_it_runs_out_of_room() {
    let (w0, _) = button_widths(&EscalationState::new(), 80);
    let (w3, _) = button_widths(&EscalationState::with_count(3), 80);
    assert!(w3 > w0);

    let (huge, no_w) = button_widths(&EscalationState::with_count(1_000_000), 80);
    assert!(huge + no_w <= 80);
}

#[test]
fn sparkles_stay_inside_the_border_and_hold_per_tick() {
    let area = ratatui::layout::Rect::new(2, 3, 20, 6);
    let cells = sparkle_cells(7, 50, area);
    assert_eq!(cells.len(), 50);
    for (x, y) in &cells {
        assert!((3..21).contains(x), "x {x} outside border");
        assert!((4..8).contains(y), "y {y} outside border");
    }
    assert_eq!(cells, sparkle_cells(7, 50, area));

    assert!(sparkle_cells(7, 50, ratatui::layout::Rect::new(0, 0, 2, 10)).is_empty());
}

#[test]
fn notice_timestamps_use_utc_clock_time() {
    // 2026-02-14T09:05:07Z
    let ts = OffsetDateTime::from_unix_timestamp(1771059907).unwrap();
    assert_eq!(fmt_notice_ts(ts), "09:05:07Z");
}
