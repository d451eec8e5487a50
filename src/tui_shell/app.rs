use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;

use crate::clipboard::{ClipboardWriter, CopyAck, SystemClipboard, copy_with_ack};
use crate::flow::{CreateStage, FlowController, FlowMode};
use crate::notify::{Celebration, EffectTrigger, ExternalActionOpener, SystemOpener};

use super::input::Input;

mod event_loop;
mod render;

/// How long the sparkle burst stays on screen.
const SPARKLE_DURATION: Duration = Duration::from_millis(3000);

pub(super) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let mut app = App::load(opts)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Field {
    Name,
    Phone,
}

impl Field {
    fn toggle(self) -> Self {
        match self {
            Field::Name => Field::Phone,
            Field::Phone => Field::Name,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Choice {
    Yes,
    No,
}

impl Choice {
    fn toggle(self) -> Self {
        match self {
            Choice::Yes => Choice::No,
            Choice::No => Choice::Yes,
        }
    }
}

/// Terminal stand-in for confetti: a short burst of sparkles.
#[derive(Debug, Default)]
pub(super) struct Sparkles {
    pub(super) started: Option<Instant>,
    pub(super) particles: u32,
    pub(super) fired: u32,
}

impl EffectTrigger for Sparkles {
    fn celebrate(&mut self, celebration: &Celebration) {
        self.started = Some(Instant::now());
        self.particles = celebration.particle_count;
        self.fired += 1;
    }
}

impl Sparkles {
    pub(super) fn active(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|t| now.saturating_duration_since(t) < SPARKLE_DURATION)
    }
}

#[derive(Clone, Debug)]
pub(super) struct Notice {
    pub(super) text: String,
    pub(super) error: bool,
    pub(super) ts: OffsetDateTime,
}

pub(super) struct App {
    pub(super) flow: FlowController<Sparkles>,
    pub(super) question: String,

    pub(super) name_input: Input,
    pub(super) phone_input: Input,
    pub(super) focus: Field,
    pub(super) recipient_input: Input,
    pub(super) choice: Choice,

    pub(super) copy_ack: CopyAck,
    pub(super) clipboard: Box<dyn ClipboardWriter>,
    pub(super) opener: Box<dyn ExternalActionOpener>,

    pub(super) notice: Option<Notice>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn load(opts: crate::tui::TuiRunOptions) -> Result<Self> {
        let settings = opts.config.flow_settings()?;
        let url = opts.url.unwrap_or_default();
        let flow = FlowController::start(settings, Sparkles::default(), &url);
        Ok(App {
            flow,
            question: opts.config.question.clone(),
            name_input: Input::default(),
            phone_input: Input::default(),
            focus: Field::Name,
            recipient_input: Input::default(),
            choice: Choice::Yes,
            copy_ack: CopyAck::new(opts.config.copy_ack()),
            clipboard: Box::new(SystemClipboard),
            opener: Box::new(SystemOpener),
            notice: None,
            quit: false,
        })
    }

    pub(super) fn push_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            error: false,
            ts: OffsetDateTime::now_utc(),
        });
    }

    pub(super) fn push_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            error: true,
            ts: OffsetDateTime::now_utc(),
        });
    }

    pub(super) fn focused_input(&mut self) -> Option<&mut Input> {
        match self.flow.mode() {
            FlowMode::Create(CreateStage::Form) => Some(match self.focus {
                Field::Name => &mut self.name_input,
                Field::Phone => &mut self.phone_input,
            }),
            FlowMode::Intro { .. } => Some(&mut self.recipient_input),
            _ => None,
        }
    }

    pub(super) fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub(super) fn toggle_choice(&mut self) {
        self.choice = self.choice.toggle();
    }

    pub(super) fn submit_creator_form(&mut self) {
        if self.focus == Field::Name && self.phone_input.is_blank() && !self.name_input.is_blank() {
            self.focus = Field::Phone;
            return;
        }
        match self
            .flow
            .submit_sender(&self.name_input.buf, &self.phone_input.buf)
        {
            Ok(_) => self.push_notice("link ready: press c to copy it"),
            Err(err) => self.push_error(format!("{:#}", err)),
        }
    }

    pub(super) fn copy_link(&mut self) {
        let FlowMode::Create(CreateStage::Generated { link, .. }) = self.flow.mode() else {
            return;
        };
        let text = link.to_string();
        if !copy_with_ack(
            self.clipboard.as_mut(),
            &mut self.copy_ack,
            &text,
            Instant::now(),
        ) {
            self.push_error("could not reach the clipboard; copy the link by hand");
        }
    }

    pub(super) fn create_another(&mut self) {
        if let Err(err) = self.flow.create_another() {
            self.push_error(format!("{:#}", err));
            return;
        }
        self.name_input.clear();
        self.phone_input.clear();
        self.focus = Field::Name;
        self.copy_ack.clear();
        self.notice = None;
    }

    pub(super) fn submit_recipient(&mut self) {
        match self.flow.submit_recipient(&self.recipient_input.buf) {
            Ok(true) => {
                self.choice = Choice::Yes;
                self.notice = None;
            }
            Ok(false) => self.push_error("tell us your name first"),
            Err(err) => self.push_error(format!("{:#}", err)),
        }
    }

    pub(super) fn decline(&mut self) {
        if let Err(err) = self.flow.decline() {
            self.push_error(format!("{:#}", err));
        }
    }

    pub(super) fn accept(&mut self) {
        match self.flow.accept() {
            Ok(Some(_)) => self.push_notice("press s to send your answer"),
            Ok(None) => {}
            Err(err) => self.push_error(format!("{:#}", err)),
        }
    }

    pub(super) fn activate_choice(&mut self) {
        match self.choice {
            Choice::Yes => self.accept(),
            Choice::No => self.decline(),
        }
    }

    pub(super) fn open_share(&mut self) {
        if self.flow.open_share(self.opener.as_mut()) {
            self.push_notice("opened your messaging app");
        }
    }
}

fn notice_ts_format() -> &'static [BorrowedFormatItem<'static>] {
    static FMT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse_borrowed::<2>(
            "[hour padding:zero]:[minute padding:zero]:[second padding:zero]Z",
        )
        .unwrap_or_default()
    })
}

pub(super) fn fmt_notice_ts(ts: OffsetDateTime) -> String {
    ts.format(notice_ts_format())
        .unwrap_or_else(|_| "--:--:--".to_string())
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
