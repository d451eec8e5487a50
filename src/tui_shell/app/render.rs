use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::escalation::EscalationState;
use crate::flow::{CreateStage, FlowMode};

use super::super::input::Input;
use super::{App, Choice, Field, Sparkles, fmt_notice_ts};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Valentine",
            Style::default().fg(Color::Black).bg(Color::LightMagenta),
        ),
        Span::raw("  "),
        Span::styled(app.flow.kind().as_str(), Style::default().fg(Color::Magenta)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let now = Instant::now();
    match app.flow.mode() {
        FlowMode::Loading => {
            frame.render_widget(Paragraph::new("loading..."), chunks[1]);
        }
        FlowMode::Create(CreateStage::Form) => draw_creator_form(frame, app, chunks[1]),
        FlowMode::Create(CreateStage::Generated { identity, link }) => {
            let mut lines = vec![
                Line::from(format!("Your link is ready, {}!", identity.name)),
                Line::from(""),
                Line::from(Span::styled(
                    link.to_string(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(""),
            ];
            if app.copy_ack.is_active(now) {
                lines.push(Line::from(Span::styled(
                    "Copied!",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )));
            }
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title("Share link")),
                chunks[1],
            );
        }
        FlowMode::Intro { sender } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("{} has a question for you.", sender.name)),
                    Line::from("First, who are you?"),
                ]),
                parts[0],
            );
            draw_input(frame, &app.recipient_input, "Your name", true, parts[1]);
        }
        FlowMode::Proposal(proposal) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("Hi {}!", proposal.recipient_name)),
                    Line::from(Span::styled(
                        app.question.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                ]),
                parts[0],
            );
            draw_buttons(frame, &proposal.escalation, app.choice, parts[1]);
        }
        FlowMode::Accepted(acceptance) => {
            let lines = vec![
                Line::from(Span::styled(
                    "Yay!!! 💖",
                    Style::default()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!(
                    "{} is going to be so happy, {}.",
                    acceptance.sender.name, acceptance.recipient_name
                )),
                Line::from(""),
                Line::from("Message draft:"),
                Line::from(Span::styled(
                    acceptance.share.message.as_str(),
                    Style::default().fg(Color::Cyan),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL)),
                chunks[1],
            );
            draw_sparkles(frame, app.flow.effects(), now, chunks[1]);
        }
    }

    draw_footer(frame, app, chunks[2]);
}

fn draw_creator_form(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);
    frame.render_widget(
        Paragraph::new("Create a link to send to your special someone."),
        parts[0],
    );
    draw_input(
        frame,
        &app.name_input,
        "Your name",
        app.focus == Field::Name,
        parts[1],
    );
    draw_input(
        frame,
        &app.phone_input,
        "Your phone number",
        app.focus == Field::Phone,
        parts[2],
    );
}

fn draw_input(frame: &mut ratatui::Frame, input: &Input, title: &str, focused: bool, area: Rect) {
    let border = if focused {
        Style::default().fg(Color::LightMagenta)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(
        Paragraph::new(input.buf.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        ),
        area,
    );
    if focused {
        let x = area.x + 1 + input.cursor.min(u16::MAX as usize) as u16;
        let x = x.min(area.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Yes grows with every decline; No keeps its size and changes its label.
pub(super) fn button_widths(state: &EscalationState, available: u16) -> (u16, u16) {
    let no_label = state.label();
    let no_w = (no_label.chars().count() as u16).saturating_add(4);
    let grown = 6u64.saturating_add(state.affirmative_size() / 4);
    let max_yes = available.saturating_sub(no_w).saturating_sub(2).max(7);
    let yes_w = grown.min(max_yes as u64) as u16;
    (yes_w, no_w)
}

fn draw_buttons(frame: &mut ratatui::Frame, state: &EscalationState, choice: Choice, area: Rect) {
    let (yes_w, no_w) = button_widths(state, area.width);
    let yes_h = (3 + (state.affirmative_size() - 16) / 40).min(area.height.max(3) as u64) as u16;

    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(yes_w),
            Constraint::Length(2),
            Constraint::Length(no_w),
            Constraint::Min(0),
        ])
        .split(area);

    let selected = |c: Choice| {
        if c == choice {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let yes_area = Rect {
        height: yes_h.min(row[0].height),
        ..row[0]
    };
    let no_area = Rect {
        height: 3.min(row[2].height),
        ..row[2]
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("Yes", selected(Choice::Yes))))
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            ),
        yes_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(state.label(), selected(Choice::No))))
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
        no_area,
    );
}

fn draw_sparkles(frame: &mut ratatui::Frame, sparkles: &Sparkles, now: Instant, area: Rect) {
    let Some(started) = sparkles.started else {
        return;
    };
    if !sparkles.active(now) || area.width < 3 || area.height < 3 {
        return;
    }
    let tick = now.saturating_duration_since(started).as_millis() as u64 / 120;
    let count = (sparkles.particles / 3).max(1);
    let glyphs = ["*", "+", "♥", "·"];
    let colors = [Color::LightMagenta, Color::Yellow, Color::LightRed, Color::Cyan];

    let buf = frame.buffer_mut();
    for (i, (x, y)) in sparkle_cells(tick, count, area).into_iter().enumerate() {
        let k = (i + tick as usize) % glyphs.len();
        buf.set_string(x, y, glyphs[k], Style::default().fg(colors[k]));
    }
}

/// Sparkle positions inside `area`'s border. Reseeded per tick so sparkles
/// hold still between redraws.
pub(super) fn sparkle_cells(tick: u64, count: u32, area: Rect) -> Vec<(u16, u16)> {
    if area.width < 3 || area.height < 3 {
        return Vec::new();
    }
    let mut rng = SmallRng::seed_from_u64(tick);
    (0..count)
        .map(|_| {
            let x = area.x + 1 + rng.random_range(0..area.width - 2);
            let y = area.y + 1 + rng.random_range(0..area.height - 2);
            (x, y)
        })
        .collect()
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let hints = match app.flow.mode() {
        FlowMode::Loading => "q quit",
        FlowMode::Create(CreateStage::Form) => "Tab switch field  Enter create link  Esc quit",
        FlowMode::Create(CreateStage::Generated { .. }) => "c copy link  n create another  q quit",
        FlowMode::Intro { .. } => "Enter continue  Esc quit",
        FlowMode::Proposal(_) => "←/→ choose  Enter answer  y yes  n no  q quit",
        FlowMode::Accepted(_) => "s send your answer  q quit",
    };

    let mut lines = vec![Line::from(Span::styled(
        hints,
        Style::default().fg(Color::Gray),
    ))];
    if let Some(notice) = &app.notice {
        let style = if notice.error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", fmt_notice_ts(notice.ts)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(notice.text.as_str(), style),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
        area,
    );
}
