//! HTML for each flow mode. Every interpolated value goes through
//! [`html_escape`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use valentine::escalation::EscalationState;
use valentine::flow::{Acceptance, CreateStage, FlowController, FlowMode, Proposal};
use valentine::link::ShareLink;
use valentine::model::SenderIdentity;
use valentine::notify::{Celebration, RecordedEffects};

use super::AppState;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #fff0f5; color: #333; margin: 0; }
.valentine-container { display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; padding: 1rem; text-align: center; }
.button-container { display: flex; align-items: center; gap: 1rem; flex-wrap: wrap; justify-content: center; }
.yes-button { background: #4caf50; color: #fff; border: none; border-radius: 8px; padding: 0.4em 0.8em; cursor: pointer; }
.no-button { background: #f44336; color: #fff; border: none; border-radius: 8px; padding: 8px 16px; font-size: 16px; cursor: pointer; }
.notice { color: #b00020; }
input { font-size: 16px; padding: 6px; margin: 4px; }
.share-link { width: min(90vw, 36rem); }
.confetti { position: fixed; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none; overflow: hidden; }
.confetti span { position: absolute; width: 8px; height: 14px; opacity: 0; animation: burst 2.4s ease-out forwards; }
@keyframes burst { 0% { opacity: 1; transform: translate(0, 0) rotate(0deg); } 100% { opacity: 0; transform: translate(var(--dx), var(--dy)) rotate(540deg); } }
"#;

pub(super) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub(super) fn render(
    state: &AppState,
    flow: &FlowController<RecordedEffects>,
    notice: Option<&str>,
) -> String {
    let body = match flow.mode() {
        FlowMode::Loading => "<p>Loading...</p>".to_string(),
        FlowMode::Create(CreateStage::Form) => creator_form(),
        FlowMode::Create(CreateStage::Generated { identity, link }) => {
            generated_link(identity, link, state.config.copy_ack_ms)
        }
        FlowMode::Intro { sender } => intro_form(sender),
        FlowMode::Proposal(proposal) => proposal_page(&state.config.question, proposal),
        FlowMode::Accepted(acceptance) => {
            accepted_page(acceptance, &flow.effects().celebrations)
        }
    };
    let notice = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, html_escape(n)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Valentine</title>
<style>{style}</style>
</head>
<body data-mode="{mode}">
<div class="valentine-container">
{notice}
{body}
</div>
</body>
</html>
"#,
        style = STYLE,
        mode = flow.kind(),
        notice = notice,
        body = body,
    )
}

fn creator_form() -> String {
    r#"<h1>Ask your special someone</h1>
<form method="post" action="/create">
<div><input name="name" placeholder="Your name" required></div>
<div><input name="phone" type="tel" placeholder="Your phone number" required></div>
<button type="submit" class="yes-button">Create my link</button>
</form>"#
        .to_string()
}

fn generated_link(identity: &SenderIdentity, link: &ShareLink, copy_ack_ms: u64) -> String {
    format!(
        r#"<h1>Your link is ready, {name}!</h1>
<p>Send it to your special someone.</p>
<input id="share-link" class="share-link" readonly value="{link}">
<div class="button-container">
<button type="button" class="yes-button" id="copy-button" onclick="copyLink(this)">Copy link</button>
<a href="/">Create another</a>
</div>
<script>
function copyLink(btn) {{
  var text = document.getElementById('share-link').value;
  var done = function () {{
    btn.textContent = 'Copied!';
    setTimeout(function () {{ btn.textContent = 'Copy link'; }}, {ack});
  }};
  try {{
    navigator.clipboard.writeText(text).then(done, function () {{}});
  }} catch (e) {{}}
}}
</script>"#,
        name = html_escape(&identity.name),
        link = html_escape(link.as_str()),
        ack = copy_ack_ms,
    )
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        html_escape(value)
    )
}

fn intro_form(sender: &SenderIdentity) -> String {
    format!(
        r#"<h1>{name} has a question for you</h1>
<form method="post" action="/intro">
{h_sender}
{h_phone}
<div><input name="name" placeholder="Your name" required autofocus></div>
<button type="submit" class="yes-button">Continue</button>
</form>"#,
        name = html_escape(&sender.name),
        h_sender = hidden("sender", &sender.name),
        h_phone = hidden("phone", &sender.phone),
    )
}

fn proposal_page(question: &str, proposal: &Proposal) -> String {
    let escalation: &EscalationState = &proposal.escalation;
    format!(
        r#"<p>Hi {recipient}!</p>
<h1 class="text-container">{question}</h1>
<form method="post" action="/respond" class="button-container">
{h_sender}
{h_phone}
{h_name}
{h_declines}
<button type="submit" name="answer" value="yes" class="yes-button" style="font-size: {size}px">Yes</button>
<button type="submit" name="answer" value="no" class="no-button">{label}</button>
</form>"#,
        recipient = html_escape(&proposal.recipient_name),
        question = html_escape(question),
        h_sender = hidden("sender", &proposal.sender.name),
        h_phone = hidden("phone", &proposal.sender.phone),
        h_name = hidden("name", &proposal.recipient_name),
        h_declines = hidden("declines", &escalation.decline_count().to_string()),
        size = escalation.affirmative_size(),
        label = html_escape(escalation.label()),
    )
}

fn accepted_page(acceptance: &Acceptance, celebrations: &[Celebration]) -> String {
    let confetti: String = celebrations.iter().map(confetti_burst).collect();
    format!(
        r#"{confetti}
<div class="yes-container">
<h1 class="text-container">Yay!!! 💖</h1>
<p>{sender} is going to be so happy, {recipient}.</p>
<a class="yes-button" id="share-action" href="{href}" target="_blank" rel="noopener noreferrer">Send my answer</a>
</div>"#,
        confetti = confetti,
        sender = html_escape(&acceptance.sender.name),
        recipient = html_escape(&acceptance.recipient_name),
        href = html_escape(acceptance.share.url.as_str()),
    )
}

/// CSS-only burst: particles fan out from the origin within `spread` degrees
/// either side of straight up.
fn confetti_burst(c: &Celebration) -> String {
    const COLORS: [&str; 5] = ["#ff4d6d", "#ffb3c1", "#ffd166", "#06d6a0", "#118ab2"];
    let count = c.particle_count.min(400);
    let top = (c.origin_y.clamp(0.0, 1.0) * 100.0).round();
    let spread = c.spread.min(180) as f32;

    // Fixed seed: the same config renders the same page.
    let mut rng = SmallRng::seed_from_u64(u64::from(count) ^ u64::from(c.spread) << 32);

    let mut out = String::from(r#"<div class="confetti" aria-hidden="true">"#);
    for i in 0..count {
        let angle = (rng.random::<f32>() - 0.5) * spread.to_radians();
        let dist = rng.random_range(20.0..65.0_f32);
        let dx = angle.sin() * dist;
        let dy = -angle.cos() * dist + rng.random_range(0.0..30.0_f32);
        let delay: u32 = rng.random_range(0..300);
        out.push_str(&format!(
            r#"<span style="left: 50vw; top: {top}vh; background: {color}; --dx: {dx:.1}vw; --dy: {dy:.1}vh; animation-delay: {delay}ms"></span>"#,
            top = top,
            color = COLORS[i as usize % COLORS.len()],
            dx = dx,
            dy = dy,
            delay = delay,
        ));
    }
    out.push_str("</div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn burst_renders_one_span_per_particle() {
        let html = confetti_burst(&Celebration {
            particle_count: 25,
            ..Celebration::default()
        });
        assert_eq!(html.matches("<span").count(), 25);
        assert!(html.contains("top: 60vh"));
    }

    #[test]
    fn burst_is_stable_for_the_same_config() {
        let c = Celebration::default();
        assert_eq!(confetti_burst(&c), confetti_burst(&c));
        assert_eq!(confetti_burst(&c).matches("<span").count(), 150);
    }
}
