use valentine::escalation::EscalationState;
use valentine::flow::{FlowController, FlowMode, Proposal};
use valentine::link;
use valentine::model::SenderIdentity;
use valentine::notify::RecordedEffects;

use super::*;

type Flow = FlowController<RecordedEffects>;

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

pub(super) async fn fallback() -> Response {
    not_found()
}

/// Page load: the query string alone decides which screen comes up.
pub(super) async fn load_page(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let url = format!("?{}", query.unwrap_or_default());
    let flow = Flow::start(state.settings.clone(), RecordedEffects::default(), &url);
    tracing::debug!(mode = %flow.kind(), "page load");
    Html(pages::render(&state, &flow, None))
}

pub(super) async fn create_link(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateForm>,
) -> Html<String> {
    let mut flow = Flow::start(state.settings.clone(), RecordedEffects::default(), "");
    let notice = match flow.submit_sender(&form.name, &form.phone) {
        Ok(link) => {
            tracing::info!(link = %link, "share link created");
            None
        }
        Err(err) => Some(format!("{:#}", err)),
    };
    Html(pages::render(&state, &flow, notice.as_deref()))
}

pub(super) async fn submit_intro(
    State(state): State<Arc<AppState>>,
    Form(form): Form<IntroForm>,
) -> Html<String> {
    let mut flow = reload(&state, &form.sender, &form.phone, None);
    let mut notice = None;
    if let FlowMode::Intro { .. } = flow.mode() {
        match flow.submit_recipient(&form.name) {
            Ok(true) => {}
            Ok(false) => notice = Some("Please tell us your name first."),
            Err(err) => tracing::warn!(error = %err, "intro submit rejected"),
        }
    }
    Html(pages::render(&state, &flow, notice))
}

pub(super) async fn respond(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RespondForm>,
) -> Result<Html<String>, Response> {
    let opened = reload(&state, &form.sender, &form.phone, Some(&form.name));
    let FlowMode::Proposal(proposal) = opened.mode() else {
        // Missing fields: show whatever screen the page data leads to.
        return Ok(Html(pages::render(&state, &opened, None)));
    };

    let proposal = Proposal {
        escalation: EscalationState::with_count(form.declines),
        ..proposal.clone()
    };
    let mut flow = Flow::resume_proposal(state.settings.clone(), RecordedEffects::default(), proposal);

    match form.answer.as_str() {
        "yes" => {
            flow.accept().map_err(bad_request)?;
        }
        "no" => {
            flow.decline().map_err(bad_request)?;
        }
        other => {
            return Err(bad_request(anyhow::anyhow!(
                "answer must be \"yes\" or \"no\", got {:?}",
                other
            )));
        }
    }
    Ok(Html(pages::render(&state, &flow, None)))
}

/// Rebuild the flow as if the page URL carried these fields.
fn reload(state: &AppState, sender: &str, phone: &str, name: Option<&str>) -> Flow {
    let identity = SenderIdentity {
        name: sender.to_string(),
        phone: phone.to_string(),
    };
    let url = match name {
        Some(name) => link::encode_for_recipient(&state.settings.base_url, &identity, name),
        None => link::encode(&state.settings.base_url, &identity),
    };
    Flow::start(state.settings.clone(), RecordedEffects::default(), url.as_str())
}
