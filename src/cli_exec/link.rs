use anyhow::{Context, Result};

use valentine::config::{AppConfig, parse_http_url};
use valentine::flow::{FlowController, select_mode};
use valentine::link;
use valentine::model::SenderIdentity;
use valentine::notify::RecordedEffects;

use super::print_json;
use crate::cli_commands::link::LinkArgs;

pub(super) fn handle_link_command(config: &AppConfig, args: LinkArgs) -> Result<()> {
    let mut settings = config.flow_settings()?;
    if let Some(base) = &args.base_url {
        settings.base_url = parse_http_url(base).context("--base-url")?;
    }

    let share = match args.to.as_deref() {
        Some(recipient) if !recipient.trim().is_empty() => {
            let identity = SenderIdentity::new(&args.name, &args.phone)?;
            link::encode_for_recipient(&settings.base_url, &identity, recipient.trim())
        }
        _ => {
            let mut flow = FlowController::start(settings, RecordedEffects::default(), "");
            flow.submit_sender(&args.name, &args.phone)?
        }
    };
    tracing::debug!(link = %share, "generated share link");

    if args.json {
        print_json(
            &serde_json::json!({
                "link": share,
                "sender": args.name.trim(),
                "phone": args.phone.trim(),
                "recipient": args.to,
            }),
            "link",
        )?;
    } else {
        println!("{}", share);
    }
    Ok(())
}

pub(super) fn handle_inspect_command(url: String, json: bool) -> Result<()> {
    let params = link::decode(&url);
    let mode = select_mode(&params).kind();

    if json {
        return print_json(
            &serde_json::json!({
                "mode": mode,
                "params": params,
                "context": params.recipient_context(),
            }),
            "inspect",
        );
    }

    println!("mode: {}", mode);
    println!("sender: {}", params.sender.as_deref().unwrap_or("(none)"));
    println!("phone: {}", params.phone.as_deref().unwrap_or("(none)"));
    println!("name: {}", params.name.as_deref().unwrap_or("(none)"));
    Ok(())
}
