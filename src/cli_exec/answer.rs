use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use valentine::config::AppConfig;
use valentine::escalation::{affirmative_size, phrase_for};
use valentine::flow::{FlowController, FlowMode};
use valentine::notify::{RecordedEffects, SystemOpener};

use super::print_json;
use crate::cli_commands::answer::ShareArgs;

pub(super) fn handle_phrases_command(upto: u64, json: bool) -> Result<()> {
    let rows: Vec<_> = (0..=upto)
        .map(|n| (n, phrase_for(n), affirmative_size(n)))
        .collect();

    if json {
        let rows: Vec<_> = rows
            .iter()
            .map(|(n, label, size)| {
                serde_json::json!({"declines": n, "no_label": label, "yes_size": size})
            })
            .collect();
        return print_json(&rows, "phrases");
    }

    for (n, label, size) in rows {
        println!("{:>4} {:>6}px  {}", n, size, label);
    }
    Ok(())
}

pub(super) fn handle_share_command(config: &AppConfig, args: ShareArgs) -> Result<()> {
    let settings = config.flow_settings()?;
    let mut flow = FlowController::start(settings, RecordedEffects::default(), &args.link);

    if let FlowMode::Intro { .. } = flow.mode() {
        let recipient = args
            .recipient
            .as_deref()
            .context("this link does not name you; pass --recipient")?;
        if !flow.submit_recipient(recipient)? {
            anyhow::bail!("--recipient must not be blank");
        }
    }
    if let (FlowMode::Proposal(proposal), Some(recipient)) = (flow.mode(), args.recipient.as_deref()) {
        if recipient.trim() != proposal.recipient_name {
            anyhow::bail!(
                "link is addressed to {:?}; --recipient {:?} does not match",
                proposal.recipient_name,
                recipient.trim()
            );
        }
    }
    if let FlowMode::Create(_) = flow.mode() {
        anyhow::bail!("link does not carry a sender name and phone");
    }

    let share = flow
        .accept()?
        .context("proposal was already answered")?;
    let accepted_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")?;

    if args.open {
        flow.open_share(&mut SystemOpener);
    }

    if args.json {
        return print_json(
            &serde_json::json!({
                "accepted_at": accepted_at,
                "share": share,
            }),
            "share",
        );
    }

    println!("{}", share.url);
    println!("message: {}", share.message);
    Ok(())
}
