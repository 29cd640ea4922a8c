//! Card command - show and update score cards.

use anyhow::Result;
use clap::{Args, Subcommand};
use drishti_core::{Metric, ScoreCardUpdate, Side};
use serde_json::json;
use tracing::debug;

use super::emit;
use crate::Cli;
use crate::context::Context;
use crate::output::TextFormatter;

/// Arguments for the card command.
#[derive(Args)]
pub struct CardArgs {
    #[command(subcommand)]
    pub action: CardAction,
}

/// Card subcommands.
#[derive(Subcommand)]
pub enum CardAction {
    /// Show a score card.
    Show {
        /// Score card ID.
        id: String,
    },

    /// Update fields on a score card. Unmentioned fields are left alone.
    /// Cards of published sessions are read-only.
    Update(UpdateArgs),
}

/// Arguments for `card update`.
#[derive(Args)]
pub struct UpdateArgs {
    /// Score card ID.
    pub id: String,

    /// METRIC=VALUE with VALUE from 1 to 10, e.g. ease=7. Repeatable.
    #[arg(long = "set", value_parser = parse_assignment)]
    pub set: Vec<(Metric, u8)>,

    /// Clear a metric. Repeatable.
    #[arg(long = "clear", value_parser = parse_metric)]
    pub clear: Vec<Metric>,

    /// Notes text; an empty string clears the notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// Mark the pose skipped (true) or practiced (false).
    #[arg(long)]
    pub skipped: Option<bool>,

    /// Side: left, right, or na.
    #[arg(long, value_parser = parse_side)]
    pub side: Option<Side>,
}

/// Runs the card command.
pub async fn run(args: &CardArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    ctx.require_signed_in()?;

    match &args.action {
        CardAction::Show { id } => show(ctx, cli, id).await,
        CardAction::Update(update) => update_card(ctx, cli, update).await,
    }
}

async fn show(ctx: &Context, cli: &Cli, id: &str) -> Result<()> {
    let card = ctx.api.score_cards.get(id).await?;

    let (prev, next) = match card.session_id.as_deref() {
        Some(session_id) => {
            let session = ctx.api.sessions.get(session_id).await?;
            let (prev, next) = session.neighbours(&card.id);
            (prev.map(str::to_string), next.map(str::to_string))
        }
        None => (None, None),
    };

    emit(
        cli,
        &json!({ "scoreCard": card, "previous": prev, "next": next }),
        || {
            let formatter = TextFormatter::new(!cli.no_color);
            let mut out = formatter.format_score_card(&card);
            for (label, id) in [("Prev", &prev), ("Next", &next)] {
                if let Some(id) = id {
                    out.push_str(&format!("\n{label}:       {}", formatter.dim(id)));
                }
            }
            out
        },
    )
}

async fn update_card(ctx: &Context, cli: &Cli, args: &UpdateArgs) -> Result<()> {
    let update = build_update(args)?;
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Use --set, --clear, --notes, --skipped, or --side");
    }
    debug!(id = %args.id, ?update, "Updating score card");

    let card = ctx.api.edit_score_card(&args.id, &update).await?;
    emit(cli, &card, || TextFormatter::new(!cli.no_color).format_score_card(&card))
}

/// Folds the flags into a partial update.
fn build_update(args: &UpdateArgs) -> Result<ScoreCardUpdate> {
    let mut update = ScoreCardUpdate::default();
    for (metric, value) in &args.set {
        update = update.with_metric(*metric, Some(*value))?;
    }
    for metric in &args.clear {
        update = update.with_metric(*metric, None)?;
    }
    if let Some(notes) = args.notes.as_deref() {
        update = update.with_notes(notes);
    }
    update.skipped = args.skipped;
    if let Some(side) = args.side {
        update.side = Some(Some(side));
    }
    Ok(update)
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_metric(s: &str) -> Result<Metric, String> {
    s.parse()
}

fn parse_assignment(s: &str) -> Result<(Metric, u8), String> {
    let (metric, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected METRIC=VALUE, got {s}"))?;
    let metric = parse_metric(metric)?;
    let value = value
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("{} must be a whole number, got {value}", metric.as_str()))?;
    Ok((metric, value))
}

fn parse_side(s: &str) -> Result<Side, String> {
    Side::parse(s).ok_or_else(|| format!("unknown side: {s} (expected left, right, or na)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use drishti_core::ValidationError;

    fn args() -> UpdateArgs {
        UpdateArgs {
            id: "c1".to_string(),
            set: vec![],
            clear: vec![],
            notes: None,
            skipped: None,
            side: None,
        }
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("ease=7").unwrap(), (Metric::Ease, 7));
        assert_eq!(parse_assignment("Stability= 3").unwrap(), (Metric::Stability, 3));
        assert!(parse_assignment("ease").is_err());
        assert!(parse_assignment("ease=seven").is_err());
        assert!(parse_assignment("mood=4").is_err());
    }

    #[test]
    fn test_empty_update() {
        assert!(build_update(&args()).unwrap().is_empty());
    }

    #[test]
    fn test_update_is_partial() {
        let mut a = args();
        a.set = vec![(Metric::Ease, 7)];
        a.clear = vec![Metric::Pain];
        a.notes = Some(String::new());

        let update = build_update(&a).unwrap();
        assert_eq!(update.ease, Some(Some(7)));
        assert_eq!(update.pain, Some(None));
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.comfort, None);
        assert_eq!(update.skipped, None);
    }

    #[test]
    fn test_overall_score_not_settable() {
        let mut a = args();
        a.set = vec![(Metric::OverallScore, 5)];
        let err = build_update(&a).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_side_flag() {
        assert_eq!(parse_side("left").unwrap(), Side::Left);
        assert!(parse_side("middle").is_err());

        let mut a = args();
        a.side = Some(Side::Right);
        assert_eq!(build_update(&a).unwrap().side, Some(Some(Side::Right)));
    }
}
