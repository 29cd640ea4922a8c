//! Trend command - chart one metric for one pose.

use anyhow::Result;
use clap::Args;
use drishti_api::{TrendQuery, filter_poses};
use drishti_core::{Metric, Pose, TrendSide, TrendWindow};
use tracing::{debug, info};

use super::emit;
use crate::Cli;
use crate::context::Context;
use crate::output::{TextFormatter, TrendOutput};

/// Candidates listed when a pose name is ambiguous.
const MAX_CANDIDATES: usize = 5;

/// Arguments for the trend command.
#[derive(Args)]
pub struct TrendArgs {
    /// Pose ID, slug, or a unique part of its name.
    pub pose: String,

    /// Metric: overall, ease, comfort, stability, pain, breath, focus.
    #[arg(long, short, default_value = "overall")]
    pub metric: Metric,

    /// Days to look back (7, 30d, ...) or "all". Defaults to the configured window.
    #[arg(long, short)]
    pub window: Option<TrendWindow>,

    /// Side for two-sided poses: both, left, or right.
    #[arg(long, default_value = "both")]
    pub side: TrendSide,

    /// Count score cards marked skipped.
    #[arg(long)]
    pub include_skipped: bool,
}

/// Runs the trend command.
pub async fn run(args: &TrendArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    ctx.require_signed_in()?;

    let catalog = ctx.api.poses.list(&[]).await?;
    let pose = resolve_pose(&catalog, &args.pose)?;
    debug!(pose = %pose.slug, two_sided = pose.is_two_sided, "Resolved pose");

    let query = TrendQuery {
        metric: args.metric,
        window: args.window.unwrap_or(ctx.settings.default_trend_window),
        include_skipped: args.include_skipped,
    };
    let trend = ctx.api.trends.pose_series(pose, query, args.side).await?;
    info!(
        points = trend.response.points.len(),
        days = trend.series.len(),
        "Trend computed"
    );

    let output = TrendOutput::new(pose, query.metric, query.window, args.side, &trend);
    emit(cli, &output, || {
        TextFormatter::new(!cli.no_color).format_trend(
            pose,
            query.metric,
            query.window,
            args.side,
            &trend,
        )
    })
}

/// Finds a pose by exact ID or slug, then by unique search match.
fn resolve_pose<'a>(catalog: &'a [Pose], needle: &str) -> Result<&'a Pose> {
    let needle = needle.trim();
    if let Some(pose) = catalog
        .iter()
        .find(|p| p.id == needle || p.slug.eq_ignore_ascii_case(needle))
    {
        return Ok(pose);
    }

    match filter_poses(catalog, needle).as_slice() {
        [] => anyhow::bail!("No pose matches {needle:?}. Try `drishti poses --all --search ...`"),
        [pose] => Ok(*pose),
        many => {
            let names: Vec<&str> = many
                .iter()
                .take(MAX_CANDIDATES)
                .map(|p| p.slug.as_str())
                .collect();
            anyhow::bail!(
                "{} poses match {needle:?}: {}{}",
                many.len(),
                names.join(", "),
                if many.len() > MAX_CANDIDATES { ", ..." } else { "" }
            )
        }
    }
}
