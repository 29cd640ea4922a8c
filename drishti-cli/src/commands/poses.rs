//! Poses command - browse and search the pose catalog.

use anyhow::Result;
use clap::Args;
use drishti_api::filter_poses;
use drishti_core::SequenceGroup;
use tracing::info;

use super::emit;
use crate::Cli;
use crate::context::Context;
use crate::output::TextFormatter;

/// Arguments for the poses command.
#[derive(Args)]
pub struct PosesArgs {
    /// Sequence group to list (repeatable). Defaults to the picker groups.
    #[arg(long, short)]
    pub group: Vec<SequenceGroup>,

    /// Whole catalog, every group.
    #[arg(long, conflicts_with = "group")]
    pub all: bool,

    /// Case-insensitive search over slug, names, and group.
    #[arg(long, short)]
    pub search: Option<String>,
}

/// Runs the poses command.
pub async fn run(args: &PosesArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    let catalog = if args.all {
        ctx.api.poses.list(&[]).await?
    } else if args.group.is_empty() {
        ctx.api.poses.picker().await?
    } else {
        ctx.api.poses.list(&args.group).await?
    };

    let matches = filter_poses(&catalog, args.search.as_deref().unwrap_or_default());
    info!(total = catalog.len(), shown = matches.len(), "Listed poses");

    emit(cli, &matches, || TextFormatter::new(!cli.no_color).format_poses(&matches))
}
