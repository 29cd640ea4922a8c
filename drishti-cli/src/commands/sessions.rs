//! Sessions command - list, inspect, create, publish, and delete sessions.

use std::collections::HashSet;

use anyhow::Result;
use clap::{Args, Subcommand};
use drishti_api::PublishError;
use drishti_core::{
    CustomSessionRequest, Paginated, PracticeType, PresetSessionRequest, SequenceGroup,
    SequenceSnippet, SessionDetail,
};
use futures::future::try_join_all;
use serde_json::json;
use tracing::{debug, info, warn};

use super::emit;
use crate::context::Context;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the sessions command.
#[derive(Args)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub action: SessionsAction,
}

/// Sessions subcommands.
#[derive(Subcommand)]
pub enum SessionsAction {
    /// List sessions, newest first.
    List {
        /// Sessions per page (defaults to the configured page size).
        #[arg(long, short)]
        limit: Option<u32>,

        /// Cursor from a previous page.
        #[arg(long)]
        cursor: Option<String>,

        /// Follow cursors until the last page.
        #[arg(long)]
        all: bool,
    },

    /// Show a session and its score cards.
    Show {
        /// Session ID.
        id: String,

        /// Fetch every score card in full.
        #[arg(long)]
        cards: bool,
    },

    /// Create a session from a preset series.
    CreatePreset {
        /// half-primary, full-primary, intermediate, advanced-a, advanced-b.
        #[arg(value_parser = parse_preset)]
        practice_type: PracticeType,

        /// Session label.
        #[arg(long)]
        label: Option<String>,

        /// Duration in minutes.
        #[arg(long, short)]
        duration: Option<u32>,
    },

    /// Create a session from sequence snippets.
    CreateCustom {
        /// GROUP:SLUG, e.g. primary:navasana. Repeat in practice order.
        #[arg(long = "snippet", short, value_parser = parse_snippet, required = true)]
        snippets: Vec<SequenceSnippet>,

        /// Session label.
        #[arg(long)]
        label: Option<String>,

        /// Duration in minutes.
        #[arg(long, short)]
        duration: Option<u32>,
    },

    /// Publish a draft session.
    Publish {
        /// Session ID.
        id: String,
    },

    /// Delete a session.
    Delete {
        /// Session ID.
        id: String,
    },
}

/// Runs the sessions command.
pub async fn run(args: &SessionsArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    ctx.require_signed_in()?;

    match &args.action {
        SessionsAction::List { limit, cursor, all } => {
            let limit = limit.unwrap_or(ctx.settings.default_page_size).max(1);
            list(ctx, cli, limit, cursor.as_deref(), *all).await
        }
        SessionsAction::Show { id, cards } => show(ctx, cli, id, *cards).await,
        SessionsAction::CreatePreset {
            practice_type,
            label,
            duration,
        } => {
            let request = PresetSessionRequest {
                practice_type: *practice_type,
                label: label.clone().filter(|l| !l.trim().is_empty()),
                duration: *duration,
            };
            let session = ctx.api.sessions.create_preset(&request).await?;
            print_created(cli, &session)
        }
        SessionsAction::CreateCustom {
            snippets,
            label,
            duration,
        } => {
            let request = CustomSessionRequest::new(label.clone(), *duration, snippets.clone());
            let session = ctx.api.sessions.create_custom(&request).await?;
            print_created(cli, &session)
        }
        SessionsAction::Publish { id } => publish(ctx, cli, id).await,
        SessionsAction::Delete { id } => {
            ctx.api.sessions.delete(id).await?;
            emit(cli, &json!({ "deleted": id }), || format!("Deleted session {id}"))
        }
    }
}

async fn list(
    ctx: &Context,
    cli: &Cli,
    limit: u32,
    cursor: Option<&str>,
    all: bool,
) -> Result<()> {
    let mut page = ctx.api.sessions.list(limit, cursor).await?;

    if all {
        let mut items = std::mem::take(&mut page.items);
        let mut seen: HashSet<String> = cursor.map(str::to_string).into_iter().collect();
        while let Some(next) = next_cursor(&mut page, &mut seen) {
            debug!(cursor = %next, "Fetching next page");
            page = ctx.api.sessions.list(limit, Some(&next)).await?;
            items.append(&mut page.items);
        }
        page = Paginated {
            items,
            next_cursor: None,
        };
    }

    info!(count = page.items.len(), "Listed sessions");
    emit(cli, &page, || TextFormatter::new(!cli.no_color).format_sessions(&page))
}

/// Cursor for the following page. A cursor already followed ends the walk.
fn next_cursor<T>(page: &mut Paginated<T>, seen: &mut HashSet<String>) -> Option<String> {
    let next = page.next_cursor.take().filter(|c| !c.is_empty())?;
    if !seen.insert(next.clone()) {
        warn!(cursor = %next, "Backend repeated a cursor, stopping");
        return None;
    }
    Some(next)
}

async fn show(ctx: &Context, cli: &Cli, id: &str, cards: bool) -> Result<()> {
    let session = ctx.api.sessions.get(id).await?;

    if !cards {
        return emit(cli, &session, || {
            TextFormatter::new(!cli.no_color).format_session_detail(&session)
        });
    }

    let full = try_join_all(
        session
            .score_cards
            .iter()
            .map(|card| ctx.api.score_cards.get(&card.id)),
    )
    .await?;

    emit(cli, &json!({ "session": session, "scoreCards": full }), || {
        let formatter = TextFormatter::new(!cli.no_color);
        let mut blocks = vec![formatter.format_session_detail(&session)];
        blocks.extend(full.iter().map(|card| formatter.format_score_card(card)));
        blocks.join("\n\n")
    })
}

async fn publish(ctx: &Context, cli: &Cli, id: &str) -> Result<()> {
    match ctx.api.sessions.publish(id).await {
        Ok(session) => emit(cli, &session, || format!("Published session {}", session.id)),
        Err(PublishError::Conflict(conflict)) => {
            if cli.format == OutputFormat::Json {
                let body = json!({ "published": false, "conflict": conflict });
                println!("{}", JsonFormatter::new(cli.pretty).format(&body)?);
            }
            anyhow::bail!(
                "{}\nFix it with: drishti card update {}",
                conflict.describe(),
                conflict.score_card_id
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn print_created(cli: &Cli, session: &SessionDetail) -> Result<()> {
    emit(cli, session, || {
        format!(
            "Created session {} with {} score cards\n\n{}",
            session.id,
            session.score_cards.len(),
            TextFormatter::new(!cli.no_color).format_session_detail(session)
        )
    })
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_preset(s: &str) -> Result<PracticeType, String> {
    match s.parse::<PracticeType>()? {
        PracticeType::Custom => Err("use `sessions create-custom` for custom sessions".to_string()),
        preset => Ok(preset),
    }
}

fn parse_snippet(s: &str) -> Result<SequenceSnippet, String> {
    let (group, slug) = s
        .split_once(':')
        .ok_or_else(|| format!("expected GROUP:SLUG, got {s}"))?;
    let group = group.parse::<SequenceGroup>()?;
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(format!("missing pose slug in {s}"));
    }
    Ok(SequenceSnippet {
        group,
        up_to_slug: slug.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
