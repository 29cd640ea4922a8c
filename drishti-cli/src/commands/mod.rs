//! CLI command implementations.

pub mod account;
pub mod auth;
pub mod card;
pub mod config;
pub mod poses;
pub mod sessions;
pub mod trend;

use anyhow::Result;
use serde::Serialize;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Prints `text()` or the JSON form of `data`, per `--format`.
pub(crate) fn emit<T, F>(cli: &Cli, data: &T, text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match cli.format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(data)?),
    }
    Ok(())
}
