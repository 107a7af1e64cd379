//! Cartographer binary: serves rendered maps over HTTP, or renders one
//! phase from local files.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::info;

use cartographer::board::{OrderAnnotation, Phase, Variant};
use cartographer::compose;
use cartographer::config::{Cli, Command, RenderArgs, ServeArgs};
use cartographer::server::{self, AppState};
use cartographer::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve(args) => run_serve(args).await,
        Command::Render(args) => run_render(&args),
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let client = UpstreamClient::new(args.upstream()).context("building upstream client")?;
    let state = AppState {
        client,
        rasterizer: args.rasterizer(),
    };
    server::serve(args.bind, state)
        .await
        .with_context(|| format!("serving on {}", args.bind))
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let variant: Variant = read_json(&args.variant)?;
    let phase: Phase = read_json(&args.phase)?;
    let orders: Option<Vec<OrderAnnotation>> = args.orders.as_deref().map(read_json::<Vec<OrderAnnotation>>).transpose()?;
    let map = read_text(&args.map)?;
    let army = read_text(&args.army)?;
    let fleet = read_text(&args.fleet)?;

    let svg = compose(&map, &army, &fleet, &variant, &phase, orders.as_deref())
        .with_context(|| format!("rendering {} phase {}", variant.name, phase.ordinal))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &svg).with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), bytes = svg.len(), "render.written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
