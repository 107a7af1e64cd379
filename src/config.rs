//! Command-line configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::server::raster::{CommandRasterizer, Rasterizer, SvgPassthrough};
use crate::upstream::UpstreamConfig;

/// Renders Diplomacy phases as annotated SVG maps
#[derive(Parser, Debug)]
#[command(name = "cartographer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve rendered maps over HTTP
    Serve(ServeArgs),

    /// Render one phase from local files
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "CARTOGRAPHER_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Base URL of the Diplicity API
    #[arg(long, env = "DIPLICITY_API_BASE_URL", default_value = "https://diplicity-engine.appspot.com")]
    pub api_base_url: String,

    /// Base URL for variant SVG assets (default: the API itself)
    #[arg(long, env = "DIPLICITY_ASSET_BASE_URL")]
    pub variant_asset_base: Option<String>,

    /// Bearer token for the API
    #[arg(long, env = "DIPLICITY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Command that reads SVG on stdin and writes a bitmap to stdout,
    /// e.g. "rsvg-convert -f png" (default: reply with SVG)
    #[arg(long, env = "CARTOGRAPHER_RASTERIZER")]
    pub rasterizer_cmd: Option<String>,

    /// Content type of the rasterizer's output
    #[arg(long, default_value = "image/png")]
    pub raster_content_type: String,
}

impl ServeArgs {
    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.api_base_url.clone(),
            asset_base_url: self.variant_asset_base.clone(),
            token: self.token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// The configured rasterizer, or SVG passthrough when no command is set.
    pub fn rasterizer(&self) -> Arc<dyn Rasterizer> {
        match self
            .rasterizer_cmd
            .as_deref()
            .and_then(|cmd| CommandRasterizer::from_command_line(cmd, self.raster_content_type.clone()))
        {
            Some(command) => Arc::new(command),
            None => Arc::new(SvgPassthrough),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Variant definition (JSON)
    #[arg(long)]
    pub variant: PathBuf,

    /// Phase state (JSON)
    #[arg(long)]
    pub phase: PathBuf,

    /// Map template
    #[arg(long)]
    pub map: PathBuf,

    /// Army icon template
    #[arg(long)]
    pub army: PathBuf,

    /// Fleet icon template
    #[arg(long)]
    pub fleet: PathBuf,

    /// Orders to overlay (JSON list)
    #[arg(long)]
    pub orders: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::raster::SVG_CONTENT_TYPE;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["cartographer", "serve", "--api-base-url", "http://localhost:8080"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.api_base_url, "http://localhost:8080");
        assert_eq!(args.timeout_secs, 30);

        let upstream = args.upstream();
        assert_eq!(upstream.base_url, "http://localhost:8080");
        assert_eq!(upstream.timeout_secs, 30);
    }

    #[test]
    fn serve_rasterizer_selection() {
        let cli = Cli::try_parse_from([
            "cartographer",
            "serve",
            "--rasterizer-cmd",
            "rsvg-convert -f png",
            "--raster-content-type",
            "image/png",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.rasterizer().content_type(), "image/png");

        let plain = ServeArgs {
            rasterizer_cmd: None,
            ..args
        };
        assert_eq!(plain.rasterizer().content_type(), SVG_CONTENT_TYPE);
    }

    #[test]
    fn render_requires_inputs() {
        assert!(Cli::try_parse_from(["cartographer", "render", "--variant", "v.json"]).is_err());

        let cli = Cli::try_parse_from([
            "cartographer",
            "render",
            "--variant",
            "v.json",
            "--phase",
            "p.json",
            "--map",
            "map.svg",
            "--army",
            "army.svg",
            "--fleet",
            "fleet.svg",
            "-o",
            "out.svg",
        ])
        .unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.output, Some(PathBuf::from("out.svg")));
        assert!(args.orders.is_none());
    }
}
