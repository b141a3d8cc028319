//! # Hero Studio CLI
//!
//! Command-line interface for hero visual export and the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! hero-studio serve --listen 0.0.0.0:8080
//!
//! # Export a hero visual to PNG
//! hero-studio export --background bg.png --logo logo.png --title "Ship Faster" -o hero.png
//!
//! # Print the layout descriptor as JSON
//! hero-studio layout --title "Ship Faster" --logo-size 400x100 --position top-right
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use hero_studio::{
    HeroError,
    assets::{ImageAcquirer, to_data_uri},
    brand,
    compose::export::{self, EXPORT_FILENAME, ExportRequest},
    generate::ProviderKeys,
    layout::{self, BlockFlow, CanvasSpec, LogoPosition, LogoSpec},
    server::{self, ServerConfig},
    typeface,
};

/// Hero Studio - brand-locked hero visual compositor
#[derive(Parser, Debug)]
#[command(name = "hero-studio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that draws text.
#[derive(clap::Args, Debug)]
struct FontArgs {
    /// Regular TrueType font (built-in bitmap face when omitted)
    #[arg(long, value_name = "FILE", env = "HERO_FONT")]
    font: Option<PathBuf>,

    /// Bold TrueType font for titles
    #[arg(long, value_name = "FILE", env = "HERO_BOLD_FONT")]
    bold_font: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080", env = "HERO_LISTEN")]
        listen: String,

        /// Origin for site-relative asset paths such as /logo/Logo-dark.png
        #[arg(long, env = "HERO_PUBLIC_BASE_URL")]
        public_base_url: Option<String>,

        /// Timeout for asset downloads, in seconds
        #[arg(long, default_value = "30")]
        fetch_timeout: u64,

        /// Edge of the live preview surface, in pixels
        #[arg(long, default_value_t = brand::PREVIEW_PX)]
        preview_px: u32,

        #[command(flatten)]
        fonts: FontArgs,

        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        openai_api_key: Option<String>,

        #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        anthropic_api_key: Option<String>,

        #[arg(long, env = "GOOGLE_AI_API_KEY", hide_env_values = true)]
        google_ai_api_key: Option<String>,
    },

    /// Render a hero visual to a PNG file
    Export {
        /// Background image: file path, URL or data URI
        #[arg(long)]
        background: Option<String>,

        /// Logo image: file path, URL or data URI
        #[arg(long)]
        logo: Option<String>,

        /// Logo corner (top-left, top-right, bottom-left, bottom-right)
        #[arg(long, default_value = "bottom-right")]
        position: String,

        /// Logo scale factor, clamped to 0.5-2.0
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Logo padding from the canvas edges, in pixels
        #[arg(long, default_value_t = brand::LOGO_PADDING_PX)]
        padding: f32,

        #[arg(long, default_value = "")]
        title: String,

        /// Description; "\n" starts a new line
        #[arg(long, default_value = "")]
        description: String,

        /// Output file
        #[arg(short, long, default_value = EXPORT_FILENAME)]
        output: PathBuf,

        /// Origin for site-relative asset paths
        #[arg(long)]
        public_base_url: Option<String>,

        #[command(flatten)]
        fonts: FontArgs,
    },

    /// Print the layout descriptor as JSON
    Layout {
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Natural logo size as WIDTHxHEIGHT
        #[arg(long, value_name = "WxH")]
        logo_size: Option<String>,

        #[arg(long, default_value = "bottom-right")]
        position: String,

        #[arg(long, default_value = "1.0")]
        scale: f32,

        #[arg(long, default_value_t = brand::LOGO_PADDING_PX)]
        padding: f32,

        /// Surface edge in pixels
        #[arg(long, default_value_t = brand::CANVAS_PX)]
        canvas_px: u32,

        /// Block flow (centered, fixed-top)
        #[arg(long)]
        block_flow: Option<String>,

        #[command(flatten)]
        fonts: FontArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), HeroError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            public_base_url,
            fetch_timeout,
            preview_px,
            fonts,
            openai_api_key,
            anthropic_api_key,
            google_ai_api_key,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                public_base_url,
                font_path: fonts.font,
                bold_font_path: fonts.bold_font,
                fetch_timeout_secs: fetch_timeout,
                preview_px,
                providers: ProviderKeys {
                    openai: openai_api_key,
                    anthropic: anthropic_api_key,
                    google: google_ai_api_key,
                }
                .normalized(),
            };
            runtime()?.block_on(server::serve(config))
        }

        Commands::Export {
            background,
            logo,
            position,
            scale,
            padding,
            title,
            description,
            output,
            public_base_url,
            fonts,
        } => {
            let face = typeface::load(fonts.font.as_deref(), fonts.bold_font.as_deref())?;
            let request = ExportRequest {
                background_url: background.map(|b| local_file_as_data_uri(&b)).transpose()?,
                logo_url: logo.map(|l| local_file_as_data_uri(&l)).transpose()?,
                logo_position: LogoPosition::from_name(&position),
                logo_scale: brand::clamp_logo_scale(scale),
                logo_padding: padding,
                title,
                description: unescape_newlines(&description),
            };

            let png = runtime()?.block_on(async {
                let acquirer = ImageAcquirer::new(Duration::from_secs(30), public_base_url)?;
                export::export_from_request(request, CanvasSpec::export(), &acquirer, face).await
            })?;

            std::fs::write(&output, &png)?;
            println!("Saved to {}", output.display());
            Ok(())
        }

        Commands::Layout {
            title,
            description,
            logo_size,
            position,
            scale,
            padding,
            canvas_px,
            block_flow,
            fonts,
        } => {
            let face = typeface::load(fonts.font.as_deref(), fonts.bold_font.as_deref())?;
            let logo_natural = logo_size.as_deref().map(parse_size).transpose()?;

            let mut canvas = CanvasSpec::export().with_size(canvas_px.max(1));
            if let Some(name) = block_flow.as_deref() {
                let flow = BlockFlow::from_name(name)
                    .ok_or_else(|| HeroError::InvalidInput(format!("Unknown block flow: {}", name)))?;
                canvas = canvas.with_block_flow(flow);
            }

            let logo_spec = LogoSpec::brand(LogoPosition::from_name(&position), scale, padding);
            let descriptor = layout::plan(
                &canvas,
                logo_natural,
                &logo_spec,
                &title,
                &unescape_newlines(&description),
                face.as_ref(),
            );
            let json = serde_json::to_string_pretty(&descriptor)
                .map_err(|e| HeroError::InvalidInput(format!("Failed to serialize layout: {}", e)))?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, HeroError> {
    Ok(tokio::runtime::Runtime::new()?)
}

/// Inline local files so they go through the same reference handling as URLs.
fn local_file_as_data_uri(reference: &str) -> Result<String, HeroError> {
    let path = Path::new(reference);
    if !path.is_file() {
        return Ok(reference.to_string());
    }
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "image/png".to_string());
    Ok(to_data_uri(&mime, &bytes))
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(raw: &str) -> Result<(u32, u32), HeroError> {
    let invalid = || HeroError::InvalidInput(format!("Invalid size '{}', expected WIDTHxHEIGHT", raw));
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w = w.trim().parse().map_err(|_| invalid())?;
    let h = h.trim().parse().map_err(|_| invalid())?;
    Ok((w, h))
}

fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
