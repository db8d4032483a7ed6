use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use qrlogo::helper::{generate, print_qr, save_output};
use qrlogo::logo::LogoAsset;
use qrlogo::matrix::{ModuleSource, QrCodeSource};
use qrlogo::request::{RenderOptions, RenderRequest, RequestPayload};

/// Render a QR code, optionally with a logo in the middle.
#[derive(Parser, Debug)]
#[command(name = "qrlogo", version, about)]
struct Cli {
    /// Text to encode.
    #[arg(required_unless_present = "payload")]
    text: Option<String>,

    /// JSON request body: {"text", "qr_color", "bg_color", "format", "size"}. Flags override its fields.
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Module color, `RGB` or `RRGGBB` with optional `#`.
    #[arg(long)]
    qr_color: Option<String>,

    /// Background color.
    #[arg(long)]
    bg_color: Option<String>,

    /// bitmap (png), photographic (jpeg) or vector (svg).
    #[arg(short, long)]
    format: Option<String>,

    /// Edge length of the output in pixels.
    #[arg(short, long)]
    size: Option<i64>,

    /// Logo file; `.svg` is drawn as vector, anything else decoded as an image.
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// JSON file overriding the rendering options.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file name without extension.
    #[arg(long)]
    filename: Option<String>,

    /// Print the code to the terminal as well.
    #[arg(long)]
    print: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let mut payload = match &cli.payload {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            RequestPayload::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RequestPayload::default(),
    };
    if let Some(text) = cli.text {
        payload.text = text;
    }
    payload.qr_color = cli.qr_color.or(payload.qr_color);
    payload.bg_color = cli.bg_color.or(payload.bg_color);
    payload.format = cli.format.or(payload.format);
    payload.size = cli.size.or(payload.size);

    let options = match &cli.options {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<RenderOptions>(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RenderOptions::default(),
    };

    let logo = match &cli.logo {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("reading logo {}", path.display()))?;
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            Some(LogoAsset::from_named_bytes(name, bytes))
        }
        None => None,
    };

    let request = RenderRequest::from_payload(payload, logo);
    tracing::info!(size = request.size, format = ?request.format, "rendering QR code");

    if cli.print {
        print_qr(&QrCodeSource.encode(&request.text, options.correction)?.with_quiet_zone(options.quiet_zone));
    }

    let output = generate(&request, &options).context("rendering QR code")?;
    let path = save_output(&output, cli.output_dir.as_deref(), cli.filename.as_deref())?;
    println!("{}", path.display());
    Ok(())
}
