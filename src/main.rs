//! InstaFilter CLI - apply a one-knob filter to a photo.
//!
//! ```text
//! instafilter list [--json]
//! instafilter info <filter> [--json]
//! instafilter render <image> [--filter id] [--intensity f] [--output path]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use instafilter::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

/// One-knob photo filters.
#[derive(Parser)]
#[command(name = "instafilter", version)]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all filters, grouped by category.
    List {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Show a filter's parameters and defaults.
    Info {
        /// Filter id or name (e.g. "gaussian_blur", "Sepia Tone").
        filter: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Render a photo and save it.
    Render {
        /// Photo to filter (PNG, JPEG, GIF, WebP, TIFF, BMP).
        image: PathBuf,

        /// Filter to apply. Defaults to the configured filter.
        #[arg(long)]
        filter: Option<FilterKind>,

        /// Intensity, clamped into [0, 1]. Defaults to the configured value.
        #[arg(long)]
        intensity: Option<f32>,

        /// Write here instead of into the photo library.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_logger(verbose: u8) {
    use std::io::Write;

    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = buf.timestamp_seconds();

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::List { json } => list_filters(json),
        Command::Info { filter, json } => filter_info(&filter, json),
        Command::Render {
            image,
            filter,
            intensity,
            output,
        } => render_image(config, image, filter, intensity, output),
    }
}

fn list_filters(json: bool) -> Result<()> {
    let registry = FilterRegistry::with_builtins();

    if json {
        let all: Vec<&FilterMetadata> = registry.metadata().collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in registry.grouped_by_category() {
        println!("  {}", category.display_name());
        for metadata in filters {
            println!("      {:<14} {}", metadata.id(), metadata.description);
        }
        println!();
    }
    Ok(())
}

fn filter_info(name: &str, json: bool) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let Some(metadata) = registry.resolve(name).and_then(|k| registry.get_metadata(k)) else {
        return Err(InstaFilterError::UnknownFilter(name.to_string()))
            .context("use 'list' to see available filters");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id());
    println!("Category: {}", metadata.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    println!();

    println!("Parameters (driven by intensity):");
    for param in &metadata.parameters {
        let (min, max) = param.range;
        let scale = match param.ui_hint {
            UiHint::Slider { logarithmic: true } => "log slider",
            UiHint::Slider { logarithmic: false } => "slider",
        };
        println!(
            "  {} ({}) = {} (range {}..{}, intensity x {}, {})",
            param.display_name,
            param.key,
            param.default_value,
            min,
            max,
            param.key.value_for(Intensity::MAX),
            scale
        );
        if !param.description.is_empty() {
            println!("    {}", param.description);
        }
    }
    if !metadata.tags.is_empty() {
        println!();
        println!("Tags: {}", metadata.tags.join(", "));
    }
    Ok(())
}

fn render_image(
    config: AppConfig,
    image: PathBuf,
    filter: Option<FilterKind>,
    intensity: Option<f32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let filter = filter.unwrap_or(config.session.filter);
    let intensity = Intensity::clamped(intensity.unwrap_or(config.session.intensity));

    let source = SourceImage::from_path(&image)
        .with_context(|| format!("opening {}", image.display()))?;

    let mut session = EditorSession::new(filter, intensity);
    let rendered = match session.load_image(source) {
        RenderState::Rendered(rendered) => rendered.clone(),
        RenderState::Failed(e) => bail!("{filter} could not render {}: {e}", image.display()),
        RenderState::Empty => bail!("no image bound"),
    };
    println!(
        "Rendered {} with {} at intensity {} {} in {:?}",
        image.display(),
        rendered.filter,
        rendered.intensity,
        rendered.parameters,
        rendered.elapsed
    );

    match output {
        Some(path) => {
            rendered
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Saved to {}", path.display());
        }
        None => {
            let library = DirectoryLibrary::new(config.library);
            let outcome = session.save(&library)?.wait();
            report_outcome(&outcome);
            let saved = outcome?;
            println!("Saved to {}", saved.path.display());
        }
    }
    Ok(())
}
