use crate::FamilyTree;
use crate::app::{self, AppState};
use crate::config::{Config, load_config};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_dataset;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::write_output_svg;
use crate::store::FileStore;
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "ftree", version, about = "Render a family tree dataset (JSON) as SVG/PNG")]
pub struct Args {
    /// Input dataset (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and layout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme preset, overrides the config file
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// PNG width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// PNG height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Photo to upload into the store and assign to --person. Edits the
    /// stored dataset, so it cannot be combined with --input.
    #[arg(
        long = "photo",
        requires_all = ["person", "store_dir"],
        conflicts_with = "input"
    )]
    pub photo: Option<PathBuf>,

    /// Person id receiving the uploaded photo
    #[arg(long = "person", requires = "photo")]
    pub person: Option<String>,

    /// Store directory: data/family.json and static/uploads/ live under it
    #[arg(long = "store-dir")]
    pub store_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Layout,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::from_name(name).ok_or_else(|| anyhow::anyhow!("Unknown theme: {name}"))?;
        config.render.background = config.theme.background.clone();
    }
    config.render.width = args.width;
    config.render.height = args.height;

    let mut state = load_state(&args)?;

    if let (Some(photo), Some(person)) = (args.photo.as_deref(), args.person.as_deref()) {
        state = attach_photo(&args, state, photo, person)?;
    }

    let dataset = state
        .dataset
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No dataset loaded"))?;
    let tree = FamilyTree::build(dataset, &config.layout);
    if tree.is_empty() {
        tracing::info!("dataset has no people, rendering empty state");
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = tree.to_svg(dataset, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&args, &tree, dataset, &config)?,
        OutputFormat::Layout => match args.output.as_deref() {
            Some(path) => write_layout_dump(
                path,
                &tree.layout,
                &tree.hierarchy,
                &tree.anchors,
                &tree.spouse_edges,
            )?,
            None => {
                let dump = LayoutDump::from_layout(
                    &tree.layout,
                    &tree.hierarchy,
                    &tree.anchors,
                    &tree.spouse_edges,
                );
                println!("{}", dump.to_json()?);
            }
        },
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FTREE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "family_tree_renderer=debug,info"
        } else {
            "family_tree_renderer=info,warn"
        })
    });

    let format = env::var("FTREE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
    };
    if let Err(err) = result {
        eprintln!("warning: logging already initialized: {err}");
    }
}

/// Input file or stdin wins; otherwise the store's dataset is loaded.
fn load_state(args: &Args) -> Result<AppState> {
    if args.input.is_none()
        && let Some(dir) = args.store_dir.as_deref()
    {
        let store = FileStore::in_dir(dir);
        return Ok(app::reload(&AppState::default(), &store)?);
    }

    let input = read_input(args.input.as_deref())?;
    let dataset = parse_dataset(&input)?;
    Ok(AppState {
        dataset: Some(dataset),
        pending_photo: None,
    })
}

fn attach_photo(args: &Args, state: AppState, photo: &Path, person: &str) -> Result<AppState> {
    let store_dir = args
        .store_dir
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--store-dir is required with --photo"))?;
    let store = FileStore::in_dir(store_dir);
    let bytes =
        std::fs::read(photo).with_context(|| format!("reading photo {}", photo.display()))?;
    let file_name = photo
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let state = app::upload_photo(&state, &store, file_name, &bytes)?;
    let state = app::assign_photo(&state, person)?;
    if let Some(dataset) = state.dataset.as_ref() {
        crate::store::DatasetStore::save(&store, dataset)?;
    }
    Ok(state)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn write_png(args: &Args, tree: &FamilyTree, dataset: &crate::Dataset, config: &Config) -> Result<()> {
    let output = ensure_output(&args.output, "png")?;
    let svg = tree.to_svg(dataset, &config.theme, &config.layout);
    write_output_png(&svg, &output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_args: &Args, _tree: &FamilyTree, _dataset: &crate::Dataset, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
