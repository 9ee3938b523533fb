//! `layerkit` command line interface.

use crate::app::{layout_service, resolve_target, session_options};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use layerkit_communication::{ArrangeSession, Notice, ResizeOutcome};
use layerkit_core::thread_safe;
use layerkit_designer::arrangement::SystemClock;
use layerkit_designer::arrangement::UuidIdSource;
use layerkit_designer::{ops, Alignment, FileFontLoader, FontManager, Scene};
use layerkit_settings::Config;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "layerkit",
    about = "Canvas layer toolkit with AI-assisted smart arrangement",
    version
)]
pub struct Cli {
    /// Config file (.toml or .json); defaults to the platform config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resize the selection to a target size, arranging two or more layers.
    Arrange(ArrangeArgs),

    /// Align the selected layers.
    Align(AlignArgs),

    /// Group the selected layers.
    Group(SceneArgs),

    /// Remove the innermost group from the selected layers.
    Ungroup(SceneArgs),

    /// Print the target size presets.
    Presets,

    /// Validate a config file.
    #[command(name = "check-config")]
    CheckConfig {
        /// File to check; defaults to --config or the platform location.
        path: Option<PathBuf>,
    },

    /// Preload the configured local fonts.
    Fonts,
}

#[derive(Debug, Args)]
pub struct SceneArgs {
    /// Scene file (element array or canvas document).
    #[arg(long)]
    pub scene: PathBuf,

    /// Comma-separated element ids; defaults to the selection stored in the scene.
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Where to write the result; defaults to overwriting the scene file.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ArrangeArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Target width.
    #[arg(long)]
    pub width: Option<f64>,

    /// Target height.
    #[arg(long)]
    pub height: Option<f64>,

    /// Named preset instead of width/height.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub preset: Option<String>,

    /// Use a saved layout service response instead of calling the endpoint.
    #[arg(long)]
    pub response: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// left, horizontal-center, right, top, vertical-center or bottom.
    #[arg(long)]
    pub to: Alignment,
}

fn open_scene(args: &SceneArgs) -> anyhow::Result<Scene> {
    let mut scene = Scene::load_from_file(&args.scene)
        .with_context(|| format!("loading {}", args.scene.display()))?;
    if !args.select.is_empty() {
        scene.select_only(args.select.iter().map(|s| s.trim().to_string()))?;
    }
    Ok(scene)
}

fn write_scene(scene: &Scene, args: &SceneArgs) -> anyhow::Result<PathBuf> {
    let path = args.output.clone().unwrap_or_else(|| args.scene.clone());
    scene
        .save_to_file(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).context("loading config")
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Arrange(args) => run_arrange(load_config(config_path)?, args).await,
        Commands::Align(args) => {
            let mut scene = open_scene(&args.scene)?;
            let moved = ops::align(&mut scene, args.to, &SystemClock, &UuidIdSource)?;
            let path = write_scene(&scene, &args.scene)?;
            println!("Aligned {} layers {} -> {}", moved, args.to, path.display());
            Ok(())
        }
        Commands::Group(args) => {
            let mut scene = open_scene(&args)?;
            let group_id = ops::group(&mut scene, &SystemClock, &UuidIdSource)?;
            let path = write_scene(&scene, &args)?;
            println!("Grouped as {} -> {}", group_id, path.display());
            Ok(())
        }
        Commands::Ungroup(args) => {
            let mut scene = open_scene(&args)?;
            let changed = ops::ungroup(&mut scene, &SystemClock, &UuidIdSource)?;
            let path = write_scene(&scene, &args)?;
            println!("Ungrouped {} layers -> {}", changed, path.display());
            Ok(())
        }
        Commands::Presets => {
            let config = load_config(config_path)?;
            for p in &config.arrangement.presets {
                let mark = if p.recommended { " (recommended)" } else { "" };
                println!("{:<24} {:>6} x {:<6}{}", p.name, p.width, p.height, mark);
            }
            Ok(())
        }
        Commands::CheckConfig { path } => {
            let path = match path.as_deref().or(config_path) {
                Some(p) => p.to_path_buf(),
                None => Config::default_path()?,
            };
            Config::load_from_file(&path).with_context(|| format!("checking {}", path.display()))?;
            println!("{}: ok", path.display());
            Ok(())
        }
        Commands::Fonts => {
            let config = load_config(config_path)?;
            let fonts = FontManager::global();
            let loaded = fonts.preload_all(&config.fonts.preload, &FileFontLoader);
            println!("{}/{} fonts available", loaded, config.fonts.preload.len());
            for family in fonts.loaded_families() {
                println!("  {}", family);
            }
            Ok(())
        }
    }
}

async fn run_arrange(config: Config, args: ArrangeArgs) -> anyhow::Result<()> {
    let target = resolve_target(&config, args.preset.as_deref(), args.width, args.height)?;
    let scene = open_scene(&args.scene)?;
    let service = layout_service(&config, args.response.as_deref())?;

    let scene = thread_safe(scene);
    let session = ArrangeSession::new(scene.clone(), service).with_options(session_options(&config));

    let result = session.resize(target).await;
    let committed = match &result {
        Ok(_) => true,
        Err(e) => e.commits_cleanup(),
    };
    if committed {
        let path = write_scene(&scene.lock(), &args.scene)?;
        tracing::info!("Wrote {}", path.display());
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{}", Notice::for_error(&err));
            return Err(err.into());
        }
    };
    match outcome {
        ResizeOutcome::Direct { id } => {
            println!("Resized {} to {} x {}", id, target.width, target.height);
        }
        ResizeOutcome::Arranged(outcome) => {
            println!("{}", outcome.notice);
            for id in &outcome.created {
                println!("  {}", id);
            }
            if !outcome.unmatched.is_empty() {
                println!("  unmatched: {}", outcome.unmatched.join(", "));
            }
        }
    }
    Ok(())
}
