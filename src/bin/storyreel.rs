use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a script and its scene assets to an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Check a script, and optionally the assets it references, without rendering.
    Validate(ValidateArgs),
    /// Render one subtitle overlay to a PNG for previewing styles.
    Subtitle(SubtitleArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,

    /// JSON object mapping scene numbers to image files.
    #[arg(long)]
    images: PathBuf,

    /// JSON object mapping scene numbers to narration audio files.
    #[arg(long)]
    audio: PathBuf,

    /// Render configuration JSON. Without it, defaults plus `VIDEO_*` environment overrides apply.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output MP4 path. Defaults to `videos/video_{timestamp}.mp4` under `OUTPUT_BASE_DIR`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Image asset map to check against the script.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Audio asset map to check against the script.
    #[arg(long)]
    audio: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SubtitleArgs {
    /// Subtitle text.
    #[arg(long)]
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render configuration JSON supplying the style and canvas width.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Subtitle(args) => cmd_subtitle(args),
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let fallback = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback.to_ascii_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<storyreel::RenderConfig> {
    let cfg = match path {
        Some(p) => storyreel::RenderConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => storyreel::RenderConfig::from_env().context("read VIDEO_* overrides")?,
    };
    cfg.validate()?;
    Ok(cfg)
}

fn load_script(path: &Path) -> anyhow::Result<storyreel::Script> {
    let mut script = storyreel::Script::from_file(path)
        .with_context(|| format!("load script '{}'", path.display()))?;
    script
        .validate()
        .with_context(|| format!("invalid script '{}'", path.display()))?;
    script.normalize();
    Ok(script)
}

fn load_asset_map(path: &Path) -> anyhow::Result<storyreel::SceneAssetMap> {
    storyreel::SceneAssetMap::from_json_file(path)
        .with_context(|| format!("load asset map '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let script = load_script(&args.script)?;
    let images = load_asset_map(&args.images)?;
    let audio = load_asset_map(&args.audio)?;
    let config = load_config(args.config.as_deref())?;

    let out = match args.out {
        Some(p) => p,
        None => {
            let dirs = storyreel::OutputDirs::from_env();
            dirs.create_all()?;
            storyreel::default_video_path(&dirs)
        }
    };

    let mut on_progress = |p: &storyreel::Progress| {
        tracing::info!(percent = (p.fraction * 100.0).round(), "{}", p.message);
    };
    let report = storyreel::compose_video(
        &script,
        &images,
        &audio,
        &config,
        Some(&out),
        &mut on_progress,
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let script = load_script(&args.script)?;
    let images = args.images.as_deref().map(load_asset_map).transpose()?;
    let audio = args.audio.as_deref().map(load_asset_map).transpose()?;

    let mut problems = Vec::new();
    for scene in &script.scenes {
        let n = scene.scene_number;
        if let Some(map) = &images {
            match map.get(n) {
                Some(p) => {
                    if let Err(e) = storyreel::validate_image_file(p) {
                        problems.push(format!("scene {n}: {e}"));
                    }
                }
                None => problems.push(format!("scene {n}: no image assigned")),
            }
        }
        if let Some(map) = &audio {
            match map.get(n) {
                Some(p) => {
                    if let Err(e) = storyreel::validate_audio_file(p) {
                        problems.push(format!("scene {n}: {e}"));
                    }
                }
                None => problems.push(format!("scene {n}: no audio assigned")),
            }
        }
    }

    for p in &problems {
        eprintln!("{p}");
    }
    if !problems.is_empty() {
        anyhow::bail!(
            "{} asset problem(s); affected scenes would be skipped at render time",
            problems.len()
        );
    }
    eprintln!(
        "ok: '{}' with {} scenes, {:.1}s declared",
        script.title,
        script.scenes.len(),
        script.total_duration
    );
    Ok(())
}

fn cmd_subtitle(args: SubtitleArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let img = storyreel::render_subtitle(&args.text, &config.subtitle_style, config.width)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.frame
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {} line(s))",
        args.out.display(),
        img.frame.width,
        img.frame.height,
        img.lines.len()
    );
    Ok(())
}
