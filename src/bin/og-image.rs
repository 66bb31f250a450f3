use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "og-image", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,

    #[command(flatten)]
    render: RenderArgs,

    /// Log pipeline stages at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render and save the share image (the default when no subcommand is given).
    Render(RenderArgs),
    /// Print the effective configuration as JSON.
    DumpConfig(DumpConfigArgs),
    /// Report which font a path would resolve to.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON config; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that relative paths in the config resolve against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output PNG path (overrides the config).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output style (replaces the config's style with that style's defaults).
    #[arg(long, value_enum)]
    style: Option<StyleChoice>,

    /// Headshot photo (photo-caption style only).
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Title text.
    #[arg(long)]
    title: Option<String>,

    /// Title font file.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip system fonts when falling back; use the built-in font directly.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Parser, Debug)]
struct DumpConfigArgs {
    /// JSON config to merge over the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    style: Option<StyleChoice>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Font file to try first.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip system fonts when falling back.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StyleChoice {
    GradientTitle,
    PhotoCaption,
}

impl StyleChoice {
    fn default_style(self) -> og_image::Style {
        match self {
            Self::GradientTitle => og_image::Style::GradientTitle(Default::default()),
            Self::PhotoCaption => og_image::Style::PhotoCaption(Default::default()),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::GradientTitle => "gradient-title",
            Self::PhotoCaption => "photo-caption",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Some(Command::Render(args)) => cmd_render(args),
        Some(Command::DumpConfig(args)) => cmd_dump_config(args),
        Some(Command::Fonts(args)) => cmd_fonts(args),
        None => cmd_render(cli.render),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    path: Option<&Path>,
    style: Option<StyleChoice>,
) -> anyhow::Result<og_image::RenderConfig> {
    let mut cfg = match path {
        Some(p) => og_image::RenderConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => og_image::RenderConfig::default(),
    };
    if let Some(choice) = style {
        if cfg.style.name() != choice.name() {
            cfg.style = choice.default_style();
        }
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref(), args.style)?;

    if let Some(out) = args.out {
        cfg.out = out;
    }
    if let Some(title) = args.title {
        cfg.title = title;
    }
    if let Some(font) = args.font {
        cfg.font = Some(font);
    }
    if args.no_system_fonts {
        cfg.system_fonts = false;
    }
    if let Some(photo) = args.photo {
        let og_image::Style::PhotoCaption(pc) = &mut cfg.style else {
            anyhow::bail!("--photo only applies to the photo-caption style");
        };
        pc.photo = photo;
    }

    let cfg = cfg.resolved(&args.root);
    let report = og_image::render_to_file(&cfg)
        .with_context(|| format!("render {} image", cfg.style.name()))?;

    println!("Saved -> {}", report.out_path.display());
    println!("Size: {}x{}px", report.width, report.height);
    Ok(())
}

fn cmd_dump_config(args: DumpConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.style)?;
    cfg.validate()?;
    let json = serde_json::to_string_pretty(&cfg).context("serialize config")?;
    println!("{json}");
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let loaded = og_image::load_font_or_fallback(args.font.as_deref(), !args.no_system_fonts)?;
    println!("source: {}", loaded.font.source());
    if let Some(reason) = &loaded.fallback_reason {
        println!("fallback reason: {reason}");
    }
    Ok(())
}
