use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "laminate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene to a single image (requires ImageMagick on PATH).
    Render(RenderArgs),
    /// Print the layer hierarchy and the invocations a render would run, without running them.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output format. Defaults to the scene's format, then the output extension, then PNG.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Worker threads for overlay rendering.
    #[arg(long)]
    threads: Option<usize>,

    /// Directory for intermediate files.
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Executable run in place of the default `convert` (e.g. `magick` for ImageMagick 7).
    #[arg(long, default_value = laminate::DEFAULT_PROCESS)]
    command: String,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
    Gif,
    Webp,
    Tiff,
    Bmp,
}

impl From<FormatChoice> for laminate::OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Png => Self::Png,
            FormatChoice::Jpeg => Self::Jpeg,
            FormatChoice::Gif => Self::Gif,
            FormatChoice::Webp => Self::Webp,
            FormatChoice::Tiff => Self::Tiff,
            FormatChoice::Bmp => Self::Bmp,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<(laminate::SceneDef, laminate::Layer)> {
    let scene = laminate::SceneDef::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let root = scene
        .clone()
        .into_layer(base_dir)
        .with_context(|| format!("build layer tree from '{}'", path.display()))?;
    Ok((scene, root))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (scene, root) = read_scene(&args.in_path)?;

    let format = args
        .format
        .map(laminate::OutputFormat::from)
        .or(scene.output_format)
        .or_else(|| laminate::OutputFormat::from_path(&args.out))
        .unwrap_or_default();

    let mut opts = laminate::RendererOpts {
        threads: args.threads,
        command: args.command,
        ..laminate::RendererOpts::default()
    };
    if let Some(dir) = args.scratch_dir {
        opts.scratch_root = dir;
    }

    let plan = laminate::RenderPlan::build(&root)?;
    for process in plan.processes() {
        let exe = opts.executable(process);
        if !laminate::is_tool_on_path(exe) {
            anyhow::bail!("`{exe}` was not found on PATH (install ImageMagick or pass --command)");
        }
    }

    let renderer = laminate::Renderer::new(opts)?;
    let stats = renderer
        .render(&root, &args.out, format)
        .with_context(|| format!("render '{}'", args.in_path.display()))?;

    eprintln!(
        "wrote {} ({} layer(s), {} invocation(s), {} effect group(s))",
        args.out.display(),
        stats.layers,
        stats.invocations,
        stats.effect_groups
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (_, root) = read_scene(&args.in_path)?;
    print!("{}", laminate::describe_hierarchy(&root)?);
    println!();
    print!("{}", laminate::RenderPlan::build(&root)?);
    Ok(())
}
