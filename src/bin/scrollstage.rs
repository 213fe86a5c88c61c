use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollstage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a page JSON and report the catalog it would build.
    Validate(ValidateArgs),
    /// Simulate a full scroll sweep and print published values as JSON.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll step in px per simulated frame.
    #[arg(long, default_value_t = 120.0)]
    step: f64,

    /// Also sweep back to the top after reaching the bottom.
    #[arg(long)]
    and_back: bool,

    /// Honor a reduced-motion preference.
    #[arg(long)]
    reduced_motion: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn read_page_json(path: &PathBuf) -> anyhow::Result<scrollstage::Page> {
    let f = File::open(path).with_context(|| format!("open page '{}'", path.display()))?;
    let r = BufReader::new(f);
    let page: scrollstage::Page = serde_json::from_reader(r).with_context(|| "parse page JSON")?;
    Ok(page)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let page = read_page_json(&args.in_path)?;
    page.validate()?;

    let sections = scrollstage::catalog::build(&page)?;
    println!("page ok: {} nodes", page.nodes().count());
    for section in &sections {
        println!("section '{}'", section.node);
    }
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let page = read_page_json(&args.in_path)?;
    page.validate()?;

    let config = scrollstage::EngineConfig {
        reduced_motion: args.reduced_motion,
        ..scrollstage::EngineConfig::default()
    };
    let mut engine = scrollstage::Engine::init(page, config);
    engine.on_loaded();

    let max_scroll =
        (engine.page().content_height - engine.page().viewport.height).max(0.0);
    let step = args.step.max(1.0);

    let mut now = 0.0;
    let mut emit = |engine: &mut scrollstage::Engine, y: f64, now: &mut f64| {
        engine.on_scroll(y);
        engine.on_frame(*now);
        *now += 1.0 / 60.0;
    };

    let mut y = 0.0;
    while y < max_scroll {
        emit(&mut engine, y, &mut now);
        y += step;
    }
    emit(&mut engine, max_scroll, &mut now);
    engine.on_scroll_settled(now);

    if args.and_back {
        let mut y = max_scroll;
        while y > 0.0 {
            emit(&mut engine, y, &mut now);
            y -= step;
        }
        emit(&mut engine, 0.0, &mut now);
        engine.on_scroll_settled(now);
    }

    let out = serde_json::to_string_pretty(engine.page())?;
    println!("{out}");
    Ok(())
}
