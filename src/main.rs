use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use rollcut::{geometry_to_json, overlap, sustain, svg, RollConfig};

#[derive(Parser, Debug)]
#[command(name = "rollcut", version, about = "MIDI to player-instrument roll cutting geometry")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a roll's cutting geometry and write it as SVG.
    Roll(RollArgs),
    /// Report overlapping same-pitch notes in a MIDI file.
    Overlap(OverlapArgs),
    /// Synthesize sustain-pedal spans as notes on the control pitch.
    Sustain(SustainArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Organ,
    Piano,
}

#[derive(Parser, Debug)]
struct RollArgs {
    /// Input MIDI file.
    input: PathBuf,

    /// Output SVG path (default: input with .svg extension).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Instrument roll format.
    #[arg(long, value_enum, default_value = "organ")]
    preset: Preset,

    /// Also dump the geometry as JSON next to the SVG.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct OverlapArgs {
    /// Input MIDI file.
    input: PathBuf,
}

#[derive(Parser, Debug)]
struct SustainArgs {
    /// Input MIDI file.
    input: PathBuf,

    /// Output path (default: rewrite the input in place).
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Roll(args) => cmd_roll(args),
        Command::Overlap(args) => cmd_overlap(args),
        Command::Sustain(args) => cmd_sustain(args),
    }
}

fn cmd_roll(args: RollArgs) -> anyhow::Result<()> {
    let cfg = match args.preset {
        Preset::Organ => RollConfig::organ(),
        Preset::Piano => RollConfig::piano(),
    };

    let data = fs::read(&args.input)
        .with_context(|| format!("reading '{}'", args.input.display()))?;
    let geometry = rollcut::roll_bytes_to_geometry(&data, &cfg)
        .context("computing roll geometry")?;

    let out = args
        .out
        .unwrap_or_else(|| args.input.with_extension("svg"));
    svg::write_svg_file(&out, &geometry).context("writing SVG")?;
    println!("wrote {}", out.display());

    if args.json {
        let json_path = out.with_extension("json");
        fs::write(&json_path, geometry_to_json(&geometry)?)
            .with_context(|| format!("writing '{}'", json_path.display()))?;
        println!("wrote {}", json_path.display());
    }
    Ok(())
}

fn cmd_overlap(args: OverlapArgs) -> anyhow::Result<()> {
    let data = fs::read(&args.input)
        .with_context(|| format!("reading '{}'", args.input.display()))?;
    let smf = midly::Smf::parse(&data).context("parsing MIDI")?;

    let overlaps = overlap::find_overlaps(&smf);
    if overlaps.is_empty() {
        println!("No overlapping notes found.");
        return Ok(());
    }

    println!("Overlapping notes detected:");
    for o in overlaps {
        println!(
            "- tick {}, time {}, note {} (MIDI {})",
            o.tick,
            format_seconds(o.seconds),
            o.name,
            o.pitch
        );
    }
    Ok(())
}

fn cmd_sustain(args: SustainArgs) -> anyhow::Result<()> {
    let out = args.out.clone().unwrap_or_else(|| args.input.clone());
    sustain::rewrite_file(&args.input, &out).context("synthesizing sustain notes")?;
    println!("wrote {}", out.display());
    Ok(())
}

/// "3m 12.042s" for times over a minute, "12.042s" below.
fn format_seconds(seconds: f64) -> String {
    let minutes = (seconds / 60.0) as u64;
    let rest = seconds - minutes as f64 * 60.0;
    if minutes > 0 {
        format!("{minutes}m {rest:.3}s")
    } else {
        format!("{rest:.3}s")
    }
}
