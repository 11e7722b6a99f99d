//! stlexport - export demo scenes to STL and inspect STL files
//!
//! Usage:
//!   stlexport demo --shape assembly --binary -o part.stl
//!   stlexport inspect part.stl
//!
//! Set `RUST_LOG=debug` to trace collected meshes.

use std::fs;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::style::Color;
use stlexport_core::{export, read_stl, set_binary_header, ExportOptions, StlOutput};
use stlexport_cli::{demo_scene, status, summarize, DemoShape};

#[derive(Parser)]
#[command(name = "stlexport", version, about = "Export scenes to STL")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a built-in demo scene
    Demo {
        #[arg(long, value_enum, default_value = "cube")]
        shape: DemoShape,

        /// Write binary STL instead of ASCII
        #[arg(long)]
        binary: bool,

        /// Text for the 80-byte binary header
        #[arg(long, requires = "binary")]
        header: Option<String>,

        /// Output file; ASCII goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print facet count and bounds of an STL file
    Inspect { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Demo {
            shape,
            binary,
            header,
            output,
        } => run_demo(shape, binary, header.as_deref(), output),
        Command::Inspect { path } => run_inspect(&path),
    }
}

fn run_demo(shape: DemoShape, binary: bool, header: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    let scene = demo_scene(shape);
    let options = ExportOptions { binary };
    let mut stl = export(&scene, &options).context("Failed to export scene")?;

    if let (Some(text), StlOutput::Binary(bytes)) = (header, &mut stl) {
        set_binary_header(bytes, text);
    }

    match output {
        Some(path) => {
            fs::write(&path, stl.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            status(
                &mut io::stderr(),
                Color::Green,
                "Exported",
                &format!("{:?} scene to {} ({} bytes)", shape, path.display(), stl.len()),
            )?;
        }
        None if stl.is_binary() => {
            anyhow::bail!("Binary output needs --output; refusing to write bytes to a terminal");
        }
        None => stl.write_to(&mut stdout()).context("Failed to write to stdout")?,
    }

    Ok(())
}

fn run_inspect(path: &Path) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let facets = read_stl(&data).with_context(|| format!("Failed to parse {}", path.display()))?;
    let summary = summarize(&facets);

    let mut out = stdout();
    status(&mut out, Color::Cyan, "Facets", &summary.facets.to_string())?;
    match summary.bounds {
        Some((min, max)) => {
            status(&mut out, Color::Cyan, "Min", &format!("{} {} {}", min.x, min.y, min.z))?;
            status(&mut out, Color::Cyan, "Max", &format!("{} {} {}", max.x, max.y, max.z))?;
        }
        None => status(&mut out, Color::Yellow, "Bounds", "empty solid")?,
    }

    Ok(())
}
