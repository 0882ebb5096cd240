use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use typeforge::metadata::{generate_metadata, read_font_entries};
use typeforge_common::paths::{check_base_dir, resolve_in};

/// Extracts font metadata into `metadata.json` files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A JSON list of `{ name, infile, outpath, category }` entries.
    #[arg(default_value = "src/fonts.json")]
    fonts: PathBuf,

    /// The directory the font and output paths are relative to.
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Whether to enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    typeforge::init_tracing(args.verbose);

    check_base_dir(&args.base_dir)?;
    let entries = read_font_entries(&resolve_in(&args.base_dir, &args.fonts))?;
    let written = generate_metadata(&entries, &args.base_dir);
    info!("Built metadata for {} of {} fonts.", written.len(), entries.len());
    if written.len() != entries.len() {
        bail!("{} fonts failed.", entries.len() - written.len());
    }

    Ok(())
}
