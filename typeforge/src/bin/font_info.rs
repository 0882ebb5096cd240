use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing::{error, info};
use typeforge::font_report::{load_fonts, write_report};

/// Prints the identity of every font file matching a glob pattern.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The glob pattern to search for font files.
    #[arg(default_value = "build/fonts/**/*.ttf")]
    pattern: String,

    /// Whether to enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    typeforge::init_tracing(args.verbose);

    let paths = glob::glob(&args.pattern)
        .context("invalid glob pattern")?
        .filter_map(|path| match path {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Could not read path: {e}");
                None
            }
        });
    let files = load_fonts(paths);

    let mut out = std::io::stdout().lock();
    write_report(&mut out, &files)?;
    out.flush()?;
    info!("Inspected {} font files.", files.len());

    Ok(())
}
