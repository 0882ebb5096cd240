use anyhow::Result;
use clap::Parser;
use std::io::{self, BufWriter, Write};
use typeforge_common::ranges::{RangeList, DEFAULT_UNICODE_RANGE};

/// Prints the name of every character in a list of Unicode ranges.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Comma-separated code points and ranges, such as `U+0041-005A,U+20AC`.
    #[arg(default_value = DEFAULT_UNICODE_RANGE)]
    ranges: RangeList,

    /// Whether to enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    typeforge::init_tracing(args.verbose);

    let mut out = BufWriter::new(io::stdout().lock());
    typeforge::unicode_table::write_table(&mut out, &args.ranges)?;
    out.flush()?;
    Ok(())
}
