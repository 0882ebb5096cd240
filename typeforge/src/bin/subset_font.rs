use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use typeforge_common::{
    charset::{read_charset, EURO_SIGN},
    paths::{check_base_dir, resolve_in},
};
use typeforge_fontops::subsetter::{subset_font_file, SubsetOptions};

/// Subsets a font to the characters listed in a charset file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The font file to subset.
    source_font_path: PathBuf,

    /// Where to write the subset font.
    dest_font_path: PathBuf,

    /// The charset file listing the code points to keep, one hex code point per line.
    #[arg(long, default_value = "web_fr_subset.txt")]
    charset: PathBuf,

    /// The directory the charset path is relative to.
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// A TOML file with subsetting options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Whether to enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    typeforge::init_tracing(args.verbose);

    check_base_dir(&args.base_dir)?;
    let charset = resolve_in(&args.base_dir, &args.charset);
    let mut codepoints = read_charset(&charset)?;
    codepoints.push(EURO_SIGN);
    println!("{codepoints:?}");

    let options = match &args.config {
        Some(config) => SubsetOptions::load(config)?,
        None => SubsetOptions::default(),
    };
    subset_font_file(&args.source_font_path, &args.dest_font_path, &codepoints, &options)?;
    Ok(())
}
