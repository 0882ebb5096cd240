use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use typeforge::readme::{generate_readme, ReadmeConfig};

/// Generates the project README from its template.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A TOML file overriding the template path, output path and README contents.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The directory the template and output paths are relative to.
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Whether to enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    typeforge::init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => ReadmeConfig::load(path)?,
        None => ReadmeConfig::default(),
    };
    let output = generate_readme(&config, &args.base_dir)?;

    let name = output.file_name().unwrap_or(output.as_os_str());
    println!("{} generated successfully.", name.to_string_lossy());
    Ok(())
}
