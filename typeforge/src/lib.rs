//! Build scripts for a web font project.
//!
//! The library half holds the logic behind the binaries: rendering the project README,
//! listing Unicode ranges with character names, reporting on font files and collecting font
//! metadata. Font subsetting lives in `typeforge_fontops`.

pub mod font_report;
pub mod metadata;
pub mod readme;
pub mod unicode_table;

/// Installs the `tracing` subscriber used by every binary. Logs go to stderr, so that the
/// program output on stdout can be piped.
#[cfg(feature = "binary")]
pub fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(if verbose { typeforge_common::FILTER_SPEC } else { "info" })
        .with_writer(std::io::stderr)
        .init();
}
