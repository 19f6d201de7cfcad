use std::path::PathBuf;

use clap::Parser;

use crate::io::format::qbasis_output;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted `QBasis` heading to the `qbasis-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    let width = 101;
    let bar = "─".repeat(width);
    let about = " Basis-set libraries, molecular geometries and flattened shell sets";
    qbasis_output!("╭{bar}╮");
    qbasis_output!("│{:<width$}│", " QBasis");
    qbasis_output!("│{about:<about_width$}{version:>13} │", about_width = width - 14);
    qbasis_output!("╰{bar}╯");
    qbasis_output!("");
}

/// Command-line arguments of the `qbasis` binary.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML input file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stem of the output file. The output is written to `<OUTPUT>.out`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Writes a template YAML input file with the given name (without extension) and exits.
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Logs debugging information.
    #[arg(short, long)]
    pub debug: bool,
}
