//! Command-line argument definitions for the sopflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Convert an SOP analysis document into a BPMN 2.0 diagram
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input analysis file (JSON, optionally fenced)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output BPMN file
    #[arg(short, long, default_value = "out.bpmn")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["sopflow", "analysis.json"]);

        assert_eq!(args.input, "analysis.json");
        assert_eq!(args.output, "out.bpmn");
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "sopflow",
            "in.json",
            "-o",
            "diagram.bpmn",
            "--config",
            "sopflow.toml",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.output, "diagram.bpmn");
        assert_eq!(args.config.as_deref(), Some("sopflow.toml"));
        assert_eq!(args.log_level, "debug");
    }
}
