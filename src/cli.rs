//! Command-line surface.
//!
//! The flag *names* below are adapted to clap's standard double-dash
//! convention rather than the single-dash style of the LLVM-tool lineage
//! this translator's flag table descends from (`-o`, `-inplace`,
//! `-no-output`, ...); the set of options, their effects, and the conflict
//! rules are unchanged.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use hipify_core::error::HipifyError;

/// Rewrite C/C++ source from one GPU compute API to an equivalent one.
#[derive(Parser, Debug)]
#[command(name = "hipify-rs", version, about, long_about = None)]
pub struct Cli {
    /// One or more input C/C++ source paths.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output path. Forbidden with multiple inputs or with --inplace/--no-output.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Overwrite the input in place, saving the original as `<src>.prehip`
    /// unless --no-backup is also given.
    #[arg(long)]
    pub inplace: bool,

    /// Skip the `.prehip` backup copy when translating in place.
    #[arg(long)]
    pub no_backup: bool,

    /// Discard translated output; run for analysis/stats only.
    #[arg(long)]
    pub no_output: bool,

    /// Print per-file and aggregate stats to stderr.
    #[arg(long)]
    pub print_stats: bool,

    /// Also write stats as CSV to this path.
    #[arg(long)]
    pub stats_output: Option<PathBuf>,

    /// Shorthand for --no-output --print-stats.
    #[arg(long)]
    pub examine: bool,

    /// Internal log verbosity.
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Explicit resource-directory override for the embedded front end.
    /// Falls back to the `HIPIFY_RESOURCE_DIR` environment variable, then to
    /// the front end's compiled-in default.
    #[arg(long)]
    pub resource_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing_level(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Resolved, conflict-checked options passed to the driver.
///
/// Constructed once from `Cli` instead of threading half a dozen booleans
/// positionally through the driver's per-file pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub output: Option<PathBuf>,
    pub in_place: bool,
    pub no_backup: bool,
    pub no_output: bool,
    pub print_stats: bool,
    pub stats_output: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
}

impl Cli {
    /// Validate option conflicts and fold `--examine` into its constituent
    /// flags, producing a `Config` for the driver.
    pub fn resolve(self) -> Result<(Vec<PathBuf>, Config), HipifyError> {
        let no_output = self.no_output || self.examine;
        let print_stats = self.print_stats || self.examine;

        if self.output.is_some() && self.inputs.len() > 1 {
            return Err(HipifyError::option_conflict(
                "-o is not allowed with multiple input files",
            ));
        }
        if self.output.is_some() && self.inplace {
            return Err(HipifyError::option_conflict(
                "-o is not allowed with -inplace",
            ));
        }
        if no_output && self.inplace {
            return Err(HipifyError::option_conflict(
                "-no-output is not allowed with -inplace",
            ));
        }
        if no_output && self.output.is_some() {
            return Err(HipifyError::option_conflict(
                "-no-output is not allowed with -o",
            ));
        }

        let resource_dir = self
            .resource_dir
            .or_else(|| std::env::var_os("HIPIFY_RESOURCE_DIR").map(PathBuf::from));

        let config = Config {
            output: self.output,
            in_place: self.inplace,
            no_backup: self.no_backup,
            no_output,
            print_stats,
            stats_output: self.stats_output,
            resource_dir,
        };
        Ok((self.inputs, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["hipify-rs"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn output_with_multiple_inputs_conflicts() {
        let err = cli(&["a.cu", "b.cu", "-o", "out.hip"])
            .resolve()
            .unwrap_err();
        assert_eq!(err.exit_code().code(), 1);
    }

    #[test]
    fn output_with_inplace_conflicts() {
        let err = cli(&["a.cu", "-o", "out.hip", "--inplace"])
            .resolve()
            .unwrap_err();
        assert_eq!(err.exit_code().code(), 1);
    }

    #[test]
    fn no_output_with_inplace_conflicts() {
        let err = cli(&["a.cu", "--no-output", "--inplace"])
            .resolve()
            .unwrap_err();
        assert_eq!(err.exit_code().code(), 1);
    }

    #[test]
    fn no_output_with_output_conflicts() {
        let err = cli(&["a.cu", "--no-output", "-o", "out.hip"])
            .resolve()
            .unwrap_err();
        assert_eq!(err.exit_code().code(), 1);
    }

    #[test]
    fn examine_implies_no_output_and_print_stats() {
        let (_, config) = cli(&["a.cu", "--examine"]).resolve().unwrap();
        assert!(config.no_output);
        assert!(config.print_stats);
    }

    #[test]
    fn plain_invocation_has_no_conflicts() {
        let (inputs, config) = cli(&["a.cu", "b.cu"]).resolve().unwrap();
        assert_eq!(inputs.len(), 2);
        assert!(!config.no_output);
        assert!(!config.in_place);
    }

    #[test]
    fn resource_dir_flag_overrides_environment() {
        std::env::set_var("HIPIFY_RESOURCE_DIR", "/env/path");
        let (_, config) = cli(&["a.cu", "--resource-dir", "/flag/path"])
            .resolve()
            .unwrap();
        assert_eq!(config.resource_dir, Some(PathBuf::from("/flag/path")));
        std::env::remove_var("HIPIFY_RESOURCE_DIR");
    }
}
