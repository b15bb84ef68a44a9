//! The Driver: per-file copy/parse/apply/rename pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use hipify_core::error::HipifyError;
use hipify_core::rename_table::RenameTables;
use hipify_core::stats::StatsCollector;

use crate::cli::Config;
use crate::diagnostics;
use crate::frontend;

const TMP_SUFFIX: &str = ".hipify-tmp";
const DEFAULT_OUTPUT_SUFFIX: &str = ".hip";
const BACKUP_SUFFIX: &str = ".prehip";

/// Per-input-file bookkeeping. Created at the start of one file's pipeline,
/// dropped once its stats have been flushed.
struct TranslationJob {
    src_path: PathBuf,
    tmp_path: PathBuf,
    dst_path: PathBuf,
}

impl TranslationJob {
    fn new(src_path: &Path, config: &Config) -> Self {
        let tmp_path = append_suffix(src_path, TMP_SUFFIX);
        let dst_path = if config.in_place {
            src_path.to_path_buf()
        } else if let Some(output) = &config.output {
            output.clone()
        } else {
            append_suffix(src_path, DEFAULT_OUTPUT_SUFFIX)
        };
        TranslationJob {
            src_path: src_path.to_path_buf(),
            tmp_path,
            dst_path,
        }
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Outcome of running the driver over one or more input files.
pub struct DriverSummary {
    /// Sum of front-end failure counts across jobs: 0 on success, front-end
    /// failures otherwise (option conflicts are rejected earlier, before
    /// the driver ever runs).
    pub front_end_failures: u32,
}

pub struct Driver {
    tables: RenameTables,
    stats: StatsCollector,
}

impl Driver {
    pub fn new(tables: RenameTables) -> Self {
        Driver {
            tables,
            stats: StatsCollector::new(),
        }
    }

    pub fn run(&mut self, inputs: &[PathBuf], config: &Config) -> Result<DriverSummary, HipifyError> {
        let mut front_end_failures = 0u32;

        for src_path in inputs {
            front_end_failures += self.run_one(src_path, config)?;
        }

        if config.print_stats {
            self.print_stats();
        }
        if let Some(csv_path) = &config.stats_output {
            let file = fs::File::create(csv_path).map_err(|e| HipifyError::io(csv_path, e))?;
            self.stats
                .write_csv(file)
                .map_err(|e| HipifyError::io(csv_path, std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        }

        Ok(DriverSummary { front_end_failures })
    }

    #[instrument(skip(self, config), fields(file = %src_path.display()))]
    fn run_one(&mut self, src_path: &Path, config: &Config) -> Result<u32, HipifyError> {
        let job = TranslationJob::new(src_path, config);

        let original = fs::read(&job.src_path).map_err(|e| HipifyError::io(&job.src_path, e))?;
        fs::write(&job.tmp_path, &original).map_err(|e| HipifyError::io(&job.tmp_path, e))?;
        debug!(tmp = %job.tmp_path.display(), "copied source to working path");

        self.stats.activate(job.src_path.clone());

        let resource_dir = config.resource_dir.as_deref();

        let outcome = {
            let counters = self.stats.active_mut().expect("just activated");
            frontend::parse_and_rewrite(&job.tmp_path, &original, &self.tables, counters, resource_dir)?
        };
        info!(
            edits = outcome.edits.len(),
            diagnostics = outcome.diagnostics.len(),
            "front end run complete"
        );

        for diagnostic in &outcome.diagnostics {
            diagnostics::emit(diagnostic);
        }

        let rewritten = outcome.edits.apply(&original);

        if config.no_output {
            fs::remove_file(&job.tmp_path).map_err(|e| HipifyError::io(&job.tmp_path, e))?;
            debug!("discarded working copy (no-output)");
        } else {
            if config.in_place && !config.no_backup {
                fs::write(append_suffix(&job.src_path, BACKUP_SUFFIX), &original)
                    .map_err(|e| HipifyError::io(&job.src_path, e))?;
            }
            fs::write(&job.tmp_path, &rewritten).map_err(|e| HipifyError::io(&job.tmp_path, e))?;
            fs::rename(&job.tmp_path, &job.dst_path).map_err(|e| HipifyError::io(&job.dst_path, e))?;
            debug!(dst = %job.dst_path.display(), "wrote output");
        }

        Ok(u32::from(outcome.had_parse_errors))
    }

    fn print_stats(&self) {
        for (path, counters) in self.stats.files() {
            eprintln!(
                "{}: {} hits, {} lines touched, {} bytes changed",
                path.display(),
                counters.total_hits(),
                counters.touched_line_count(),
                counters.bytes_changed()
            );
        }
        let total = self.stats.aggregate();
        eprintln!(
            "TOTAL: {} hits, {} lines touched, {} bytes changed",
            total.total_hits(),
            total.touched_line_count(),
            total.bytes_changed()
        );
    }
}

