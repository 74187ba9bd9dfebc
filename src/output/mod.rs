pub mod formatter;

pub use formatter::{
    format_criteria, format_criterion_feedback, format_criterion_table, format_fraction,
    format_json, format_overall, format_report, format_rubric_table, format_tsv, format_weight,
    should_use_colors, unique_sorted,
};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::scoring::ScoringResult;

/// Save a JSON report atomically
///
/// Uses atomic-write-file so a reader never sees a half-written report.
pub fn save_report(path: &Path, result: &ScoringResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, result).context("Failed to serialize report")?;
    file.write_all(b"\n").context("Failed to write report")?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    Ok(())
}
