//! CLI `import-legacy` command: load the flat JSON files of the old layout.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::LaneConfig;
use crate::lane::legacy::load_legacy_dir;
use crate::lane::snapshot::restore_snapshot;

pub fn import_legacy(config: &LaneConfig, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let import = load_legacy_dir(dir)
        .with_context(|| format!("failed to read legacy files in {}", dir.display()))?;

    for warning in &import.warnings {
        eprintln!("Warning: {warning}");
    }

    let mut conn = super::open(config)?;
    println!(
        "Importing {} legacy records from {}...",
        import.snapshot.record_count(),
        dir.display()
    );
    let report = restore_snapshot(&mut conn, &import.snapshot)?;
    super::import::print_report(&report);

    if !import.warnings.is_empty() {
        println!("  {} records could not be converted (see warnings above)", import.warnings.len());
    }
    Ok(())
}
