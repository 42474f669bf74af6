//! Artifact naming and phase directory lifecycle.
//!
//! Every persisted artifact follows `{vesselTag}_{locationTag}_{phaseTag}[_{caseId}].{ext}`,
//! with tags sanitized for the filesystem. Phase directories are recreated
//! destructively at the start of the phase that owns them, before any artifact
//! of that phase is written, so repeated runs never accumulate stale files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Input workbook, expected in the working directory.
pub const INPUT_FILE: &str = "Input.xlsx";

/// Owned by the Model Builder; also receives the intact dynamic artifacts.
pub const INTACT_DIR: &str = "INTACT";

/// Owned by the Case Generator's damage loop.
pub const DAMAGE_DIR: &str = "DAMAGE";

/// Result tables from both post-processors.
pub const OUTPUT_DIR: &str = "OUTPUT";

/// Per-case success/failure ledger written by the Case Generator.
pub const LEDGER_FILE: &str = "cases_ledger.json";

const INVALID_FILENAME_CHARS: &str = "<>:\"/\\|?* ";

/// Strip the characters that are invalid in artifact file names, keeping
/// everything else in its original order.
pub fn filename_valid(name: &str) -> String {
    name.chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(*c))
        .collect()
}

/// `{vesselTag}_{locationTag}` with both tags sanitized.
pub fn base_name(vessel_tag: &str, location_tag: &str) -> String {
    format!(
        "{}_{}",
        filename_valid(vessel_tag),
        filename_valid(location_tag)
    )
}

/// Case identifiers keep internal structure but spaces become underscores.
pub fn case_file_id(case_id: &str) -> String {
    case_id.replace(' ', "_")
}

/// Remove `dir` if present, then create it empty.
pub fn recreate_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

pub fn init_setup_path(root: &Path, base: &str) -> PathBuf {
    root.join(INTACT_DIR).join(format!("{base}_INIT_SETUP.yml"))
}

pub fn intact_statics_path(root: &Path, base: &str) -> PathBuf {
    root.join(INTACT_DIR)
        .join(format!("{base}_INTACT_STATICS.sim"))
}

pub fn intact_dynamics_path(root: &Path, base: &str, case_id: &str) -> PathBuf {
    root.join(INTACT_DIR).join(format!(
        "{base}_INTACT_DYNAMICS_{}.sim",
        case_file_id(case_id)
    ))
}

pub fn damage_dynamics_path(root: &Path, base: &str, case_id: &str) -> PathBuf {
    root.join(DAMAGE_DIR).join(format!(
        "{base}_DAMAGE_DYNAMICS_{}.sim",
        case_file_id(case_id)
    ))
}

pub fn ledger_path(root: &Path) -> PathBuf {
    root.join(LEDGER_FILE)
}

pub fn output_dir(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR)
}
