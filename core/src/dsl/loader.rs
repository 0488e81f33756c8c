//! Encounter definition loading
//!
//! One encounter per TOML file. Directories are scanned recursively for
//! `.toml` files.

use std::fs;
use std::path::{Path, PathBuf};

use super::{EncounterDefinition, EncounterError};

/// Encounter definition with the file it was read from
#[derive(Debug, Clone)]
pub struct EncounterWithPath {
    pub encounter: EncounterDefinition,
    pub file_path: PathBuf,
}

/// Parse an encounter from TOML text. `path` is only used for error reporting.
pub fn parse_encounter(content: &str, path: &Path) -> Result<EncounterDefinition, EncounterError> {
    let encounter: EncounterDefinition =
        toml::from_str(content).map_err(|source| EncounterError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
    encounter.validate()?;
    Ok(encounter)
}

/// Load and validate a single encounter file
pub fn load_encounter_file(path: &Path) -> Result<EncounterDefinition, EncounterError> {
    let content = fs::read_to_string(path).map_err(|source| EncounterError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_encounter(&content, path)
}

/// Load all encounter definitions from a directory (recursive).
///
/// A missing directory yields no encounters. The first unreadable or invalid
/// file aborts the load.
pub fn load_encounters_from_dir(dir: &Path) -> Result<Vec<EncounterWithPath>, EncounterError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut encounters = Vec::new();
    load_encounters_recursive(dir, &mut encounters)?;
    encounters.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    Ok(encounters)
}

fn load_encounters_recursive(
    dir: &Path,
    encounters: &mut Vec<EncounterWithPath>,
) -> Result<(), EncounterError> {
    let entries = fs::read_dir(dir).map_err(|source| EncounterError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            load_encounters_recursive(&path, encounters)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let encounter = load_encounter_file(&path)?;
            tracing::debug!(
                encounter = %encounter.info.id,
                path = %path.display(),
                "Loaded encounter definition"
            );
            encounters.push(EncounterWithPath {
                encounter,
                file_path: path,
            });
        }
    }

    Ok(())
}
