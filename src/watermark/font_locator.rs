//! Finding font files by name.
//!
//! Settings usually name fonts the way desktop tools do (`arial.ttf`,
//! `simsun.ttc`) rather than by full path. A configured path is used as-is
//! when it exists; otherwise its file name is looked up among the installed
//! system fonts through `fontdb`.

use fontdb::{Database, FaceInfo, Source};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Resolves configured font paths against a font database.
///
/// The system font index is only built the first time a path does not exist
/// on its own.
#[derive(Default)]
pub struct FontLocator {
    database: OnceLock<Database>,
}

impl FontLocator {
    /// Locator backed by the fonts installed on this system.
    pub fn system() -> Self {
        Self::default()
    }

    /// Locator backed by an already populated database.
    pub fn with_database(database: Database) -> Self {
        Self {
            database: OnceLock::from(database),
        }
    }

    fn database(&self) -> &Database {
        self.database.get_or_init(|| {
            let mut database = Database::new();
            database.load_system_fonts();
            debug!(faces = database.len(), "System fonts indexed");
            database
        })
    }

    /// Path to load for `requested`.
    ///
    /// An existing path wins. Otherwise the file name is matched
    /// case-insensitively against the database, and a name without an
    /// extension also matches on the file stem. When nothing matches the
    /// requested path is returned unchanged so the load error names it.
    pub fn locate(&self, requested: &Path) -> PathBuf {
        if requested.exists() {
            return requested.to_path_buf();
        }

        let Some(name) = requested.file_name().and_then(OsStr::to_str) else {
            return requested.to_path_buf();
        };
        let match_stem = requested.extension().is_none();

        let found = self
            .database()
            .faces()
            .filter_map(|face| face_path(face).map(|path| (path, face.index)))
            .filter(|(path, _)| file_name_matches(path, name, match_stem))
            .min_by_key(|(_, index)| *index)
            .map(|(path, _)| path.to_path_buf());

        match found {
            Some(path) => {
                debug!(
                    requested = %requested.display(),
                    resolved = %path.display(),
                    "Font resolved from system fonts"
                );
                path
            }
            None => requested.to_path_buf(),
        }
    }
}

fn face_path(face: &FaceInfo) -> Option<&Path> {
    match &face.source {
        Source::File(path) | Source::SharedFile(path, _) => Some(path),
        Source::Binary(_) => None,
    }
}

fn file_name_matches(path: &Path, name: &str, match_stem: bool) -> bool {
    let equal = |candidate: Option<&OsStr>| {
        candidate
            .and_then(OsStr::to_str)
            .map_or(false, |candidate| candidate.eq_ignore_ascii_case(name))
    };
    equal(path.file_name()) || (match_stem && equal(path.file_stem()))
}
