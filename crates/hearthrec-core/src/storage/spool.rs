//! Local spool for games that could not be delivered.
//!
//! A spooled game is a file named `game_<startMillis>_<endMillis>.chl` holding
//! the raw compressed payload. Everything needed to retry the upload is
//! recovered from the name and the bytes, so no index is kept.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::spool::{EXTENSION, PREFIX};
use crate::error::{Error, Result};
use crate::game::GameRecord;

/// Location of a spooled game on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolHandle {
    path: PathBuf,
}

impl SpoolHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SpoolHandle),
    /// A game with the same identity is already spooled.
    AlreadySpooled(SpoolHandle),
}

/// File name of a spooled game.
pub fn spool_file_name(start_time: i64, end_time: i64) -> String {
    format!("{}_{}_{}.{}", PREFIX, start_time, end_time, EXTENSION)
}

/// Parse `(start_time, end_time)` back out of a spool file name.
pub fn parse_spool_file_name(name: &str) -> Result<(i64, i64)> {
    let invalid = || Error::InvalidSpoolName(name.to_string());

    let stem = name
        .strip_suffix(EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(invalid)?;
    let times = stem
        .strip_prefix(PREFIX)
        .and_then(|s| s.strip_prefix('_'))
        .ok_or_else(invalid)?;
    let (start, end) = times.split_once('_').ok_or_else(invalid)?;

    let start = start.parse().map_err(|_| invalid())?;
    let end = end.parse().map_err(|_| invalid())?;
    Ok((start, end))
}

#[derive(Debug, Clone)]
pub struct Spooler {
    dir: PathBuf,
}

impl Spooler {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a record's payload. Saving the same identity twice is a no-op.
    pub fn save(&self, record: &GameRecord) -> Result<SaveOutcome> {
        let name = spool_file_name(record.start_time, record.end_time);
        let path = self.dir.join(&name);
        let handle = SpoolHandle { path: path.clone() };

        if path.exists() {
            info!("Game {} is already spooled, skipping", name);
            return Ok(SaveOutcome::AlreadySpooled(handle));
        }

        fs::create_dir_all(&self.dir)?;

        // Write under a name the listing ignores, then move into place.
        let part = self.dir.join(format!("{}.part", name));
        fs::write(&part, &record.payload)?;
        if let Err(e) = fs::rename(&part, &path) {
            let _ = fs::remove_file(&part);
            return Err(e.into());
        }

        info!("Saved game to {}", path.display());
        Ok(SaveOutcome::Saved(handle))
    }

    /// Every spooled game, oldest first.
    ///
    /// Mode and rank are not stored, so the records come back as `Unknown`.
    /// Unreadable or foreign files are logged and skipped.
    pub fn list_pending(&self) -> Vec<(GameRecord, SpoolHandle)> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to list spool directory {}: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut pending: Vec<(GameRecord, SpoolHandle)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                if !name.starts_with(PREFIX) || !name.ends_with(EXTENSION) {
                    return None;
                }
                let (start_time, end_time) = match parse_spool_file_name(&name) {
                    Ok(times) => times,
                    Err(e) => {
                        debug!("Ignoring spool file: {}", e);
                        return None;
                    }
                };
                match fs::read(&path) {
                    Ok(payload) => Some((
                        GameRecord::from_payload(payload, start_time, end_time),
                        SpoolHandle { path },
                    )),
                    Err(e) => {
                        warn!("Failed to read spooled game {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect();

        pending.sort_by_key(|(record, _)| (record.start_time, record.end_time));
        pending
    }

    /// Remove a spooled game. Returns whether the file is gone.
    ///
    /// A file that is already gone counts as deleted; any other failure is
    /// logged and the file stays for a later run.
    pub fn delete(&self, handle: &SpoolHandle) -> bool {
        match fs::remove_file(&handle.path) {
            Ok(()) => {
                info!("Deleted spooled game {}", handle.path.display());
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Spooled game {} was already deleted", handle.path.display());
                true
            }
            Err(e) => {
                warn!(
                    "Failed to delete spooled game {}: {}",
                    handle.path.display(),
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameMode;

    fn record(text: &str, start: i64, end: i64) -> GameRecord {
        GameRecord::from_text(text, start, end, GameMode::Arena, Some(4)).unwrap()
    }

    #[test]
    fn test_file_name_round_trip() {
        let name = spool_file_name(1_451_606_400_000, 1_451_607_000_000);
        assert_eq!(name, "game_1451606400000_1451607000000.chl");
        assert_eq!(
            parse_spool_file_name(&name).unwrap(),
            (1_451_606_400_000, 1_451_607_000_000)
        );
    }

    #[test]
    fn test_parse_invalid_names() {
        for name in [
            "game_1_2.txt",
            "game_1.chl",
            "game_a_2.chl",
            "match_1_2.chl",
            "game_1_2_3.chl",
            "game_1_2.chl.part",
        ] {
            assert!(
                matches!(parse_spool_file_name(name), Err(Error::InvalidSpoolName(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_save_list_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let spooler = Spooler::new(dir.path());
        let original = record("CREATE_GAME\n", 100, 200);

        let SaveOutcome::Saved(_) = spooler.save(&original).unwrap() else {
            panic!("expected a new spool file");
        };

        let pending = spooler.list_pending();
        assert_eq!(pending.len(), 1);
        let (restored, handle) = &pending[0];
        assert_eq!(restored.payload, original.payload);
        assert_eq!(restored.start_time, 100);
        assert_eq!(restored.end_time, 200);
        assert_eq!(restored.mode, GameMode::Unknown);
        assert_eq!(restored.rank, None);
        assert_eq!(handle.file_name(), "game_100_200.chl");

        assert!(spooler.delete(handle));
        assert!(spooler.list_pending().is_empty());
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let spooler = Spooler::new(dir.path());
        let first = record("first", 1, 2);
        let same_identity = record("different payload", 1, 2);

        spooler.save(&first).unwrap();
        let outcome = spooler.save(&same_identity).unwrap();

        assert!(matches!(outcome, SaveOutcome::AlreadySpooled(_)));
        let pending = spooler.list_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0.payload, first.payload);
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let spooler = Spooler::new(dir.path().join("nested").join("spool"));
        spooler.save(&record("x", 1, 2)).unwrap();
        assert_eq!(spooler.list_pending().len(), 1);
    }

    #[test]
    fn test_list_skips_foreign_files_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let spooler = Spooler::new(dir.path());
        spooler.save(&record("late", 300, 400)).unwrap();
        spooler.save(&record("early", 100, 200)).unwrap();
        fs::write(dir.path().join("game_100_200.chl.part"), b"partial").unwrap();
        fs::write(dir.path().join("game_x_y.chl"), b"junk").unwrap();
        fs::write(dir.path().join("notes.txt"), b"junk").unwrap();

        let pending = spooler.list_pending();
        let starts: Vec<i64> = pending.iter().map(|(r, _)| r.start_time).collect();
        assert_eq!(starts, vec![100, 300]);
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let spooler = Spooler::new(dir.path().join("does-not-exist"));
        assert!(spooler.list_pending().is_empty());
    }

    #[test]
    fn test_delete_twice_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let spooler = Spooler::new(dir.path());
        let SaveOutcome::Saved(handle) = spooler.save(&record("x", 1, 2)).unwrap() else {
            panic!("expected a new spool file");
        };

        assert!(spooler.delete(&handle));
        assert!(spooler.delete(&handle));
    }
}
