//! Polling tailer over the game log file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::source::LineSource;

/// Follows a growing log file.
///
/// The file is reopened on every poll so a file that the game recreates is
/// picked up. When the file becomes shorter than the read position the
/// tailer starts over from the beginning.
pub struct LogTailer {
    path: PathBuf,
    position: u64,
    /// Bytes after the last newline, waiting for the rest of the line.
    pending: Vec<u8>,
}

impl LogTailer {
    /// Open the log file, creating it empty if it does not exist yet.
    ///
    /// Failing to find or create the file is the only fatal condition of the
    /// recorder and is reported as [`Error::LogSourceUnavailable`].
    pub fn open<P: AsRef<Path>>(path: P, from_end: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!("Log file {} not found, creating it", path.display());
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)
                .map_err(|source| Error::LogSourceUnavailable {
                    path: path.clone(),
                    source,
                })?;
        }

        let position = if from_end {
            fs::metadata(&path)
                .map_err(|source| Error::LogSourceUnavailable {
                    path: path.clone(),
                    source,
                })?
                .len()
        } else {
            0
        };

        debug!("Tailing {} from offset {}", path.display(), position);

        Ok(Self {
            path,
            position,
            pending: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    fn read_new_bytes(&mut self) -> Result<Vec<u8>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            // The game may be recreating the file; try again on the next poll.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let len = file.metadata()?.len();
        if len < self.position {
            info!(
                "Log file {} was truncated ({} < {}), reading from the start",
                self.path.display(),
                len,
                self.position
            );
            self.position = 0;
            self.pending.clear();
        }

        if len == self.position {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.position))?;
        let mut buf = Vec::with_capacity((len - self.position) as usize);
        file.take(len - self.position).read_to_end(&mut buf)?;
        self.position += buf.len() as u64;
        Ok(buf)
    }
}

impl LineSource for LogTailer {
    fn poll_lines(&mut self) -> Result<Vec<String>> {
        let bytes = self.read_new_bytes()?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        self.pending.extend_from_slice(&bytes);
        Ok(split_complete_lines(&mut self.pending))
    }
}

/// Drain every newline-terminated line out of `buf`, leaving the partial tail.
fn split_complete_lines(buf: &mut Vec<u8>) -> Vec<String> {
    let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
        return Vec::new();
    };

    let rest = buf.split_off(last_newline + 1);
    let complete = std::mem::replace(buf, rest);

    complete
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn test_split_complete_lines_keeps_partial_tail() {
        let mut buf = b"first\r\nsecond\nthi".to_vec();
        let lines = split_complete_lines(&mut buf);
        assert_eq!(lines, vec!["first", "second"]);
        assert_eq!(buf, b"thi");
    }

    #[test]
    fn test_split_without_newline() {
        let mut buf = b"partial".to_vec();
        assert!(split_complete_lines(&mut buf).is_empty());
        assert_eq!(buf, b"partial");
    }

    #[test]
    fn test_open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_log.txt");

        let tailer = LogTailer::open(&path, true).unwrap();
        assert!(path.exists());
        assert_eq!(tailer.position(), 0);
    }

    #[test]
    fn test_open_fails_when_file_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("output_log.txt");

        let result = LogTailer::open(&path, true);
        assert!(matches!(result, Err(Error::LogSourceUnavailable { .. })));
    }

    #[test]
    fn test_from_end_skips_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_log.txt");
        fs::write(&path, "old line\n").unwrap();

        let mut tailer = LogTailer::open(&path, true).unwrap();
        assert!(tailer.poll_lines().unwrap().is_empty());

        append(&path, "new line\n");
        assert_eq!(tailer.poll_lines().unwrap(), vec!["new line"]);
    }

    #[test]
    fn test_from_start_reads_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_log.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        let mut tailer = LogTailer::open(&path, false).unwrap();
        assert_eq!(tailer.poll_lines().unwrap(), vec!["one", "two"]);
        assert!(tailer.poll_lines().unwrap().is_empty());
    }

    #[test]
    fn test_partial_line_is_completed_later() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_log.txt");
        fs::write(&path, "").unwrap();

        let mut tailer = LogTailer::open(&path, false).unwrap();
        append(&path, "[Power] half");
        assert!(tailer.poll_lines().unwrap().is_empty());

        append(&path, " a line\n");
        assert_eq!(tailer.poll_lines().unwrap(), vec!["[Power] half a line"]);
    }

    #[test]
    fn test_truncated_file_is_read_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_log.txt");
        fs::write(&path, "first game line\nsecond game line\n").unwrap();

        let mut tailer = LogTailer::open(&path, false).unwrap();
        assert_eq!(tailer.poll_lines().unwrap().len(), 2);

        // Game restarted and rewrote its log.
        fs::write(&path, "fresh\n").unwrap();
        assert_eq!(tailer.poll_lines().unwrap(), vec!["fresh"]);
    }

    #[test]
    fn test_missing_file_during_poll_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_log.txt");
        fs::write(&path, "").unwrap();

        let mut tailer = LogTailer::open(&path, false).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(tailer.poll_lines().unwrap().is_empty());
    }
}
