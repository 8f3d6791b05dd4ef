use std::fs;
use std::path::Path;

use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::error::Result;
use crate::logger::GameLogger;

const LOGGER_SETTINGS: [&str; 4] = [
    "LogLevel=1",
    "FilePrinting=false",
    "ConsolePrinting=true",
    "ScreenPrinting=false",
];

/// Rewrite the game's `log.config` so every logger the recorder needs is enabled.
///
/// Sections of other loggers are kept as they are. A missing file is created.
pub fn configure_loggers<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} does not exist, creating it", path.display());
            String::new()
        }
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<&str> = content.lines().collect();
    let mut output = rewrite_log_config(&lines).join("\n");
    output.push('\n');
    fs::write(path, output)?;

    info!("Enabled game loggers in {}", path.display());
    Ok(())
}

/// Drop existing sections of the recorder's loggers and append fresh ones.
pub fn rewrite_log_config(lines: &[&str]) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len() + 5 * 7);
    let mut in_owned_section = false;

    for line in lines {
        if line.starts_with('[') {
            in_owned_section = GameLogger::iter().any(|logger| line.starts_with(logger.tag()));
        }
        if !in_owned_section {
            output.push((*line).to_string());
        }
    }

    for logger in GameLogger::iter() {
        output.push(logger.tag().to_string());
        output.extend(LOGGER_SETTINGS.iter().map(|s| s.to_string()));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_empty_config() {
        let output = rewrite_log_config(&[]);
        assert_eq!(output.len(), 7 * 5);
        assert_eq!(output[0], "[Power]");
        assert_eq!(output[1], "LogLevel=1");
        assert_eq!(output[3], "ConsolePrinting=true");
        assert_eq!(output[30], "[Rachelle]");
    }

    #[test]
    fn test_rewrite_replaces_owned_sections() {
        let input = [
            "[Power]",
            "LogLevel=5",
            "FilePrinting=true",
            "[Net]",
            "LogLevel=2",
            "[Bob]",
            "ConsolePrinting=false",
        ];
        let output = rewrite_log_config(&input);

        // The foreign section survives untouched, first.
        assert_eq!(output[0], "[Net]");
        assert_eq!(output[1], "LogLevel=2");
        assert!(!output.iter().any(|l| l == "LogLevel=5"));
        assert_eq!(output.iter().filter(|l| *l == "[Power]").count(), 1);
        assert_eq!(output.iter().filter(|l| *l == "[Bob]").count(), 1);
        assert_eq!(output.len(), 2 + 7 * 5);
    }

    #[test]
    fn test_configure_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.config");

        configure_loggers(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[Power]\nLogLevel=1\n"));
        assert!(content.contains("[LoadingScreen]\n"));
        assert!(content.ends_with("ScreenPrinting=false\n"));
    }

    #[test]
    fn test_configure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.config");
        fs::write(&path, "[Net]\nLogLevel=2\n").unwrap();

        configure_loggers(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        configure_loggers(&path).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("[Net]\nLogLevel=2\n[Power]\n"));
    }
}
