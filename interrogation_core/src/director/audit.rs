//! Audit records - one text dump per generated turn.

use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::config::AuditConfig;
use crate::error::AuditError;

/// Characters of the utterance kept in a dump file name.
const FILE_HEAD_CHARS: usize = 18;

/// Suffixed names tried before a dump is given up.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Everything that went into and came out of one generated turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub timestamp: DateTime<Utc>,
    pub player_text: String,
    pub transcript: String,
    pub prompt: String,
    /// `None` when the backend failed.
    pub raw_response: Option<String>,
    pub sanitized_response: String,
}

impl TurnRecord {
    /// Render the record as sectioned text.
    pub fn to_dump_string(&self, include_transcript: bool) -> String {
        let mut dump = String::new();

        push_section(&mut dump, "Timestamp", &self.timestamp.to_rfc3339());
        push_section(&mut dump, "Player", &self.player_text);
        if include_transcript {
            push_section(&mut dump, "Transcript (recent)", &self.transcript);
        }
        push_section(&mut dump, "Prompt", &self.prompt);
        push_section(
            &mut dump,
            "Response (raw)",
            self.raw_response.as_deref().unwrap_or_default(),
        );
        push_section(&mut dump, "Response (post-processed)", &self.sanitized_response);

        dump
    }
}

fn push_section(dump: &mut String, title: &str, body: &str) {
    dump.push_str(&format!("=== {} ===\n{}\n\n", title, body));
}

/// Append-only destination for turn records.
pub trait AuditSink: Send + Sync {
    /// Store a record. Returns where it was written, if that is a path.
    fn record(&self, record: &TurnRecord) -> Result<Option<PathBuf>, AuditError>;
}

/// Writes each record to its own UTF-8 file in a directory.
#[derive(Debug)]
pub struct FileAuditSink {
    dir: PathBuf,
    include_transcript: bool,
    last_path: Mutex<Option<PathBuf>>,
}

impl FileAuditSink {
    pub fn new(dir: impl Into<PathBuf>, include_transcript: bool) -> Self {
        Self {
            dir: dir.into(),
            include_transcript,
            last_path: Mutex::new(None),
        }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(config.dump_dir.clone(), config.include_transcript)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recent dump.
    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().ok().and_then(|path| path.clone())
    }

    /// `<timestamp>_<utterance head>_turn.txt`
    pub fn file_name(record: &TurnRecord) -> String {
        let stamp = record.timestamp.format("%Y%m%d_%H%M%S_%3f");
        format!("{}_{}_turn.txt", stamp, file_safe_head(&record.player_text))
    }

    /// Create a fresh dump file, adding `_<n>` before the extension when
    /// a file of the same name already exists.
    fn create_unique(&self, record: &TurnRecord) -> Result<(PathBuf, File), AuditError> {
        let name = Self::file_name(record);
        let stem = name.trim_end_matches(".txt");

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = match attempt {
                0 => self.dir.join(&name),
                n => self.dir.join(format!("{}_{}.txt", stem, n)),
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AuditError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free dump file name for {}", name),
        )))
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, record: &TurnRecord) -> Result<Option<PathBuf>, AuditError> {
        std::fs::create_dir_all(&self.dir)?;
        let (path, mut file) = self.create_unique(record)?;
        file.write_all(record.to_dump_string(self.include_transcript).as_bytes())?;
        debug!(path = %path.display(), "Turn dump written");

        if let Ok(mut last) = self.last_path.lock() {
            *last = Some(path.clone());
        }
        Ok(Some(path))
    }
}

fn file_safe_head(text: &str) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    let flat = flat.trim();
    if flat.is_empty() {
        return "empty".to_string();
    }
    flat.chars()
        .take(FILE_HEAD_CHARS)
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(player_text: &str) -> TurnRecord {
        TurnRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 45).unwrap(),
            player_text: player_text.to_string(),
            transcript: "刑事: 前の質問\nシグレ: 前の回答".to_string(),
            prompt: "PROMPT".to_string(),
            raw_response: Some("RAW".to_string()),
            sanitized_response: "CLEAN".to_string(),
        }
    }

    #[test]
    fn test_dump_sections_in_order() {
        let dump = record("君の名前は？").to_dump_string(true);

        let order = [
            "=== Timestamp ===",
            "=== Player ===\n君の名前は？",
            "=== Transcript (recent) ===",
            "=== Prompt ===\nPROMPT",
            "=== Response (raw) ===\nRAW",
            "=== Response (post-processed) ===\nCLEAN",
        ];
        let positions: Vec<_> = order.iter().map(|s| dump.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_dump_without_transcript() {
        let dump = record("x").to_dump_string(false);
        assert!(!dump.contains("Transcript"));
    }

    #[test]
    fn test_failed_response_dumps_empty_raw() {
        let mut failed = record("x");
        failed.raw_response = None;

        assert!(failed.to_dump_string(false).contains("=== Response (raw) ===\n\n"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            FileAuditSink::file_name(&record("君は誰だ?\nなぜここに")),
            "20250301_123045_000_君は誰だ_ なぜここに_turn.txt"
        );
        assert_eq!(
            FileAuditSink::file_name(&record("  ")),
            "20250301_123045_000_empty_turn.txt"
        );
    }

    #[test]
    fn test_file_name_head_is_shortened() {
        let name = FileAuditSink::file_name(&record(&"あ".repeat(40)));
        assert!(name.contains(&format!("_{}_turn.txt", "あ".repeat(18))));
    }

    #[test]
    fn test_file_sink_writes_dump() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileAuditSink::new(dir.path().join("dumps"), true);

        let path = sink.record(&record("君の名前は？")).unwrap().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("=== Prompt ===\nPROMPT"));
        assert_eq!(sink.last_path(), Some(path));
    }

    #[test]
    fn test_file_sink_keeps_same_named_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileAuditSink::new(dir.path(), false);

        let mut second = record("君の名前は？");
        second.sanitized_response = "SECOND".to_string();

        let first_path = sink.record(&record("君の名前は？")).unwrap().unwrap();
        let second_path = sink.record(&second).unwrap().unwrap();
        let third_path = sink.record(&second).unwrap().unwrap();

        assert_ne!(first_path, second_path);
        assert!(second_path.ends_with("20250301_123045_000_君の名前は？_turn_1.txt"));
        assert!(third_path.ends_with("20250301_123045_000_君の名前は？_turn_2.txt"));
        assert!(std::fs::read_to_string(&first_path).unwrap().contains("CLEAN"));
        assert!(std::fs::read_to_string(&second_path).unwrap().contains("SECOND"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_file_sink_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let sink = FileAuditSink::new(&blocker, false);
        assert!(matches!(sink.record(&record("x")), Err(AuditError::Io(_))));
        assert!(sink.last_path().is_none());
    }
}
