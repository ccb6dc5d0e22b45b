//! Session repository: history and theme over a key-value store.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};
use crate::models::{Generation, History, Theme};

/// Key holding the JSON-encoded history.
pub const HISTORY_KEY: &str = "iec-generations";
/// Key holding the literal `"dark"` or `"light"`.
pub const THEME_KEY: &str = "iec-theme";
/// Version written into the history envelope.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Everything restored at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub theme: Theme,
    pub history: History,
}

/// Durable state of the session: history and theme.
///
/// Loads never fail; unreadable data falls back to defaults.
pub trait SessionRepository {
    fn load_theme(&self) -> Theme;

    fn load_history(&self) -> History;

    /// Overwrite the stored history with `history`.
    fn save_history(&self, history: &History) -> Result<(), StorageError>;

    fn save_theme(&self, theme: Theme) -> Result<(), StorageError>;

    /// Read theme and history in one go.
    fn load(&self) -> PersistedSession {
        PersistedSession {
            theme: self.load_theme(),
            history: self.load_history(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryEnvelopeRef<'a> {
    version: u32,
    generations: &'a History,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    version: u32,
    generations: Vec<Value>,
}

/// A stored record before its timestamp is reconstructed.
#[derive(Debug, Deserialize)]
struct RawGeneration {
    id: String,
    prompt: String,
    code: String,
    timestamp: Value,
}

/// Parse a timestamp flexibly from various formats.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }

            // SQLite-style "YYYY-MM-DD HH:MM:SS[.SSS]"
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        }
        // Epoch milliseconds
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_record(value: Value) -> Option<Generation> {
    let raw: RawGeneration = serde_json::from_value(value).ok()?;
    if raw.prompt.trim().is_empty() {
        return None;
    }
    let timestamp = parse_timestamp(&raw.timestamp)?;

    Some(Generation {
        id: raw.id,
        prompt: raw.prompt,
        code: raw.code,
        timestamp,
    })
}

/// Decode a stored history value, dropping records that cannot be rebuilt.
///
/// Accepts the versioned envelope and the legacy bare array.
fn decode_history(raw: &str) -> Result<History, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let records = match value {
        Value::Array(records) => records,
        Value::Object(_) => {
            let envelope: HistoryEnvelope =
                serde_json::from_value(value).map_err(|e| e.to_string())?;
            if envelope.version > HISTORY_SCHEMA_VERSION {
                return Err(format!(
                    "unsupported history schema version {}",
                    envelope.version
                ));
            }
            envelope.generations
        }
        other => return Err(format!("expected array or object, found {other}")),
    };

    let total = records.len();
    let entries: Vec<Generation> = records.into_iter().filter_map(parse_record).collect();
    if entries.len() < total {
        debug!(dropped = total - entries.len(), "dropped unreadable history records");
    }

    Ok(History::from_entries(entries))
}

/// [`SessionRepository`] over any [`KeyValueStore`].
#[derive(Debug)]
pub struct KvSessionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvSessionRepository<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[allow(dead_code)]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> SessionRepository for KvSessionRepository<S> {
    fn load_theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(raw) => Theme::from_stored(raw.as_deref()),
            Err(e) => {
                warn!(error = %e, "failed to read theme");
                Theme::Light
            }
        }
    }

    fn load_history(&self) -> History {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return History::new(),
            Err(e) => {
                warn!(error = %e, "failed to read history");
                return History::new();
            }
        };

        decode_history(&raw).unwrap_or_else(|reason| {
            warn!(%reason, "failed to parse saved history");
            History::new()
        })
    }

    fn save_history(&self, history: &History) -> Result<(), StorageError> {
        let envelope = HistoryEnvelopeRef {
            version: HISTORY_SCHEMA_VERSION,
            generations: history,
        };
        let encoded = serde_json::to_string(&envelope)?;
        self.store.set(HISTORY_KEY, &encoded)
    }

    fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HISTORY_LIMIT;
    use crate::storage::{FileStore, MemoryStore};

    fn repo_with(entries: &[(&str, &str)]) -> KvSessionRepository<MemoryStore> {
        KvSessionRepository::new(MemoryStore::with_entries(entries.iter().copied()))
    }

    fn sample_history(n: usize) -> History {
        let mut history = History::new();
        for i in 0..n {
            history.push_front(Generation::new(format!("prompt {i}"), format!("code {i}")));
        }
        history
    }

    #[test]
    fn test_load_theme_exact_match() {
        assert_eq!(repo_with(&[(THEME_KEY, "dark")]).load_theme(), Theme::Dark);
        for raw in ["Dark", "", "light", "\"dark\""] {
            assert_eq!(repo_with(&[(THEME_KEY, raw)]).load_theme(), Theme::Light, "{raw:?}");
        }
        assert_eq!(repo_with(&[]).load_theme(), Theme::Light);
    }

    #[test]
    fn test_save_theme() {
        let repo = repo_with(&[]);
        repo.save_theme(Theme::Dark).unwrap();
        assert_eq!(repo.store().get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        repo.save_theme(Theme::Light).unwrap();
        assert_eq!(repo.store().get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_history_roundtrip() {
        for n in [0, 1, 5, HISTORY_LIMIT] {
            let repo = repo_with(&[]);
            let history = sample_history(n);
            repo.save_history(&history).unwrap();

            let loaded = repo.load_history();
            assert_eq!(loaded.len(), n);
            for (a, b) in history.iter().zip(loaded.iter()) {
                assert_eq!((&a.id, &a.prompt, &a.code), (&b.id, &b.prompt, &b.code));
            }
        }
    }

    #[test]
    fn test_saved_history_is_versioned() {
        let repo = repo_with(&[]);
        repo.save_history(&sample_history(2)).unwrap();

        let raw = repo.store().get(HISTORY_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], HISTORY_SCHEMA_VERSION);
        assert_eq!(value["generations"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_corrupt_history_loads_empty() {
        for raw in ["not json at all", "{\"version\": 1}", "42", "{"] {
            assert!(repo_with(&[(HISTORY_KEY, raw)]).load_history().is_empty(), "{raw:?}");
        }
        assert!(repo_with(&[]).load_history().is_empty());
    }

    #[test]
    fn test_legacy_array_loads() {
        let raw = r#"[
            {"id":"1700000000002","prompt":"pid","code":"B",
             "timestamp":"2023-11-14T22:13:20.002Z"},
            {"id":"1700000000001","prompt":"timer","code":"A",
             "timestamp":"2023-11-14T22:13:20.001Z"}
        ]"#;
        let history = repo_with(&[(HISTORY_KEY, raw)]).load_history();
        let ids: Vec<_> = history.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["1700000000002", "1700000000001"]);
    }

    #[test]
    fn test_bad_records_are_dropped_individually() {
        let raw = r#"{"version":1,"generations":[
            {"id":"a","prompt":"ok","code":"A","timestamp":"2024-05-01T10:00:00Z"},
            {"id":"b","prompt":"bad time","code":"B","timestamp":"yesterday"},
            {"id":"c","prompt":"no code","timestamp":"2024-05-01T09:00:00Z"},
            {"id":"d","prompt":"   ","code":"D","timestamp":"2024-05-01T08:00:00Z"},
            {"id":"e","prompt":"sqlite","code":"E","timestamp":"2024-05-01 07:00:00"},
            {"id":"f","prompt":"millis","code":"F","timestamp":1714546800000}
        ]}"#;
        let history = repo_with(&[(HISTORY_KEY, raw)]).load_history();
        let ids: Vec<_> = history.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["a", "e", "f"]);
    }

    #[test]
    fn test_future_schema_version_loads_empty() {
        let raw = r#"{"version":99,"generations":[
            {"id":"a","prompt":"ok","code":"A","timestamp":"2024-05-01T10:00:00Z"}
        ]}"#;
        assert!(repo_with(&[(HISTORY_KEY, raw)]).load_history().is_empty());
    }

    #[test]
    fn test_oversized_history_is_truncated() {
        let records: Vec<_> = (0..15)
            .map(|i| {
                serde_json::json!({
                    "id": i.to_string(),
                    "prompt": format!("p{i}"),
                    "code": "c",
                    "timestamp": "2024-05-01T10:00:00Z",
                })
            })
            .collect();
        let raw = serde_json::to_string(&records).unwrap();
        let history = repo_with(&[(HISTORY_KEY, raw.as_str())]).load_history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.entries()[0].id, "0");
    }

    #[test]
    fn test_file_backed_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = KvSessionRepository::new(FileStore::in_dir(dir.path()).unwrap());
        let history = sample_history(3);
        repo.save_history(&history).unwrap();
        repo.save_theme(Theme::Dark).unwrap();

        let reopened = KvSessionRepository::new(FileStore::in_dir(dir.path()).unwrap());
        let persisted = reopened.load();
        assert_eq!(persisted.theme, Theme::Dark);
        assert_eq!(persisted.history, history);
    }

    #[test]
    fn test_saved_empty_history_reloads_empty() {
        let repo = repo_with(&[(HISTORY_KEY, "{\"version\":99,\"generations\":[]}")]);
        repo.save_history(&History::new()).unwrap();

        let raw = repo.store().get(HISTORY_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"version":1,"generations":[]}"#);
        assert!(repo.load_history().is_empty());
    }
}
