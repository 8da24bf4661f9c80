use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::{EpochMillis, UsageEvent, UsageEventKind, UsageSource};

/// A row that could not be read
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

/// Events read from CSV plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct UsageImport {
    pub events: Vec<UsageEvent>,
    pub errors: Vec<ImportError>,
}

/// Read usage events from CSV with the header `package,event,timestamp_ms`.
///
/// An empty package is kept as an anonymous event. Rows with a bad
/// timestamp are reported in `errors` and skipped. Events are returned
/// sorted by timestamp.
pub fn read_usage_csv<R: Read>(reader: R) -> Result<UsageImport> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut import = UsageImport::default();

    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                import.errors.push(ImportError {
                    line,
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };

        let package = record.get(0).unwrap_or("").trim();
        let kind = UsageEventKind::from_name(record.get(1).unwrap_or(""));
        let timestamp_ms: EpochMillis = match record.get(2).unwrap_or("").trim().parse() {
            Ok(ts) => ts,
            Err(e) => {
                import.errors.push(ImportError {
                    line,
                    error: format!("Invalid timestamp: {}", e),
                });
                continue;
            }
        };

        import.events.push(UsageEvent {
            package: (!package.is_empty()).then(|| package.to_string()),
            kind,
            timestamp_ms,
        });
    }

    import.events.sort_by_key(|e| e.timestamp_ms);
    Ok(import)
}

/// Usage source backed by a CSV export of platform events.
pub struct CsvUsageSource {
    path: PathBuf,
}

impl CsvUsageSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl UsageSource for CsvUsageSource {
    type Error = anyhow::Error;

    fn query_events(&self, start_ms: EpochMillis, end_ms: EpochMillis) -> Result<Vec<UsageEvent>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open usage events {}", self.path.display()))?;
        let import = read_usage_csv(file)?;

        for err in &import.errors {
            warn!(line = err.line, error = %err.error, "skipped usage event");
        }

        Ok(import
            .events
            .into_iter()
            .filter(|e| e.timestamp_ms >= start_ms && e.timestamp_ms <= end_ms)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_usage_csv() {
        let data = "package,event,timestamp_ms\n\
                    mail,paused,3000\n\
                    mail,resumed,1000\n\
                    ,resumed,1500\n\
                    chat,screen_on,2000\n";
        let import = read_usage_csv(data.as_bytes()).unwrap();

        assert!(import.errors.is_empty());
        assert_eq!(import.events.len(), 4);
        assert_eq!(import.events[0], UsageEvent::new("mail", UsageEventKind::Resumed, 1000));
        assert_eq!(import.events[1].package, None);
        assert_eq!(import.events[2].kind, UsageEventKind::Other);
        assert_eq!(import.events[3].kind, UsageEventKind::Paused);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let data = "package,event,timestamp_ms\nmail,resumed,soon\nmail,paused,10\n";
        let import = read_usage_csv(data.as_bytes()).unwrap();
        assert_eq!(import.events.len(), 1);
        assert_eq!(import.errors.len(), 1);
        assert_eq!(import.errors[0].line, 2);
    }
}
