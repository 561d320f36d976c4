// src/crawl/stats.rs
// =============================================================================
// Counters and the error list for one mirror run.
//
// Nothing here aborts a run: every failure is appended to `errors` and the
// crawl carries on. The caller looks at the list afterwards.
// =============================================================================

use std::fmt;

// What went wrong for a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A directory listing page could not be fetched
    Listing,
    /// A local directory could not be created
    Directory,
    /// A file had no latest revision on its listing page
    LatestRevision,
    /// Neither download strategy returned content
    Download,
    /// Content was downloaded but could not be written
    Save,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Listing,
        ErrorKind::Directory,
        ErrorKind::LatestRevision,
        ErrorKind::Download,
        ErrorKind::Save,
    ];
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Listing => "listing error",
            ErrorKind::Directory => "directory error",
            ErrorKind::LatestRevision => "latest revision error",
            ErrorKind::Download => "download error",
            ErrorKind::Save => "save error",
        };
        f.write_str(label)
    }
}

// One recorded failure; `context` is the URL, path or name involved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub kind: ErrorKind,
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub directories_saved: usize,
    pub directories_skipped: usize,
    pub files_saved: usize,
    pub files_skipped: usize,
    /// Failures in the order they happened
    pub errors: Vec<RunError>,
}

impl RunStatistics {
    pub fn record(&mut self, kind: ErrorKind, context: impl Into<String>) {
        self.errors.push(RunError {
            kind,
            context: context.into(),
        });
    }

    // How many errors of one kind were recorded
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order() {
        let mut stats = RunStatistics::default();
        stats.record(ErrorKind::Download, "http://a");
        stats.record(ErrorKind::LatestRevision, "b.c");
        stats.record(ErrorKind::Download, "http://c");

        let contexts: Vec<&str> = stats.errors.iter().map(|e| e.context.as_str()).collect();
        assert_eq!(contexts, vec!["http://a", "b.c", "http://c"]);
        assert_eq!(stats.count(ErrorKind::Download), 2);
        assert_eq!(stats.count(ErrorKind::Save), 0);
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(ErrorKind::LatestRevision.to_string(), "latest revision error");
        assert_eq!(ErrorKind::Download.to_string(), "download error");
        assert_eq!(ErrorKind::Save.to_string(), "save error");
    }
}
