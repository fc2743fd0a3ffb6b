// 📣 Reporting
// User-facing notices. Reporters observe the run; they never steer it.

use std::cell::RefCell;
use std::path::Path;

pub trait Reporter {
    /// A source file contributed nothing
    fn file_skipped(&self, file: &str, reason: &str);

    /// Every file was skipped; no output will be written
    fn no_data(&self);

    /// Output written successfully
    fn saved(&self, path: &Path, rows: usize);

    /// Output could not be written
    fn write_failed(&self, path: &Path, reason: &str);
}

/// Prints notices to the terminal
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn file_skipped(&self, file: &str, reason: &str) {
        eprintln!("⚠️  Skipping {}: {}", file, reason);
    }

    fn no_data(&self) {
        eprintln!("❌ No data collected from any file.");
    }

    fn saved(&self, path: &Path, rows: usize) {
        println!("✅ Saved {} rows to {}", rows, path.display());
    }

    fn write_failed(&self, path: &Path, reason: &str) {
        eprintln!("❌ Could not save {}: {}", path.display(), reason);
    }
}

/// One recorded notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Skipped { file: String, reason: String },
    NoData,
    Saved { path: String, rows: usize },
    WriteFailed { path: String, reason: String },
}

/// Keeps notices in memory; used by tests and embedding callers
#[derive(Debug, Default)]
pub struct CollectingReporter {
    notices: RefCell<Vec<Notice>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn skipped_files(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notice::Skipped { file, .. } => Some(file.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn file_skipped(&self, file: &str, reason: &str) {
        self.notices.borrow_mut().push(Notice::Skipped {
            file: file.to_string(),
            reason: reason.to_string(),
        });
    }

    fn no_data(&self) {
        self.notices.borrow_mut().push(Notice::NoData);
    }

    fn saved(&self, path: &Path, rows: usize) {
        self.notices.borrow_mut().push(Notice::Saved {
            path: path.display().to_string(),
            rows,
        });
    }

    fn write_failed(&self, path: &Path, reason: &str) {
        self.notices.borrow_mut().push(Notice::WriteFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        });
    }
}
