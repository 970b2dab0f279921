use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;

/// A struct that holds the status summary for a single generated file.
///
/// This provides a clean way to pass per-file data from the engine to the
/// `StatusReporter` without the reporter touching the filesystem itself.
#[derive(Debug)]
pub struct FileStatus {
    /// Logical list name, `base` or `nightly`.
    pub name: String,
    /// Where the sink resolves the file to.
    pub path: String,
    /// Whether the file exists at all.
    pub exists: bool,
    /// Whether the current contents match what `generate` would write now.
    pub up_to_date: bool,
    /// Number of lines in the preserved custom region.
    pub custom_lines: usize,
    /// Number of entries the auto-generated region would hold.
    pub generated_count: usize,
    /// Last filesystem modification, when the sink can know it.
    pub modified: Option<DateTime<Local>>,
}

pub trait StatusReporter {
    fn generate_status_report(&self, statuses: &[FileStatus]) -> Result<()>;
}

/// A concrete implementation of `StatusReporter` that prints the report to
/// the console. This is the primary reporter used by the `status` command.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_file_status(&self, status: &FileStatus) -> String {
        let headline = if !status.exists {
            format!("{} {} (not generated yet)", "✗".red().bold(), status.path)
        } else if status.up_to_date {
            format!("{} {}", "✓".green().bold(), status.path)
        } else {
            format!("{} {} (out of date)", "⚠".yellow().bold(), status.path)
        };

        let mut lines = vec![headline];
        lines.push(format!(
            "  ├─ {} generated entries, {} custom lines",
            status.generated_count, status.custom_lines
        ));
        match status.modified {
            Some(modified) => lines.push(format!(
                "  └─ last written {}",
                modified.format("%Y-%m-%d %H:%M")
            )),
            None => lines.push("  └─ never written".to_string()),
        }
        lines.join("\n")
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for ConsoleReporter {
    fn generate_status_report(&self, statuses: &[FileStatus]) -> Result<()> {
        for status in statuses {
            println!("{}", self.format_file_status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_marks_stale_files() {
        let reporter = ConsoleReporter::new();
        let status = FileStatus {
            name: "base".to_string(),
            path: "base.in".to_string(),
            exists: true,
            up_to_date: false,
            custom_lines: 2,
            generated_count: 5,
            modified: None,
        };
        let text = reporter.format_file_status(&status);
        assert!(text.contains("out of date"));
        assert!(text.contains("5 generated entries, 2 custom lines"));
    }

    #[test]
    fn test_format_marks_missing_files() {
        let reporter = ConsoleReporter::new();
        let status = FileStatus {
            name: "nightly".to_string(),
            path: "nightly.in".to_string(),
            exists: false,
            up_to_date: false,
            custom_lines: 0,
            generated_count: 3,
            modified: None,
        };
        let text = reporter.format_file_status(&status);
        assert!(text.contains("not generated yet"));
        assert!(text.contains("never written"));
    }
}
