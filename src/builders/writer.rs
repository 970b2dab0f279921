use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::builders::specifier::Specifier;

/// Separator between the hand-maintained section of a requirements file and
/// the section owned by this tool. Everything before the first occurrence
/// survives a regeneration verbatim, everything after it is rewritten.
///
/// The exact bytes matter: files generated by earlier runs are split on this
/// string, so it must never change.
pub const CUSTOM_AUTO_SEPARATOR: &str = "
# --- END OF CUSTOM SECTION ---
# The following was generated by 'tox -e deps', DO NOT EDIT MANUALLY!
";

/// Returns the custom region of an existing requirements file.
///
/// A file without the separator (hand-created or from before this tool) has
/// no custom region, its whole content is considered stale.
pub fn custom_region(existing: &str) -> &str {
    match existing.split_once(CUSTOM_AUTO_SEPARATOR) {
        Some((custom, _)) => custom,
        None => "",
    }
}

/// Renders the full file: custom region verbatim, the separator, then the
/// entries newline-joined with a trailing newline.
pub fn render(custom: &str, specifiers: &[Specifier]) -> String {
    let joined = specifiers
        .iter()
        .map(Specifier::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{custom}{CUSTOM_AUTO_SEPARATOR}{joined}\n")
}

/// Destination for generated requirements lists.
///
/// A logical name like `base` resolves to a `base.in` target. The sink also
/// hands back the current contents so the engine can preserve the custom
/// region across regenerations.
pub trait OutputSink {
    /// Current contents of `<name>.in`, `None` when the target is absent.
    fn read_existing(&self, name: &str) -> Result<Option<String>>;

    /// Unconditionally overwrites `<name>.in` with `contents`.
    fn write(&mut self, name: &str, contents: &str) -> Result<()>;

    /// Human-readable location of `<name>.in` for console messages.
    fn describe(&self, name: &str) -> String;

    /// Last modification time of the target, when the sink can know it.
    fn modified(&self, name: &str) -> Result<Option<SystemTime>>;
}

/// Writes `.in` files into a directory. This is the sink every command uses
/// outside of tests and dry runs.
pub struct FileSink {
    out_dir: PathBuf,
}

impl FileSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn target_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.in"))
    }
}

impl OutputSink for FileSink {
    fn read_existing(&self, name: &str) -> Result<Option<String>> {
        let path = self.target_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(text))
    }

    fn write(&mut self, name: &str, contents: &str) -> Result<()> {
        let path = self.target_path(name);
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn describe(&self, name: &str) -> String {
        self.target_path(name).display().to_string()
    }

    fn modified(&self, name: &str) -> Result<Option<SystemTime>> {
        let path = self.target_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let metadata = fs::metadata(&path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        Ok(metadata.modified().ok())
    }
}

/// In-memory sink backed by a map, used by the tests.
pub struct MemorySink {
    files: HashMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for MemorySink {
    fn read_existing(&self, name: &str) -> Result<Option<String>> {
        Ok(self.files.get(name).cloned())
    }

    fn write(&mut self, name: &str, contents: &str) -> Result<()> {
        self.files.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn describe(&self, name: &str) -> String {
        format!("{name}.in")
    }

    fn modified(&self, _name: &str) -> Result<Option<SystemTime>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_region_split_on_first_marker() {
        let text = format!("custom\n{CUSTOM_AUTO_SEPARATOR}auto{CUSTOM_AUTO_SEPARATOR}tail");
        assert_eq!(custom_region(&text), "custom\n");
    }

    #[test]
    fn test_no_marker_means_no_custom_region() {
        assert_eq!(custom_region("just some text\n"), "");
    }

    #[test]
    fn test_render_joins_with_trailing_newline() {
        let specs = vec![Specifier::new("foo==1.0"), Specifier::new("bar")];
        let rendered = render("# mine\n", &specs);
        assert_eq!(rendered, format!("# mine\n{CUSTOM_AUTO_SEPARATOR}foo==1.0\nbar\n"));
    }

    #[test]
    fn test_render_then_split_round_trips_custom() {
        let specs = vec![Specifier::new("foo==1.0")];
        let rendered = render("keep me\n", &specs);
        assert_eq!(custom_region(&rendered), "keep me\n");
    }

    #[test]
    fn test_memory_sink_overwrites() {
        let mut sink = MemorySink::new();
        sink.write("base", "first").unwrap();
        sink.write("base", "second").unwrap();
        assert_eq!(sink.read_existing("base").unwrap().as_deref(), Some("second"));
        assert_eq!(sink.read_existing("nightly").unwrap(), None);
    }
}
