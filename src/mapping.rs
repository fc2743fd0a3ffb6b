// 📇 Company Mapping
// Full counterparty name → short display name, in authoring order

use crate::error::{MergeError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Ordered, key-unique list of (full name, short name)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyMapping {
    entries: Vec<(String, String)>,
}

impl CompanyMapping {
    pub fn new() -> Self {
        CompanyMapping::default()
    }

    /// Load from a text file: one `Full Name - Short Name` entry per line
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MergeError::MappingUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mapping = CompanyMapping::parse(&content);
        debug!(path = %path.display(), entries = mapping.len(), "loaded company mapping");
        Ok(mapping)
    }

    /// Parse mapping text. Blank lines and `#` comments are ignored; the
    /// first `-` separates the two names.
    pub fn parse(content: &str) -> Self {
        let mut mapping = CompanyMapping::new();
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((full, short)) = line.split_once('-') else {
                warn!(line = line_num + 1, text = line, "mapping line has no '-' separator, skipped");
                continue;
            };

            let (full, short) = (full.trim(), short.trim());
            if full.is_empty() || short.is_empty() {
                warn!(line = line_num + 1, text = line, "mapping line has an empty name, skipped");
                continue;
            }

            mapping.insert(full, short);
        }

        mapping
    }

    /// A repeated key keeps its original position and takes the new value
    pub fn insert(&mut self, full: &str, short: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == full) {
            Some(entry) => entry.1 = short.to_string(),
            None => self.entries.push((full.to_string(), short.to_string())),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for CompanyMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut mapping = CompanyMapping::new();
        for (full, short) in iter {
            mapping.insert(full, short);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_lines() {
        let mapping = CompanyMapping::parse(
            "\u{feff}# counterparties\n\
             ООО \"Ромашка\" - Ромашка\n\
             \n\
             АО Вектор-Плюс - Вектор\n\
             no separator here\n\
             - orphan short\n\
             \tIP Petrov   -   Petrov  \n",
        );

        assert_eq!(
            mapping.entries(),
            &[
                ("ООО \"Ромашка\"".to_string(), "Ромашка".to_string()),
                ("АО Вектор".to_string(), "Плюс - Вектор".to_string()),
                ("IP Petrov".to_string(), "Petrov".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_key_keeps_position() {
        let mapping: CompanyMapping = [("Alpha", "A1"), ("Beta", "B"), ("Alpha", "A2")]
            .into_iter()
            .collect();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.entries()[0], ("Alpha".to_string(), "A2".to_string()));
        assert_eq!(mapping.entries()[1].0, "Beta");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Alpha Corp - ALPHA").unwrap();
        writeln!(file, "Alpha - A").unwrap();

        let mapping = CompanyMapping::from_file(file.path()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.entries()[0].1, "ALPHA");
    }

    #[test]
    fn test_missing_file() {
        let err = CompanyMapping::from_file("/nonexistent/companies.txt").unwrap_err();
        assert!(matches!(err, MergeError::MappingUnreadable { .. }));
    }
}
