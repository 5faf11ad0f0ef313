//! File categories and the extension-to-category table.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Closed set of file categories.
///
/// Every extension maps to exactly one category; anything the table does
/// not recognize falls through to [`Category::Other`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Documents,
    Spreadsheets,
    Presentations,
    Images,
    Videos,
    Audio,
    Archives,
    Code,
    Web,
    Data,
    Executables,
    Fonts,
    Other,
}

impl Category {
    /// Folder name used when organizing by type.
    pub fn folder_name(&self) -> String {
        self.to_string()
    }
}

/// Immutable mapping from lowercase file extension (without the dot) to
/// [`Category`].
///
/// The default table covers the common extensions; tests and callers with
/// unusual layouts can build their own with [`CategoryTable::from_pairs`].
#[derive(Debug, Clone)]
pub struct CategoryTable {
    map: HashMap<String, Category>,
}

impl CategoryTable {
    /// Build a table from explicit (extension, category) pairs.
    ///
    /// Extensions are lowercased; a leading dot is stripped.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: AsRef<str>,
    {
        let map = pairs
            .into_iter()
            .map(|(ext, cat)| {
                (
                    ext.as_ref().trim_start_matches('.').to_ascii_lowercase(),
                    cat,
                )
            })
            .collect();
        Self { map }
    }

    /// Look up the category for an extension. Total: unknown or empty
    /// extensions map to [`Category::Other`].
    pub fn category_for(&self, extension: &str) -> Category {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        self.map.get(&key).copied().unwrap_or(Category::Other)
    }

    /// Look up the category for a path, using its extension.
    pub fn category_of(&self, path: &Path) -> Category {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.category_for(ext),
            None => Category::Other,
        }
    }

    /// Number of known extensions.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        use Category::*;

        let groups: &[(Category, &[&str])] = &[
            (Documents, &["pdf", "doc", "docx", "txt", "odt", "rtf", "tex"]),
            (Spreadsheets, &["xls", "xlsx", "csv", "ods"]),
            (Presentations, &["ppt", "pptx", "key", "odp"]),
            (
                Images,
                &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico"],
            ),
            (Videos, &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"]),
            (Audio, &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a"]),
            (Archives, &["zip", "rar", "7z", "tar", "gz", "bz2"]),
            (
                Code,
                &["py", "js", "java", "cpp", "c", "h", "cs", "php", "rb", "go", "rs"],
            ),
            (Web, &["html", "css", "scss", "sass", "less"]),
            (Data, &["json", "xml", "yaml", "yml", "toml", "ini", "cfg"]),
            (Executables, &["exe", "msi", "app", "dmg", "deb", "rpm"]),
            (Fonts, &["ttf", "otf", "woff", "woff2"]),
        ];

        let mut map = HashMap::new();
        for (category, extensions) in groups {
            for ext in *extensions {
                map.insert((*ext).to_string(), *category);
            }
        }
        Self { map }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use strum::IntoEnumIterator;

    #[test]
    fn test_known_extensions() {
        let table = CategoryTable::default();
        assert_eq!(table.category_for("pdf"), Category::Documents);
        assert_eq!(table.category_for("jpg"), Category::Images);
        assert_eq!(table.category_for("rs"), Category::Code);
        assert_eq!(table.category_for("woff2"), Category::Fonts);
    }

    #[test]
    fn test_lookup_is_total() {
        let table = CategoryTable::default();
        assert_eq!(table.category_for("xyz"), Category::Other);
        assert_eq!(table.category_for(""), Category::Other);
        assert_eq!(table.category_for("💾"), Category::Other);
    }

    #[test]
    fn test_case_and_dot_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.category_for("PDF"), Category::Documents);
        assert_eq!(table.category_for(".pdf"), Category::Documents);
    }

    #[test]
    fn test_category_of_path() {
        let table = CategoryTable::default();
        assert_eq!(
            table.category_of(&PathBuf::from("/tmp/report.pdf")),
            Category::Documents
        );
        assert_eq!(
            table.category_of(&PathBuf::from("/tmp/no_extension")),
            Category::Other
        );
    }

    #[test]
    fn test_custom_table() {
        let table = CategoryTable::from_pairs([("log", Category::Data)]);
        assert_eq!(table.category_for("log"), Category::Data);
        // Extensions the custom table does not know still resolve
        assert_eq!(table.category_for("pdf"), Category::Other);
    }

    #[test]
    fn test_folder_names_are_lowercase() {
        for category in Category::iter() {
            let name = category.folder_name();
            assert_eq!(name, name.to_ascii_lowercase());
        }
    }
}
