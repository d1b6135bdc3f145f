// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire format identification.

use std::fmt;
use std::path::Path;

/// The two wire formats a model can be read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// The structured-text, XML-like tree format.
    Tree,
    /// The JSON format.
    Json,
}

impl Format {
    /// Sniffs the format from a file extension, recognizing `.rexs`/`.xml`
    /// as [`Format::Tree`] and `.rexsj`/`.json` as [`Format::Json`].
    pub fn from_extension(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "rexs" | "xml" => Some(Format::Tree),
            "rexsj" | "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Sniffs the format from the first non-whitespace byte of the document:
    /// `<` implies [`Format::Tree`], `{` implies [`Format::Json`].
    pub fn from_content(content: &str) -> Option<Format> {
        let first = content.trim_start().chars().next()?;
        match first {
            '<' => Some(Format::Tree),
            '{' => Some(Format::Json),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Tree => "tree",
            Format::Json => "json",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_by_extension() {
        assert_eq!(Format::from_extension(Path::new("model.rexs")), Some(Format::Tree));
        assert_eq!(Format::from_extension(Path::new("model.rexsj")), Some(Format::Json));
        assert_eq!(Format::from_extension(Path::new("model.txt")), None);
    }

    #[test]
    fn sniffs_by_content() {
        assert_eq!(Format::from_content("  <model/>"), Some(Format::Tree));
        assert_eq!(Format::from_content("{\"model\":{}}"), Some(Format::Json));
        assert_eq!(Format::from_content("garbage"), None);
    }
}
