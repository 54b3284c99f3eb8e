//! Static resources consumed by the deployed function
//!
//! [`ResourceBundle::load`] reads four files from a data directory: the
//! LinkedIn profile export (PDF), a summary and a communication-style note
//! (UTF-8 text) and a facts record (JSON object). Each read is isolated. A
//! failed read never escapes; the field takes its documented fallback value
//! and remembers why, so the bundle is always fully populated.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lopdf::Document;
use serde_json::{Map, Value};

use crate::ui;

pub const DOCUMENT_FILE: &str = "linkedin.pdf";
pub const SUMMARY_FILE: &str = "summary.txt";
pub const STYLE_FILE: &str = "style.txt";
pub const FACTS_FILE: &str = "facts.json";

pub const DOCUMENT_UNAVAILABLE: &str = "LinkedIn profile not available";
pub const SUMMARY_MISSING: &str = "Summary not available";
pub const SUMMARY_UNREADABLE: &str = "Summary could not be read";
pub const STYLE_MISSING: &str = "Communication style not available";
pub const STYLE_UNREADABLE: &str = "Communication style could not be read";

/// Identity placeholder used when `facts.json` is missing or malformed
pub fn fallback_facts() -> Map<String, Value> {
    let mut facts = Map::new();
    facts.insert("full_name".to_string(), Value::from("Unknown"));
    facts.insert("name".to_string(), Value::from("Unknown"));
    facts
}

/// Why a resource holds its fallback value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotFound,
    /// The file exists but could not be read (permissions, encoding, ...)
    Unreadable(String),
    /// The file was read but its content could not be parsed
    Malformed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::Unreadable(reason) => write!(f, "unreadable: {reason}"),
            Self::Malformed(reason) => write!(f, "malformed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Loaded,
    Fallback(FallbackReason),
}

/// A loaded value and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub value: T,
    pub origin: Origin,
    pub path: PathBuf,
}

impl<T> Resource<T> {
    fn loaded(path: PathBuf, value: T) -> Self {
        Self {
            value,
            origin: Origin::Loaded,
            path,
        }
    }

    fn fallback(path: PathBuf, value: T, reason: FallbackReason) -> Self {
        ui::warn(&format!(
            "Could not load {} ({reason}); using fallback",
            path.display()
        ));
        Self {
            value,
            origin: Origin::Fallback(reason),
            path,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match &self.origin {
            Origin::Loaded => None,
            Origin::Fallback(reason) => Some(reason),
        }
    }
}

/// The four resources, each resolved to real content or its fallback
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBundle {
    pub document: Resource<String>,
    pub summary: Resource<String>,
    pub style: Resource<String>,
    pub facts: Resource<Map<String, Value>>,
}

impl ResourceBundle {
    pub fn load(data_dir: &Path) -> Self {
        Self {
            document: load_document(&data_dir.join(DOCUMENT_FILE)),
            summary: load_text(&data_dir.join(SUMMARY_FILE), SUMMARY_MISSING, SUMMARY_UNREADABLE),
            style: load_text(&data_dir.join(STYLE_FILE), STYLE_MISSING, STYLE_UNREADABLE),
            facts: load_facts(&data_dir.join(FACTS_FILE)),
        }
    }

    /// Fields that fell back, as `(file name, reason)`
    pub fn fallbacks(&self) -> Vec<(&Path, &FallbackReason)> {
        [
            (&self.document.path, self.document.fallback_reason()),
            (&self.summary.path, self.summary.fallback_reason()),
            (&self.style.path, self.style.fallback_reason()),
            (&self.facts.path, self.facts.fallback_reason()),
        ]
        .into_iter()
        .filter_map(|(path, reason)| reason.map(|r| (path.as_path(), r)))
        .collect()
    }

    /// Display name from the facts record
    pub fn name(&self) -> &str {
        self.facts
            .value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, FallbackReason> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            FallbackReason::NotFound
        } else {
            FallbackReason::Unreadable(e.to_string())
        }
    })
}

/// Concatenate the text of every page in page order, skipping empty pages
fn load_document(path: &Path) -> Resource<String> {
    let parsed = read_bytes(path).and_then(|bytes| {
        let doc = Document::load_mem(&bytes)
            .map_err(|e| FallbackReason::Malformed(e.to_string()))?;
        extract_pages(&doc)
    });

    match parsed {
        Ok(text) => Resource::loaded(path.to_path_buf(), text),
        Err(reason) => Resource::fallback(path.to_path_buf(), DOCUMENT_UNAVAILABLE.to_string(), reason),
    }
}

fn extract_pages(doc: &Document) -> Result<String, FallbackReason> {
    let mut text = String::new();
    // BTreeMap keys are page numbers, already ordered
    for page_number in doc.get_pages().keys() {
        let page_text = doc
            .extract_text(&[*page_number])
            .map_err(|e| FallbackReason::Malformed(format!("page {page_number}: {e}")))?;
        if !page_text.is_empty() {
            text.push_str(&page_text);
        }
    }
    Ok(text)
}

fn load_text(path: &Path, missing: &str, unreadable: &str) -> Resource<String> {
    let text = read_bytes(path).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| FallbackReason::Unreadable(e.to_string()))
    });

    match text {
        Ok(text) => Resource::loaded(path.to_path_buf(), text),
        Err(FallbackReason::NotFound) => {
            Resource::fallback(path.to_path_buf(), missing.to_string(), FallbackReason::NotFound)
        }
        Err(reason) => Resource::fallback(path.to_path_buf(), unreadable.to_string(), reason),
    }
}

fn load_facts(path: &Path) -> Resource<Map<String, Value>> {
    let facts = read_bytes(path).and_then(|bytes| {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(FallbackReason::Malformed(
                "top-level value is not an object".to_string(),
            )),
            Err(e) => Err(FallbackReason::Malformed(e.to_string())),
        }
    });

    match facts {
        Ok(map) => Resource::loaded(path.to_path_buf(), map),
        Err(reason) => Resource::fallback(path.to_path_buf(), fallback_facts(), reason),
    }
}
