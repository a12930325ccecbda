//! Batch load configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Ordering applied to directory entries before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMethod {
    /// Keep the order the filesystem lists entries in
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Alphabetical (ASC)")]
    AlphabeticalAsc,
    #[serde(rename = "Alphabetical (DESC)")]
    AlphabeticalDesc,
    /// By the first run of digits in the name
    #[serde(rename = "Numerical (ASC)")]
    NumericalAsc,
    #[serde(rename = "Numerical (DESC)")]
    NumericalDesc,
    /// By last-modified time
    #[serde(rename = "Datetime (ASC)")]
    DatetimeAsc,
    #[serde(rename = "Datetime (DESC)")]
    DatetimeDesc,
}

/// A sort label that names none of the [`SortMethod`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort method '{0}'")]
pub struct ParseSortMethodError(pub String);

impl SortMethod {
    /// Every method, in the order the host lists them.
    pub const ALL: [SortMethod; 7] = [
        SortMethod::None,
        SortMethod::AlphabeticalAsc,
        SortMethod::AlphabeticalDesc,
        SortMethod::NumericalAsc,
        SortMethod::NumericalDesc,
        SortMethod::DatetimeAsc,
        SortMethod::DatetimeDesc,
    ];

    /// The label the host displays and sends back.
    pub fn label(&self) -> &'static str {
        match self {
            SortMethod::None => "None",
            SortMethod::AlphabeticalAsc => "Alphabetical (ASC)",
            SortMethod::AlphabeticalDesc => "Alphabetical (DESC)",
            SortMethod::NumericalAsc => "Numerical (ASC)",
            SortMethod::NumericalDesc => "Numerical (DESC)",
            SortMethod::DatetimeAsc => "Datetime (ASC)",
            SortMethod::DatetimeDesc => "Datetime (DESC)",
        }
    }

    /// All labels, for dropdowns.
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|m| m.label().to_string()).collect()
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMethod {
    type Err = ParseSortMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| ParseSortMethodError(s.to_string()))
    }
}

/// Parameters for one batch load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchLoadOptions {
    /// Directory to scan (not recursive).
    pub directory: PathBuf,
    /// Maximum number of images to return; 0 means unlimited.
    pub image_load_cap: usize,
    /// Entries to drop from the front of the sorted list; negative keeps a suffix.
    pub start_index: i64,
    /// Ask the host to re-run the load on every step.
    pub load_always: bool,
    /// Entry ordering.
    pub sort_method: SortMethod,
}

impl BatchLoadOptions {
    /// Options for `directory` with every other setting at its default.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Set the load cap (0 = unlimited).
    pub fn with_load_cap(mut self, cap: usize) -> Self {
        self.image_load_cap = cap;
        self
    }

    /// Set the start index.
    pub fn with_start_index(mut self, start_index: i64) -> Self {
        self.start_index = start_index;
        self
    }

    /// Set the always-reload flag.
    pub fn with_load_always(mut self, load_always: bool) -> Self {
        self.load_always = load_always;
        self
    }

    /// Set the sort method.
    pub fn with_sort_method(mut self, sort_method: SortMethod) -> Self {
        self.sort_method = sort_method;
        self
    }

    /// The effective cap, `None` when unlimited.
    pub fn load_cap(&self) -> Option<usize> {
        (self.image_load_cap > 0).then_some(self.image_load_cap)
    }
}
