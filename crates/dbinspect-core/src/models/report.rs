use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Widget;

/// One report section, produced from one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub widgets: Vec<Widget>,
    /// Human-readable summary of the failures inside this section, if any.
    pub error: Option<String>,
}

/// The complete output of one inspection run. Read-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    /// Description of the inspected database, e.g. `host:port/service`.
    pub target: String,
    /// Sections in the order the caller requested the modules.
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Sections that carry an error.
    pub fn failed_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.error.is_some())
    }
}
