use std::fmt;
use std::str::FromStr;

use dbinspect_core::InspectError;
use serde::{Deserialize, Serialize};

/// An inspection module, in the tool's canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    DbInfo,
    Parameters,
    Storage,
    Sessions,
    Security,
    Backup,
    Performance,
    Objects,
}

impl ModuleId {
    pub const ALL: [ModuleId; 8] = [
        ModuleId::DbInfo,
        ModuleId::Parameters,
        ModuleId::Storage,
        ModuleId::Sessions,
        ModuleId::Security,
        ModuleId::Backup,
        ModuleId::Performance,
        ModuleId::Objects,
    ];

    /// Section ID of this module.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleId::DbInfo => "dbinfo",
            ModuleId::Parameters => "parameters",
            ModuleId::Storage => "storage",
            ModuleId::Sessions => "sessions",
            ModuleId::Security => "security",
            ModuleId::Backup => "backup",
            ModuleId::Performance => "performance",
            ModuleId::Objects => "objects",
        }
    }

    /// Section heading of this module.
    pub fn title(self) -> &'static str {
        match self {
            ModuleId::DbInfo => "Database Information",
            ModuleId::Parameters => "Parameters",
            ModuleId::Storage => "Storage",
            ModuleId::Sessions => "Sessions",
            ModuleId::Security => "Security",
            ModuleId::Backup => "Backup and Recovery",
            ModuleId::Performance => "Performance",
            ModuleId::Objects => "Objects",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "params" {
            return Ok(ModuleId::Parameters);
        }
        ModuleId::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| InspectError::UnknownModule {
                name: s.to_string(),
            })
    }
}
