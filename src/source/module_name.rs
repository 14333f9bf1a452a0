use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A Fortran module identifier.
///
/// Fortran names are case-insensitive, so the name is folded to lower case on
/// construction and equality/ordering work on the folded form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// Returns `None` for names that are empty after trimming.
    pub fn new(name: &str) -> Option<Self> {
        let folded = name.trim().to_lowercase();
        if folded.is_empty() {
            None
        } else {
            Some(Self(folded))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ModuleName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ModuleName::new(&raw)
            .ok_or_else(|| serde::de::Error::custom("module name must not be empty"))
    }
}
