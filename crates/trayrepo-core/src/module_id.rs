//! Module identifiers (`owner~name~version`) and their Maven storage layout.

use std::fmt;
use std::str::FromStr;

/// Separator used in the string form of a module identifier.
pub const SEPARATOR: char = '~';

/// Immutable owner/name/version triple naming a distributable module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentifier {
    owner: String,
    name: String,
    version: String,
}

/// Error returned when a string is not a valid `owner~name~version`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid module identifier {0:?}: expected owner~name~version")]
pub struct ParseModuleIdError(String);

impl ModuleIdentifier {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Dotted namespace, e.g. `com.example`.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Object-store prefix for this module: `/<owner parts>/<name>/<version>/`.
    ///
    /// Each `.` in the owner becomes a path level, as in a Maven repository.
    pub fn storage_key(&self) -> String {
        let mut key = String::from("/");
        for part in self.owner.split('.') {
            key.push_str(part);
            key.push('/');
        }
        key.push_str(&self.name);
        key.push('/');
        key.push_str(&self.version);
        key.push('/');
        key
    }

    /// Key of the `maven-metadata.xml` descriptor published next to the artifact.
    pub fn metadata_key(&self) -> String {
        format!("{}maven-metadata.xml", self.storage_key())
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.owner,
            self.name,
            self.version,
            sep = SEPARATOR
        )
    }
}

impl FromStr for ModuleIdentifier {
    type Err = ParseModuleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        match parts.as_slice() {
            [owner, name, version]
                if !owner.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*owner, *name, *version))
            }
            _ => Err(ParseModuleIdError(s.to_string())),
        }
    }
}
