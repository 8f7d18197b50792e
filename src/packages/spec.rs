//! Package specifiers (`zod`, `zod@^3.22`, `@scope/pkg@1.0.0`).

use std::fmt;

/// A package name with an optional version requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    /// Package name, including any `@scope/` prefix.
    pub name: String,
    /// Version requirement, if one was given.
    pub version: Option<String>,
}

impl PackageSpec {
    /// Parse a specifier.
    ///
    /// The version separator is the first `@` after the leading scope
    /// marker, so aliased versions like `pkg@npm:other@1.0` keep their own
    /// `@`. An empty version is treated as absent.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let split_at = raw
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '@')
            .map(|(i, _)| i);

        match split_at {
            Some(i) => {
                let version = raw[i + 1..].trim();
                Self {
                    name: raw[..i].to_string(),
                    version: (!version.is_empty()).then(|| version.to_string()),
                }
            }
            None => Self {
                name: raw.to_string(),
                version: None,
            },
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
