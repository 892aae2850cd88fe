//! Package manager identifiers.

use std::fmt;
use std::str::FromStr;

/// Identifier selecting the fetch, parse, check and update implementations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageManager {
    Bundler,
    /// pip, including pipenv and poetry.
    Pip,
    NpmAndYarn,
    Maven,
    Cargo,
    Hex,
    Composer,
    Submodules,
    Docker,
    /// Any identifier a registered helper understands.
    Other(String),
}

impl PackageManager {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bundler => "bundler",
            Self::Pip => "pip",
            Self::NpmAndYarn => "npm_and_yarn",
            Self::Maven => "maven",
            Self::Cargo => "cargo",
            Self::Hex => "hex",
            Self::Composer => "composer",
            Self::Submodules => "submodules",
            Self::Docker => "docker",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Ok(match name.as_str() {
            "bundler" => Self::Bundler,
            "pip" | "pipenv" => Self::Pip,
            "npm_and_yarn" | "npm" | "yarn" => Self::NpmAndYarn,
            "maven" => Self::Maven,
            "cargo" => Self::Cargo,
            "hex" => Self::Hex,
            "composer" => Self::Composer,
            "submodules" => Self::Submodules,
            "docker" => Self::Docker,
            _ => Self::Other(name),
        })
    }
}

impl From<&str> for PackageManager {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(package_manager) => package_manager,
            Err(never) => match never {},
        }
    }
}
