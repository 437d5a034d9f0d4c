use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Runtime or build strategy a bundle needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildKind {
    Node,
    Python,
    Shell,
    Image,
    /// The entity is deployed without a build step.
    None,
    View,
}

impl BuildKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Python => "python",
            Self::Shell => "shell",
            Self::Image => "image",
            Self::None => "none",
            Self::View => "view",
        }
    }

    /// Version used when a bundle does not pin one.
    pub fn default_version(self) -> Option<&'static str> {
        match self {
            Self::Node | Self::View => Some("18"),
            Self::Python => Some("3.10"),
            Self::Shell | Self::Image | Self::None => None,
        }
    }
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base image class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildBase {
    Full,
    Slim,
}

impl BuildBase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Slim => "slim",
        }
    }
}

impl fmt::Display for BuildBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value of a build-time environment variable.
///
/// Deserializes from any of these notations:
///
/// ```toml
/// API_URL = "https://example.com"
/// MODE = { value = "batch" }
/// DB_URL = { config = "db_url" }
/// ```
///
/// Both literal spellings produce [`EnvVarValue::Value`], so equality never
/// depends on how a value was written. Literals serialize back as plain
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnvVarValue {
    /// Literal value.
    Value(String),
    /// Name of a config entry or secret resolved at build time.
    Config(String),
}

impl EnvVarValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    pub fn config(name: impl Into<String>) -> Self {
        Self::Config(name.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Config(_) => None,
        }
    }

    /// Name of the referenced config or secret.
    pub fn as_config(&self) -> Option<&str> {
        match self {
            Self::Config(name) => Some(name),
            Self::Value(_) => None,
        }
    }
}

impl Serialize for EnvVarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_str(v),
            Self::Config(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("config", name)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for EnvVarValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Notation {
            Plain(String),
            Table(Table),
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "lowercase")]
        enum Table {
            Value(String),
            Config(String),
        }

        Ok(match Notation::deserialize(deserializer)? {
            Notation::Plain(v) | Notation::Table(Table::Value(v)) => Self::Value(v),
            Notation::Table(Table::Config(name)) => Self::Config(name),
        })
    }
}

/// What a bundle needs to be built.
///
/// Equality is structural over all four fields, with `env_vars` compared
/// as a whole: `{FOO: "1"}` never equals `{}` or `{FOO: "2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildRequirements {
    pub kind: BuildKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BuildBase>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_vars: BTreeMap<String, EnvVarValue>,
}

impl BuildRequirements {
    pub fn new(kind: BuildKind) -> Self {
        Self {
            kind,
            version: None,
            base: None,
            env_vars: BTreeMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_base(mut self, base: BuildBase) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: EnvVarValue) -> Self {
        self.env_vars.insert(name.into(), value);
        self
    }

    /// Replaces all env vars.
    pub fn with_env_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, EnvVarValue)>,
    {
        self.env_vars = vars.into_iter().collect();
        self
    }

    /// The pinned version, or the kind's default.
    pub fn version_or_default(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.kind.default_version())
    }
}
