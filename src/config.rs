//! Configuration for gomap.
//!
//! Loaded from a YAML file; every key is optional. CLI flags override
//! whatever the file sets.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::analysis::ScanOptions;
use crate::error::ExtractError;
use crate::extract::ExtractOptions;
use crate::report::JsonStyle;

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["gomap.yaml", ".gomap.yaml"];

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("../web")
}

fn default_base_env() -> String {
    "GOPATH".to_string()
}

fn default_base_subdir() -> String {
    "src".to_string()
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Directory holding the companion web UI.
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
    /// Environment variable holding the package root, read per request.
    #[serde(default = "default_base_env")]
    pub base_env: String,
    /// Joined under the environment variable's value.
    #[serde(default = "default_base_subdir")]
    pub base_subdir: String,
    /// Fixed package root; overrides `base_env` when set.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Glob patterns for file names to skip (e.g. "*_test.go").
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub json_style: JsonStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            web_dir: default_web_dir(),
            base_env: default_base_env(),
            base_subdir: default_base_subdir(),
            base_dir: None,
            exclude: Vec::new(),
            json_style: JsonStyle::default(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. An empty document yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the explicit config file, or the first one discovered, or the
    /// defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::parse_file(path)
                .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e));
        }
        match discover() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                Self::parse_file(&path)
                    .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
            }
            None => Ok(Self::default()),
        }
    }

    /// Directory that package paths are resolved under.
    ///
    /// The environment variable is read on every call so a running server
    /// follows changes to it. An unset variable resolves relative to the
    /// working directory.
    pub fn base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.base_dir {
            return dir.clone();
        }
        let root = std::env::var_os(&self.base_env).unwrap_or_default();
        if root.is_empty() {
            tracing::warn!(var = %self.base_env, "environment variable not set");
        }
        PathBuf::from(root).join(&self.base_subdir)
    }

    /// Resolve a package path such as `github.com/user/repo/pkg` to a
    /// directory under `base_dir`.
    pub fn resolve_package(&self, name: &str) -> Result<PathBuf, ExtractError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ExtractError::InvalidPackagePath(name.to_string()));
        }
        Ok(self.base_dir().join(relative))
    }

    /// Extraction options derived from this config.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            scan: ScanOptions {
                exclude: self.exclude.clone(),
            },
            style: self.json_style,
        }
    }
}

/// Find a config file in the working directory, then the user config dir.
fn discover() -> Option<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Some(path);
        }
    }
    ProjectDirs::from("", "", "gomap")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
        .filter(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_str("").unwrap();
        assert_eq!(config.listen, "127.0.0.1:3000");
        assert_eq!(config.base_env, "GOPATH");
        assert_eq!(config.base_subdir, "src");
        assert_eq!(config.json_style, JsonStyle::Escaped);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
listen: "0.0.0.0:8080"
base_dir: /srv/go/src
exclude:
  - "*_test.go"
json_style: verbatim
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.base_dir, Some(PathBuf::from("/srv/go/src")));
        assert_eq!(config.exclude, vec!["*_test.go"]);
        assert_eq!(config.json_style, JsonStyle::Verbatim);
        // Unset keys keep their defaults.
        assert_eq!(config.web_dir, PathBuf::from("../web"));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(Config::parse_str("json_style: [not, a, style]").is_err());
    }

    #[test]
    fn test_base_dir_from_env() {
        let config = Config {
            base_env: "GOMAP_TEST_BASE_DIR_FROM_ENV".to_string(),
            ..Default::default()
        };
        std::env::set_var("GOMAP_TEST_BASE_DIR_FROM_ENV", "/opt/go");
        assert_eq!(config.base_dir(), PathBuf::from("/opt/go/src"));
        std::env::remove_var("GOMAP_TEST_BASE_DIR_FROM_ENV");
    }

    #[test]
    fn test_fixed_base_dir_wins() {
        let config = Config {
            base_dir: Some(PathBuf::from("/fixed")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_package("github.com/acme/geo").unwrap(),
            PathBuf::from("/fixed/github.com/acme/geo")
        );
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let config = Config {
            base_dir: Some(PathBuf::from("/fixed")),
            ..Default::default()
        };
        assert!(config.resolve_package("../etc").is_err());
        assert!(config.resolve_package("/etc/passwd").is_err());
        assert!(config.resolve_package("a/../../b").is_err());
        assert!(config.resolve_package("./geo").is_ok());
    }

    #[test]
    fn test_extract_options() {
        let config = Config {
            exclude: vec!["*_test.go".to_string()],
            json_style: JsonStyle::Verbatim,
            ..Default::default()
        };
        let options = config.extract_options();
        assert_eq!(options.scan.exclude, vec!["*_test.go"]);
        assert_eq!(options.style, JsonStyle::Verbatim);
    }
}
