//! Configuration management for netrules.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::RulesError;
use crate::params::DEFAULT_COMPOUND_SEPARATOR;
use crate::transcoder::MalformedLinePolicy;

/// Maximum size per fetched rule document (10 MB)
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/76.0.3809.100 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Maximum number of simultaneous in-flight requests
    pub concurrency: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum accepted response body size
    pub max_body_bytes: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Optional Referer header
    pub referer: Option<String>,

    /// Character replaced by `,` inside identifier parameter blocks
    pub compound_separator: char,

    /// What to do with a malformed domain/ipcidr line (abort, skip)
    pub on_malformed_line: MalformedLinePolicy,

    /// Named source lists for `merge --ruleset`
    pub rulesets: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: 5,
            timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: None,
            compound_separator: DEFAULT_COMPOUND_SEPARATOR,
            on_malformed_line: MalformedLinePolicy::Abort,
            rulesets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!(RulesError::Config(
                "concurrency must be at least 1".to_string()
            ));
        }

        if self.timeout_secs == 0 {
            anyhow::bail!(RulesError::Config(
                "timeout_secs must be at least 1".to_string()
            ));
        }

        if self.compound_separator.is_ascii_alphanumeric()
            || matches!(self.compound_separator, '&' | '=' | '?' | ',')
        {
            anyhow::bail!(RulesError::Config(format!(
                "invalid compound_separator '{}': must not be alphanumeric or one of & = ? ,",
                self.compound_separator
            )));
        }

        for (name, urls) in &self.rulesets {
            for url in urls {
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    anyhow::bail!(RulesError::Config(format!(
                        "ruleset '{}' URL must use HTTP(S): {}",
                        name, url
                    )));
                }
            }
        }

        Ok(())
    }

    /// Get the sources of a named ruleset
    pub fn ruleset(&self, name: &str) -> Option<&[String]> {
        self.rulesets.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.compound_separator, '!');
        assert_eq!(config.on_malformed_line, MalformedLinePolicy::Abort);
        assert!(config.rulesets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut config = Config::default();
        config.rulesets.insert(
            "proxy-cidr".to_string(),
            vec!["https://example.com/telegram-cidr.yaml".to_string()],
        );
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "concurrency: 2\non_malformed_line: skip\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.on_malformed_line, MalformedLinePolicy::Skip);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "concurrency: 3\nreferer: https://github.com/example\nrulesets:\n  direct:\n    - https://example.com/baidu.yaml\n    - https://example.com/zhihu.yaml"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.referer.as_deref(), Some("https://github.com/example"));
        assert_eq!(config.ruleset("direct").map(|r| r.len()), Some(2));
        assert!(config.ruleset("block").is_none());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "concurrency: [not a number").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/netrules.yaml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validation_zero_concurrency() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_error_kind() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RulesError>(),
            Some(RulesError::Config(_))
        ));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_separator() {
        for sep in ['a', '7', '&', '=', '?', ','] {
            let config = Config {
                compound_separator: sep,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "separator {:?} accepted", sep);
        }
    }

    #[test]
    fn test_validation_ruleset_scheme() {
        let mut config = Config::default();
        config
            .rulesets
            .insert("bad".to_string(), vec!["ftp://example.com/a.yaml".to_string()]);
        assert!(config.validate().is_err());
    }
}
