//! YAML configuration for batch verification.
//!
//! Two shapes are accepted. A bare list of log paths:
//!
//! ```yaml
//! - logs/device-a/logcat.txt
//! - logs/device-b/logcat.txt
//! ```
//!
//! or a mapping that also tunes the extractor and rules:
//!
//! ```yaml
//! paths:
//!   - logs/device-a/logcat.txt
//! extractor:
//!   strict: true
//! rules:
//!   preset: extended
//!   extra: [{ type: no_save_failures }]
//!   min_engagement_msec: 1000
//!   commerce:
//!     add_to_cart_more_than: 1
//! ```
//!
//! Relative paths resolve against the directory holding the config file.
//! Unknown keys are rejected rather than ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Result, VerifyError};
use crate::extract::ExtractorConfig;
use crate::rules::{CommerceExpectations, Rule, RulePreset, RuleSet, Thresholds};

/// Rule selection as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub preset: RulePreset,
    /// Rules added on top of the preset.
    pub extra: Vec<Rule>,
    pub fail_fast: bool,
    pub min_engagement_msec: f64,
    pub commerce: CommerceExpectations,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            preset: RulePreset::default(),
            extra: Vec::new(),
            fail_fast: false,
            min_engagement_msec: thresholds.min_engagement_msec,
            commerce: thresholds.commerce,
        }
    }
}

impl RulesConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_engagement_msec: self.min_engagement_msec,
            commerce: self.commerce.clone(),
        }
    }

    pub fn to_rule_set(&self) -> RuleSet {
        self.extra
            .iter()
            .fold(RuleSet::from_preset(self.preset), |set, rule| {
                set.with_rule(*rule)
            })
            .with_thresholds(self.thresholds())
            .with_fail_fast(self.fail_fast)
    }
}

/// Everything a batch run needs, passed explicitly to the verifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    pub paths: Vec<PathBuf>,
    pub extractor: ExtractorConfig,
    pub rules: RulesConfig,
}

impl VerifyConfig {
    /// Parse config text. Relative paths are joined onto `base_dir` when given.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Yaml`] for unparseable YAML and
    /// [`VerifyError::Config`] for values that cannot work.
    pub fn from_yaml_str(text: &str, base_dir: Option<&Path>) -> Result<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
        let mut config = match raw {
            serde_yaml::Value::Null => VerifyConfig::default(),
            paths @ serde_yaml::Value::Sequence(_) => VerifyConfig {
                paths: serde_yaml::from_value(paths)?,
                ..VerifyConfig::default()
            },
            mapping => serde_yaml::from_value(mapping)?,
        };

        if let Some(base) = base_dir {
            config.paths = config
                .paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Io`] when the file cannot be read, otherwise as
    /// [`VerifyConfig::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| VerifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().filter(|p| !p.as_os_str().is_empty());
        let config = Self::from_yaml_str(&text, base)?;
        tracing::debug!(config = ?path, paths = config.paths.len(), "loaded verify config");
        Ok(config)
    }

    /// Reject settings the extractor or rules cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.extractor.max_buffer_bytes == 0 {
            return Err(VerifyError::Config(
                "extractor.max_buffer_bytes must be greater than 0".to_string(),
            ));
        }
        let msec = self.rules.min_engagement_msec;
        if !msec.is_finite() || msec < 0.0 {
            return Err(VerifyError::Config(format!(
                "rules.min_engagement_msec must be a non-negative number, got {msec}"
            )));
        }
        Ok(())
    }
}
