use crate::types::Error;
use serde::{Deserialize, Serialize};

pub const LEGACY_OVERLAP_VAR: &str = "STRIPE_OPTIONS_LEGACY_OVERLAP";
pub const LOG_ADVISORIES_VAR: &str = "STRIPE_OPTIONS_LOG_ADVISORIES";

/// What to do when a deprecated field and its successor both hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyOverlap {
    /// Follow each field's `tolerates_redundant` flag.
    #[default]
    PerField,
    EmitBoth,
    PreferSuccessor,
}

impl LegacyOverlap {
    pub fn parse(s: &str) -> Option<LegacyOverlap> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_field" => Some(LegacyOverlap::PerField),
            "emit_both" => Some(LegacyOverlap::EmitBoth),
            "prefer_successor" => Some(LegacyOverlap::PreferSuccessor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub legacy_overlap: LegacyOverlap,
    /// Emit each advisory through `log::warn!` as well as returning it.
    pub log_advisories: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            legacy_overlap: LegacyOverlap::PerField,
            log_advisories: true,
        }
    }
}

impl ProjectionConfig {
    pub fn quiet() -> ProjectionConfig {
        ProjectionConfig {
            log_advisories: false,
            ..ProjectionConfig::default()
        }
    }

    pub fn with_legacy_overlap(self, legacy_overlap: LegacyOverlap) -> ProjectionConfig {
        let mut result = self;
        result.legacy_overlap = legacy_overlap;
        result
    }

    /// Reads the configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<ProjectionConfig, Error> {
        dotenv::dotenv().ok();
        ProjectionConfig::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<ProjectionConfig, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ProjectionConfig::default();
        if let Some(v) = lookup(LEGACY_OVERLAP_VAR) {
            config.legacy_overlap =
                LegacyOverlap::parse(&v).ok_or_else(|| Error::InvalidFieldType {
                    field: LEGACY_OVERLAP_VAR.to_string(),
                    expected: "per_field, emit_both or prefer_successor".to_string(),
                })?;
        }
        if let Some(v) = lookup(LOG_ADVISORIES_VAR) {
            config.log_advisories = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(Error::InvalidFieldType {
                        field: LOG_ADVISORIES_VAR.to_string(),
                        expected: "a boolean".to_string(),
                    })
                }
            };
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ProjectionConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, ProjectionConfig::default());
        assert!(config.log_advisories);
    }

    #[test]
    fn reads_both_variables() {
        let config = ProjectionConfig::from_lookup(lookup_in(&[
            (LEGACY_OVERLAP_VAR, "Prefer_Successor"),
            (LOG_ADVISORIES_VAR, "off"),
        ]))
        .unwrap();
        assert_eq!(config.legacy_overlap, LegacyOverlap::PreferSuccessor);
        assert!(!config.log_advisories);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(ProjectionConfig::from_lookup(lookup_in(&[(LEGACY_OVERLAP_VAR, "strict")])).is_err());
        assert!(ProjectionConfig::from_lookup(lookup_in(&[(LOG_ADVISORIES_VAR, "maybe")])).is_err());
    }

    #[test]
    fn from_env_reads_process_environment() {
        std::env::set_var(LEGACY_OVERLAP_VAR, "prefer_successor");
        std::env::set_var(LOG_ADVISORIES_VAR, "no");
        let config = ProjectionConfig::from_env();
        std::env::remove_var(LEGACY_OVERLAP_VAR);
        std::env::remove_var(LOG_ADVISORIES_VAR);

        let config = config.unwrap();
        assert_eq!(config.legacy_overlap, LegacyOverlap::PreferSuccessor);
        assert!(!config.log_advisories);
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ProjectionConfig =
            serde_json::from_str(r#"{"legacy_overlap": "emit_both"}"#).unwrap();
        assert_eq!(
            config,
            ProjectionConfig::default().with_legacy_overlap(LegacyOverlap::EmitBoth)
        );
    }
}
