//! Rule and validation options.
//!
//! All options are read-only during an adjudication pass. They deserialize
//! from JSON with every field optional:
//!
//! ```json
//! { "rules": { "build_policy": "any_owned", "paradox": "report", "max_sweeps": 64 },
//!   "validation": { "strictness": "lenient" } }
//! ```

use serde::{Deserialize, Serialize};

/// Where a power may build new units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPolicy {
    /// Owned home supply centers only.
    #[default]
    HomeOnly,
    /// Any owned supply center.
    AnyOwned,
    /// Any owned supply center, provided the power still owns a home center.
    AnyIfOneHomeOwned,
}

/// How convoy routes of a move are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvoyRouteRule {
    /// Only routes written into the move order count.
    ExplicitOnly,
    /// Routes are always searched; explicit routes are ignored.
    ImplicitOnly,
    /// Explicit routes when given, otherwise searched.
    #[default]
    Either,
}

/// What to do when resolution stalls on a convoy paradox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParadoxRule {
    /// Convoyed armies caught in the paradox do not move and do not cut support.
    #[default]
    Szykman,
    /// Leave the paradox unresolved and report it.
    Report,
}

/// How forgiving order validation is about mistyped units and coasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// A wrong unit type or coast rejects the order.
    #[default]
    Strict,
    /// A wrong unit type or coast is corrected and reported as a warning.
    Lenient,
}

/// Game-rule switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    pub build_policy: BuildPolicy,
    pub convoy_routes: ConvoyRouteRule,
    pub paradox: ParadoxRule,
    /// Stops the sweep loop after this many sweeps; unresolved orders are reported.
    pub max_sweeps: Option<usize>,
}

/// Order-parsing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub strictness: Strictness,
}

impl ValidationOptions {
    pub fn lenient() -> Self {
        ValidationOptions { strictness: Strictness::Lenient }
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }
}

/// Errors from loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("max_sweeps must be at least 1")]
    ZeroSweepCap,
}

/// Complete adjudicator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjudicatorConfig {
    pub rules: RuleOptions,
    pub validation: ValidationOptions,
}

impl AdjudicatorConfig {
    /// Parses a configuration from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AdjudicatorConfig = serde_json::from_str(json)?;
        config.rules.check()?;
        Ok(config)
    }
}

impl RuleOptions {
    /// Parses rule options from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: RuleOptions = serde_json::from_str(json)?;
        rules.check()?;
        Ok(rules)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.max_sweeps == Some(0) {
            return Err(ConfigError::ZeroSweepCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let rules = RuleOptions::default();
        assert_eq!(rules.build_policy, BuildPolicy::HomeOnly);
        assert_eq!(rules.convoy_routes, ConvoyRouteRule::Either);
        assert_eq!(rules.paradox, ParadoxRule::Szykman);
        assert_eq!(rules.max_sweeps, None);
        assert!(ValidationOptions::default().is_strict());
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = AdjudicatorConfig::from_json("{}").expect("empty object parses");
        assert_eq!(config, AdjudicatorConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = AdjudicatorConfig::from_json(
            r#"{"rules":{"build_policy":"any_if_one_home_owned","convoy_routes":"explicit_only","paradox":"report","max_sweeps":10},
                "validation":{"strictness":"lenient"}}"#,
        )
        .expect("config parses");
        assert_eq!(config.rules.build_policy, BuildPolicy::AnyIfOneHomeOwned);
        assert_eq!(config.rules.convoy_routes, ConvoyRouteRule::ExplicitOnly);
        assert_eq!(config.rules.paradox, ParadoxRule::Report);
        assert_eq!(config.rules.max_sweeps, Some(10));
        assert!(!config.validation.is_strict());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(RuleOptions::from_json(r#"{"paradox":"coin_flip"}"#), Err(ConfigError::Json(_))));
        assert!(matches!(RuleOptions::from_json(r#"{"max_sweeps":0}"#), Err(ConfigError::ZeroSweepCap)));
    }
}
