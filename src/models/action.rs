//! # Action Parameters
//!
//! The host hands each step the action it runs together with the parameter
//! values the flow author entered. Values always travel as strings.

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::constants::params;

/// One configured parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParam {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl ActionParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The action attached to a step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plugin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<ActionParam>,
}

impl Action {
    pub fn with_params(params: Vec<ActionParam>) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Value of the last parameter with this key
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    /// Configured auto-approval timeout in seconds, `0` when disabled
    pub fn timeout_seconds(&self) -> u64 {
        self.param(params::TIMEOUT).map(parse_timeout).unwrap_or(0)
    }
}

/// Coerce a raw `Timeout` value to whole seconds.
///
/// Anything that is not a plain base-10 integer, and any negative value,
/// disables the timeout.
pub fn parse_timeout(raw: &str) -> u64 {
    raw.parse::<i64>()
        .ok()
        .and_then(|seconds| u64::try_from(seconds).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_timeout_defaults_to_disabled() {
        assert_eq!(Action::default().timeout_seconds(), 0);

        let action = Action::with_params(vec![ActionParam::new("Other", "30")]);
        assert_eq!(action.timeout_seconds(), 0);
    }

    #[test]
    fn test_timeout_parsing_edge_cases() {
        assert_eq!(parse_timeout("7"), 7);
        assert_eq!(parse_timeout("+12"), 12);
        assert_eq!(parse_timeout("0"), 0);
        assert_eq!(parse_timeout("-5"), 0);
        assert_eq!(parse_timeout(""), 0);
        assert_eq!(parse_timeout("ten"), 0);
        assert_eq!(parse_timeout("7.5"), 0);
        assert_eq!(parse_timeout(" 7"), 0);
    }

    #[test]
    fn test_last_timeout_param_wins() {
        let action = Action::with_params(vec![
            ActionParam::new("Timeout", "10"),
            ActionParam::new("Timeout", "20"),
        ]);
        assert_eq!(action.timeout_seconds(), 20);
    }

    #[test]
    fn test_null_params_read_as_empty() {
        let action: Action = serde_json::from_value(serde_json::json!({
            "name": "Interaction",
            "plugin": "interaction",
            "params": null,
        }))
        .unwrap();

        assert!(action.params.is_empty());
        assert_eq!(action.timeout_seconds(), 0);
    }

    #[test]
    fn test_param_keys_are_case_sensitive() {
        let action = Action::with_params(vec![ActionParam::new("timeout", "10")]);
        assert_eq!(action.timeout_seconds(), 0);
    }

    proptest! {
        #[test]
        fn prop_non_negative_integers_round_trip(seconds in 0u32..=u32::MAX) {
            prop_assert_eq!(parse_timeout(&seconds.to_string()), u64::from(seconds));
        }

        #[test]
        fn prop_negative_integers_disable_timeout(seconds in i64::MIN..0) {
            prop_assert_eq!(parse_timeout(&seconds.to_string()), 0);
        }

        #[test]
        fn prop_non_numeric_input_disables_timeout(raw in "[a-zA-Z ]{1,12}") {
            prop_assert_eq!(parse_timeout(&raw), 0);
        }
    }
}
