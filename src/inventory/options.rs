//! Mapping from authenticator types to client-facing presentation options.

use anyhow::{Context, Result};
use std::collections::HashMap;

/// Configured `type -> presentation options` mapping with a single fallback
/// option for unrecognized types.
#[derive(Debug, Clone)]
pub struct OptionsMap {
    mappings: HashMap<String, Vec<String>>,
    default_option: String,
}

impl OptionsMap {
    #[must_use]
    pub fn new(mappings: HashMap<String, Vec<String>>, default_option: String) -> Self {
        let mappings = mappings
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();

        Self {
            mappings,
            default_option,
        }
    }

    /// Parse the mapping from its JSON configuration form, e.g.
    /// `{"mobilepass":["push","code"],"etoken":["code"]}`.
    ///
    /// # Errors
    /// Returns an error if the JSON is not a map of string lists.
    pub fn from_json(json: &str, default_option: String) -> Result<Self> {
        let mappings: HashMap<String, Vec<String>> =
            serde_json::from_str(json).context("Invalid presentation-option mapping")?;

        Ok(Self::new(mappings, default_option))
    }

    /// Presentation options for a token type; unknown or empty types fall
    /// back to the configured default option.
    #[must_use]
    pub fn options_for_type(&self, token_type: &str) -> Vec<String> {
        match self.mappings.get(&token_type.to_lowercase()) {
            Some(options) if !options.is_empty() => options.clone(),
            _ => vec![self.default_option.clone()],
        }
    }

    #[must_use]
    pub fn supports_push(&self, token_type: &str) -> bool {
        self.options_for_type(token_type)
            .iter()
            .any(|option| option == "push")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn map() -> Result<OptionsMap> {
        OptionsMap::from_json(
            r#"{"MobilePASS":["push","code"],"etoken":["code"],"gold":["grid","code"]}"#,
            "code".to_string(),
        )
    }

    #[test]
    fn options_are_case_insensitive_on_type() -> Result<()> {
        let map = map()?;
        assert_eq!(map.options_for_type("mobilepass"), vec!["push", "code"]);
        assert_eq!(map.options_for_type("MOBILEPASS"), vec!["push", "code"]);
        Ok(())
    }

    #[test]
    fn unknown_type_falls_back_to_default() -> Result<()> {
        let map = map()?;
        assert_eq!(map.options_for_type("hardware-xyz"), vec!["code"]);
        assert_eq!(map.options_for_type(""), vec!["code"]);
        Ok(())
    }

    #[test]
    fn push_support_follows_options() -> Result<()> {
        let map = map()?;
        assert!(map.supports_push("mobilepass"));
        assert!(!map.supports_push("etoken"));
        assert!(!map.supports_push("unknown"));
        Ok(())
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(OptionsMap::from_json("not json", "code".to_string()).is_err());
        assert!(OptionsMap::from_json(r#"{"a": "not-a-list"}"#, "code".to_string()).is_err());
    }
}
