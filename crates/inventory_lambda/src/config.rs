use inventory_core::contract::DEFAULT_TABLE_NAME;
use thiserror::Error;

pub const TABLE_NAME_VAR: &str = "PRODUCT_TABLE_NAME";
pub const SCAN_PAGE_LIMIT_VAR: &str = "SCAN_PAGE_LIMIT";
pub const ENDPOINT_URL_VAR: &str = "DYNAMODB_ENDPOINT_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("PRODUCT_TABLE_NAME cannot be empty")]
    EmptyTableName,
    #[error("SCAN_PAGE_LIMIT must be a positive integer, got '{0}'")]
    InvalidPageLimit(String),
}

/// Settings read once per cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub table_name: String,
    /// Maximum items evaluated per Scan call; the store default applies when unset.
    pub scan_page_limit: Option<i32>,
    pub endpoint_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            scan_page_limit: None,
            endpoint_url: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = match lookup(TABLE_NAME_VAR) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyTableName),
            Some(value) => value.trim().to_string(),
            None => DEFAULT_TABLE_NAME.to_string(),
        };

        let scan_page_limit = lookup(SCAN_PAGE_LIMIT_VAR)
            .map(|value| parse_page_limit(&value))
            .transpose()?;

        let endpoint_url = lookup(ENDPOINT_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            table_name,
            scan_page_limit,
            endpoint_url,
        })
    }
}

fn parse_page_limit(value: &str) -> Result<i32, ConfigError> {
    match value.trim().parse::<i32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidPageLimit(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        assert_eq!(config_from(&[]), Ok(ApiConfig::default()));
        assert_eq!(ApiConfig::default().table_name, "product-inventory");
    }

    #[test]
    fn reads_all_settings() {
        let config = config_from(&[
            ("PRODUCT_TABLE_NAME", "inventory-staging"),
            ("SCAN_PAGE_LIMIT", "100"),
            ("DYNAMODB_ENDPOINT_URL", "http://localhost:8000"),
        ])
        .expect("config should load");

        assert_eq!(
            config,
            ApiConfig {
                table_name: "inventory-staging".to_string(),
                scan_page_limit: Some(100),
                endpoint_url: Some("http://localhost:8000".to_string()),
            }
        );
    }

    #[test]
    fn blank_table_name_is_rejected() {
        assert_eq!(
            config_from(&[("PRODUCT_TABLE_NAME", " ")]),
            Err(ConfigError::EmptyTableName)
        );
    }

    #[test]
    fn blank_endpoint_is_ignored() {
        let config = config_from(&[("DYNAMODB_ENDPOINT_URL", "")]).expect("config should load");
        assert_eq!(config.endpoint_url, None);
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    #[case("many")]
    #[case("")]
    fn invalid_page_limit_is_rejected(#[case] value: &str) {
        assert_eq!(
            config_from(&[("SCAN_PAGE_LIMIT", value)]),
            Err(ConfigError::InvalidPageLimit(value.to_string()))
        );
    }
}
