use crate::engine::{LedgerRules, ResultRule, ZeroResultPolicy};
use crate::export::ExportFormat;
use chrono::format::{Item, StrftimeItems};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: String,
    pub zero_result_policy: ZeroResultPolicy,
    pub result_rule: ResultRule,
    pub currency_prefix: String,
    pub export_date_format: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .unwrap_or_else(|| "capital_ledger.db".to_string());

        let zero_result_policy = match env_map
            .get("ZERO_RESULT_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("neither")
        {
            "neither" => ZeroResultPolicy::Neither,
            "loss" => ZeroResultPolicy::Loss,
            "win" => ZeroResultPolicy::Win,
            other => {
                return Err(ConfigError::InvalidValue(
                    "ZERO_RESULT_POLICY".to_string(),
                    format!("must be neither, loss, or win, got {}", other),
                ))
            }
        };

        let result_rule = match env_map
            .get("RESULT_RULE")
            .map(|s| s.as_str())
            .unwrap_or("scaled")
        {
            "scaled" => ResultRule::Scaled,
            "full_value_on_loss" => ResultRule::FullValueOnLoss,
            other => {
                return Err(ConfigError::InvalidValue(
                    "RESULT_RULE".to_string(),
                    format!("must be scaled or full_value_on_loss, got {}", other),
                ))
            }
        };

        let currency_prefix = env_map
            .get("CURRENCY_PREFIX")
            .cloned()
            .unwrap_or_else(|| "$".to_string());

        let export_date_format = env_map
            .get("EXPORT_DATE_FORMAT")
            .cloned()
            .unwrap_or_else(|| "%Y-%m-%d".to_string());
        if StrftimeItems::new(&export_date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue(
                "EXPORT_DATE_FORMAT".to_string(),
                format!("not a valid strftime format: {}", export_date_format),
            ));
        }

        Ok(Config {
            database_path,
            zero_result_policy,
            result_rule,
            currency_prefix,
            export_date_format,
        })
    }

    pub fn rules(&self) -> LedgerRules {
        LedgerRules::new(self.result_rule, self.zero_result_policy)
    }

    pub fn export_format(&self) -> ExportFormat {
        ExportFormat {
            currency_prefix: self.currency_prefix.clone(),
            date_format: self.export_date_format.clone(),
        }
    }
}
