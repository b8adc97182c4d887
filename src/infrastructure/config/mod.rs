use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::variant::DatasetVariant;
use crate::infrastructure::security::keyring::{KeyringManager, KEYRING_SERVICE};

pub const ENV_PREFIX: &str = "INSIGHTDESK_";
pub const CONFIG_PATH_ENV: &str = "INSIGHTDESK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "insightdesk.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub variant: DatasetVariant,
    /// Falls back to the variant's default file name when unset.
    pub dataset_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Environment variable holding the LLM credential.
    pub api_key_env: String,
    pub llm: LLMConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            variant: DatasetVariant::Hr,
            dataset_path: None,
            host: "127.0.0.1".to_string(),
            port: 3001,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            llm: LLMConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.variant.default_dataset_path()))
    }
}

pub struct ConfigService {
    keyring: KeyringManager,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            keyring: KeyringManager::new(KEYRING_SERVICE),
        }
    }

    /// Defaults, then the TOML file, then `INSIGHTDESK_*` variables
    /// (`__` separates nested keys, e.g. `INSIGHTDESK_LLM__MODEL`).
    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(&self) -> Result<AppConfig> {
        let config_file = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        debug!(config_file = %config_file.display(), "Loading configuration");

        let mut config: AppConfig = Self::figment(&config_file).extract()?;
        config.llm.api_key = self.resolve_api_key(&config);
        Ok(config)
    }

    /// Environment first, then the OS keyring entry named after the provider.
    pub fn resolve_api_key(&self, config: &AppConfig) -> Option<String> {
        if let Ok(key) = std::env::var(&config.api_key_env) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }

        match self.keyring.get_secret(config.llm.provider.as_str()) {
            Ok(key) if !key.trim().is_empty() => Some(key),
            Ok(_) => None,
            Err(err) => {
                warn!(
                    env = %config.api_key_env,
                    error = %err,
                    "No API key in environment or keyring; analysis calls will fail"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    #[test]
    fn test_defaults_match_hr_dashboard() {
        let config = AppConfig::default();
        assert_eq!(config.variant, DatasetVariant::Hr);
        assert_eq!(config.dataset_path(), PathBuf::from("dados_rh.xlsx"));
        assert_eq!(config.llm.model, "claude-3-opus-20240229");
        assert_eq!(config.llm.temperature, Some(0.7));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(
                r#"
                variant = "sales"
                port = 8080

                [llm]
                provider = "openrouter"
                base_url = "https://openrouter.ai/api/v1"
                model = "anthropic/claude-3-haiku"
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(config.variant, DatasetVariant::Sales);
        assert_eq!(config.port, 8080);
        assert_eq!(config.dataset_path(), PathBuf::from("dados_vendas.xlsx"));
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.max_tokens, Some(1024));
    }

    #[test]
    fn test_api_key_read_from_configured_env_var() {
        let env_name = format!("INSIGHTDESK_TEST_KEY_{}", uuid::Uuid::new_v4().simple());
        std::env::set_var(&env_name, "sk-test");
        let config = AppConfig {
            api_key_env: env_name.clone(),
            ..AppConfig::default()
        };

        assert_eq!(
            ConfigService::new().resolve_api_key(&config).as_deref(),
            Some("sk-test")
        );
        std::env::remove_var(&env_name);
    }
}
