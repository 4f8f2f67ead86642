use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{debug, warn};

use crate::application::{
    ChatClient, ChatbotConfig, ContextSource, HistoryRepository, RunChatbotUseCase,
    SessionHistoryUseCase, DEFAULT_SYSTEM_PROMPT,
};
use crate::domain::{SessionIdStyle, DEFAULT_HISTORY_LIMIT};
use crate::{
    CsvContextLoader, GeminiClient, InMemoryHistoryRepository, MockChatClient,
    UpstashHistoryRepository, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
};

pub const DEFAULT_CONTEXT_FILE: &str = "bitextDataset.csv";

pub struct ContainerConfig {
    pub model_name: String,
    pub temperature: f32,
    pub context_file: PathBuf,
    /// System instruction template; `{context}` receives the context document.
    pub system_prompt: String,
    /// Upstash Redis REST endpoint.
    pub store_url: Option<String>,
    pub store_token: Option<String>,
    pub api_key: Option<String>,
    pub model_base_url: String,
    pub model_timeout: Duration,
    pub history_limit: usize,
    pub session_id_style: SessionIdStyle,
    /// Keep history in process memory instead of the remote store.
    pub memory_storage: bool,
    /// Answer with [`MockChatClient`] instead of calling the model API.
    pub mock_model: bool,
}

impl ContainerConfig {
    /// Reads configuration from the process environment.
    ///
    /// | Variable             | Default                                     |
    /// |----------------------|---------------------------------------------|
    /// | `MODEL_NAME`         | `gemini-1.5-flash`                          |
    /// | `TEMPERATURE`        | `0`                                         |
    /// | `CSV_FILE_PATH`      | `bitextDataset.csv`                         |
    /// | `SYSTEM_PROMPT`      | built-in support-agent instruction          |
    /// | `REDIS_URL`          | unset                                       |
    /// | `REDIS_TOKEN`        | unset                                       |
    /// | `GOOGLE_API_KEY`     | unset                                       |
    /// | `GEMINI_BASE_URL`    | `https://generativelanguage.googleapis.com` |
    /// | `MODEL_TIMEOUT_SECS` | `60`                                        |
    /// | `HISTORY_LIMIT`      | `50`                                        |
    /// | `SESSION_ID_STYLE`   | `uuid`                                      |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_name: var("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_temperature(var("TEMPERATURE")),
            context_file: var("CSV_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTEXT_FILE)),
            system_prompt: var("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            store_url: var("REDIS_URL"),
            store_token: var("REDIS_TOKEN"),
            api_key: var("GOOGLE_API_KEY"),
            model_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_timeout: Duration::from_secs(parse_or(
                "MODEL_TIMEOUT_SECS",
                var("MODEL_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT.as_secs(),
            )),
            history_limit: parse_or("HISTORY_LIMIT", var("HISTORY_LIMIT"), DEFAULT_HISTORY_LIMIT),
            session_id_style: var("SESSION_ID_STYLE")
                .map(|s| SessionIdStyle::from_str(&s))
                .unwrap_or_default(),
            memory_storage: false,
            mock_model: false,
        }
    }

    fn chatbot_config(&self) -> ChatbotConfig {
        ChatbotConfig {
            system_prompt: self.system_prompt.clone(),
            session_id_style: self.session_id_style,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', using default", key, value);
            default
        }),
        None => default,
    }
}

/// NaN and infinities parse as `f32` but cannot be sent to the model.
fn parse_temperature(raw: Option<String>) -> f32 {
    let temperature = parse_or("TEMPERATURE", raw.clone(), 0.0_f32);
    if temperature.is_finite() {
        temperature
    } else {
        warn!(
            "Invalid TEMPERATURE value '{}', using default",
            raw.unwrap_or_default()
        );
        0.0
    }
}

pub struct Container {
    history_repo: Arc<dyn HistoryRepository>,
    chatbot: Arc<RunChatbotUseCase>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let history_repo: Arc<dyn HistoryRepository> = if config.memory_storage {
            debug!("Using in-memory history storage");
            Arc::new(InMemoryHistoryRepository::with_limit(config.history_limit))
        } else {
            match (config.store_url.as_deref(), config.store_token.as_deref()) {
                (Some(url), Some(token)) => {
                    debug!("Using Upstash history storage at {}", url);
                    Arc::new(UpstashHistoryRepository::new(
                        url,
                        token,
                        config.history_limit,
                    ))
                }
                _ => bail!(
                    "REDIS_URL and REDIS_TOKEN must be set for remote history storage \
                     (or pass --memory-storage)"
                ),
            }
        };

        let chat_client: Arc<dyn ChatClient> = if config.mock_model {
            debug!("Using mock chat model");
            Arc::new(MockChatClient::new())
        } else {
            let Some(api_key) = config.api_key.as_deref() else {
                bail!("GOOGLE_API_KEY must be set to call the model (or pass --mock-model)");
            };
            debug!(
                "Using Gemini model {} (temperature {})",
                config.model_name, config.temperature
            );
            Arc::new(GeminiClient::new(
                api_key,
                config.model_name.as_str(),
                config.temperature,
                config.model_base_url.as_str(),
                config.model_timeout,
            ))
        };

        let context_source: Arc<dyn ContextSource> =
            Arc::new(CsvContextLoader::new(config.context_file.clone()));

        Ok(Self::with_components(
            config,
            history_repo,
            context_source,
            chat_client,
        ))
    }

    /// Wires already-built adapters, bypassing adapter selection.
    pub fn with_components(
        config: ContainerConfig,
        history_repo: Arc<dyn HistoryRepository>,
        context_source: Arc<dyn ContextSource>,
        chat_client: Arc<dyn ChatClient>,
    ) -> Self {
        let chatbot = Arc::new(RunChatbotUseCase::new(
            config.chatbot_config(),
            history_repo.clone(),
            context_source,
            chat_client,
        ));

        Self {
            history_repo,
            chatbot,
            config,
        }
    }

    pub fn chatbot_use_case(&self) -> Arc<RunChatbotUseCase> {
        self.chatbot.clone()
    }

    pub fn history_use_case(&self) -> SessionHistoryUseCase {
        SessionHistoryUseCase::new(self.history_repo.clone())
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }
}
