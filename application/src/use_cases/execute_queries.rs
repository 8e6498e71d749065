//! Execute Queries use case
//!
//! Sends one prompt to every selected model concurrently. Each model runs
//! its own race between the provider call and a timeout; a failure in one
//! model never affects the others and is captured into that model's
//! response instead of being raised.

use crate::ports::llm_provider::{LlmProvider, ProviderRegistry};
use crate::ports::status::{NoStatus, StatusObserver};
use chrono::Utc;
use futures::future::join_all;
use panel_domain::config::defaults::DEFAULT_TIMEOUT_MS;
use panel_domain::query::{request_options, resolve_system_prompt};
use panel_domain::{
    AppConfig, ErrorCategory, GroupInfo, LlmResponse, ModelConfig, ModelQueryStatus, PanelError,
    QueryExecutionResult, StatusContext, StatusEvent, StatusMap, Timing,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Options shared by every query of one run
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Prompt text, already combined with context documents.
    pub prompt: String,
    /// Replaces every model's system prompt when set.
    pub system_prompt_override: Option<String>,
    /// Per-model timeout.
    pub timeout: Duration,
    /// Request extended reasoning from models that support it.
    pub enable_thinking: bool,
    /// Cancels every in-flight query when triggered.
    pub cancellation: Option<CancellationToken>,
}

impl QueryOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt_override: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            enable_thinking: false,
            cancellation: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt_override = Some(prompt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn with_thinking(mut self, enable: bool) -> Self {
        self.enable_thinking = enable;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn timeout_ms(&self) -> u128 {
        self.timeout.as_millis()
    }
}

enum Outcome {
    Finished(Result<LlmResponse, PanelError>),
    TimedOut,
    Cancelled,
}

/// Use case for querying the selected models
pub struct ExecuteQueriesUseCase {
    registry: Arc<dyn ProviderRegistry>,
}

impl ExecuteQueriesUseCase {
    pub fn new(registry: Arc<dyn ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Execute without status reporting
    pub async fn execute(
        &self,
        config: &AppConfig,
        models: &[ModelConfig],
        options: &QueryOptions,
    ) -> QueryExecutionResult {
        self.execute_with_status(config, models, options, &NoStatus)
            .await
    }

    /// Execute, reporting every status transition to `observer`.
    ///
    /// `responses` and `statuses` come back in the order of `models`
    /// regardless of completion order.
    pub async fn execute_with_status(
        &self,
        config: &AppConfig,
        models: &[ModelConfig],
        options: &QueryOptions,
        observer: &dyn StatusObserver,
    ) -> QueryExecutionResult {
        info!(
            "Querying {} model(s) with a {}ms timeout",
            models.len(),
            options.timeout_ms()
        );

        let outcomes = join_all(
            models
                .iter()
                .map(|model| self.query_model(config, model, options, observer)),
        )
        .await;

        let mut responses = Vec::with_capacity(outcomes.len());
        let mut statuses = StatusMap::new();
        for (model, (response, status)) in models.iter().zip(outcomes) {
            statuses.push(model.key(), status);
            responses.push(response);
        }

        let timing = Timing::spanning(statuses.iter().map(|(_, s)| s), Utc::now());
        let result = QueryExecutionResult {
            responses,
            statuses,
            timing,
        };
        info!(
            "Queries finished: {} succeeded, {} failed in {}ms",
            result.success_count(),
            result.failure_count(),
            result.timing.duration_ms
        );
        result
    }

    /// Run one model's lifecycle: pending → running → success | error.
    async fn query_model(
        &self,
        config: &AppConfig,
        model: &ModelConfig,
        options: &QueryOptions,
        observer: &dyn StatusObserver,
    ) -> (LlmResponse, ModelQueryStatus) {
        let key = model.key();
        let group = config.find_group_for(&model.spec);
        let context = StatusContext::new(&model.spec, group.as_ref().map(|g| g.name.clone()));
        let emit = |status: &ModelQueryStatus| {
            observer.on_status(&StatusEvent {
                model_key: key.clone(),
                status: status.clone(),
                context: context.clone(),
            });
        };

        emit(&ModelQueryStatus::pending());

        let Some(provider) = self.registry.lookup(model.provider()) else {
            let now = Utc::now();
            emit(&ModelQueryStatus::running(now));
            let error = PanelError::config(format!("Provider '{}' not found", model.provider()))
                .with_provider(model.provider())
                .with_suggestion(registered_providers_hint(self.registry.as_ref()));
            warn!("Model {}: {}", key, error.message);
            let status = ModelQueryStatus::error(now, now, error.clone());
            emit(&status);
            return (LlmResponse::failure(&model.spec, &error), status);
        };

        let system_prompt = resolve_system_prompt(
            options.system_prompt_override.as_deref(),
            model,
            group.as_ref(),
        );
        let group_info = group.map(|g| GroupInfo::new(g.name, system_prompt.text.clone()));
        let request_options = request_options(model, options.enable_thinking);
        debug!(
            "Model {}: system prompt from {}, {} option(s)",
            key,
            system_prompt.source,
            request_options.len()
        );

        let start = Utc::now();
        emit(&ModelQueryStatus::running(start));

        let outcome = Self::race(
            provider.as_ref(),
            model,
            &request_options,
            &system_prompt.text,
            options,
        )
        .await;
        let end = Utc::now();

        let result = match outcome {
            Outcome::Finished(Ok(response)) => Ok(response),
            Outcome::Finished(Err(error)) => Err(error),
            Outcome::TimedOut => Err(PanelError::network(format!(
                "Model {} timed out after {}ms. The API might be unresponsive.",
                key,
                options.timeout_ms()
            ))
            .with_provider(model.provider())
            .with_suggestion("Increase the per-model timeout or retry later")),
            Outcome::Cancelled => Err(PanelError::unknown(format!(
                "Query for model {} was cancelled",
                key
            ))),
        };

        let (response, status) = match result.and_then(reject_error_response) {
            Ok(mut response) => {
                response.provider = model.provider().to_string();
                response.model_id = model.model_id().to_string();
                if response.group_info.is_none() {
                    response.group_info = group_info;
                }
                let status = ModelQueryStatus::success(start, end);
                info!("Model {} responded in {}ms", key, status.duration_ms.unwrap_or(0));
                (response, status)
            }
            Err(error) => {
                warn!("Model {} failed: {}", key, error.message);
                let mut response = LlmResponse::failure(&model.spec, &error);
                response.group_info = group_info;
                (response, ModelQueryStatus::error(start, end, error))
            }
        };

        emit(&status);
        (response, status)
    }

    /// Provider call vs timeout vs cancellation. The losing branches are
    /// dropped, which cancels an in-flight provider call cooperatively.
    async fn race(
        provider: &dyn LlmProvider,
        model: &ModelConfig,
        request_options: &panel_domain::ModelOptions,
        system_prompt: &str,
        options: &QueryOptions,
    ) -> Outcome {
        let call = provider.generate(
            &options.prompt,
            model.model_id(),
            request_options,
            Some(system_prompt),
        );

        tokio::select! {
            result = call => Outcome::Finished(result.map_err(PanelError::from)),
            _ = tokio::time::sleep(options.timeout) => Outcome::TimedOut,
            _ = cancelled(options.cancellation.as_ref()) => Outcome::Cancelled,
        }
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

/// A provider may report failure inside an otherwise successful response.
fn reject_error_response(response: LlmResponse) -> Result<LlmResponse, PanelError> {
    match &response.error {
        Some(message) => Err(PanelError::new(
            response.error_category.unwrap_or(ErrorCategory::Unknown),
            message.clone(),
        )),
        None => Ok(response),
    }
}

fn registered_providers_hint(registry: &dyn ProviderRegistry) -> String {
    let ids = registry.provider_ids();
    if ids.is_empty() {
        "No providers are registered".to_string()
    } else {
        format!("Registered providers: {}", ids.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_provider::ProviderError;
    use async_trait::async_trait;
    use panel_domain::core::model::ModelOptions;
    use panel_domain::{Group, QueryStatus, SystemPromptSource};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    #[derive(Clone)]
    enum Behavior {
        Reply(&'static str),
        Fail(PanelError),
        Raw(&'static str),
    }

    #[derive(Debug, Clone)]
    struct RecordedCall {
        model_id: String,
        options: ModelOptions,
        system_prompt: Option<String>,
    }

    struct MockProvider {
        delay: Duration,
        behavior: Behavior,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockProvider {
        fn new(behavior: Behavior) -> Self {
            Self {
                delay: Duration::ZERO,
                behavior,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn generate(
            &self,
            _prompt: &str,
            model_id: &str,
            options: &ModelOptions,
            system_prompt: Option<&str>,
        ) -> Result<LlmResponse, ProviderError> {
            self.calls.lock().unwrap().push(RecordedCall {
                model_id: model_id.to_string(),
                options: options.clone(),
                system_prompt: system_prompt.map(String::from),
            });
            tokio::time::sleep(self.delay).await;
            match &self.behavior {
                Behavior::Reply(text) => Ok(LlmResponse::success(
                    &panel_domain::ModelSpec::new("ignored", model_id),
                    format!("{} from {}", text, model_id),
                )),
                Behavior::Fail(err) => Err(ProviderError::Classified(err.clone())),
                Behavior::Raw(msg) => Err(ProviderError::raw(*msg)),
            }
        }
    }

    struct RecordingObserver {
        events: Mutex<Vec<StatusEvent>>,
    }

    impl RecordingObserver {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn sequence_for(&self, key: &str) -> Vec<QueryStatus> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.model_key == key)
                .map(|e| e.status.status)
                .collect()
        }
    }

    impl StatusObserver for RecordingObserver {
        fn on_status(&self, event: &StatusEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn registry(providers: Vec<(&str, Arc<MockProvider>)>) -> Arc<dyn ProviderRegistry> {
        let map: BTreeMap<String, Arc<dyn LlmProvider>> = providers
            .into_iter()
            .map(|(id, p)| (id.to_string(), p as Arc<dyn LlmProvider>))
            .collect();
        Arc::new(map)
    }

    // ==================== Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_success_missing_provider_and_timeout() {
        let fast = Arc::new(MockProvider::new(Behavior::Reply("hello")));
        let slow = Arc::new(
            MockProvider::new(Behavior::Reply("late")).with_delay(Duration::from_secs(10)),
        );
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("openai", fast), ("slow", slow)]));

        let models = vec![
            ModelConfig::new("openai", "gpt-4o"),
            ModelConfig::new("ghost", "model-x"),
            ModelConfig::new("slow", "turtle"),
        ];
        let config = AppConfig::new(models.clone());
        let options = QueryOptions::new("prompt").with_timeout_ms(100);

        let result = use_case.execute(&config, &models, &options).await;

        assert_eq!(result.responses.len(), 3);
        assert_eq!(result.statuses.len(), 3);
        let keys: Vec<String> = result.responses.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!["openai:gpt-4o", "ghost:model-x", "slow:turtle"]);

        assert!(result.responses[0].is_success());
        assert_eq!(result.responses[0].text, "hello from gpt-4o");

        let missing = result.statuses.get("ghost:model-x").unwrap();
        assert_eq!(missing.status, QueryStatus::Error);
        assert!(missing.message.as_deref().unwrap().contains("not found"));
        assert_eq!(result.responses[1].text, "");

        let timed_out = result.statuses.get("slow:turtle").unwrap();
        assert_eq!(timed_out.status, QueryStatus::Error);
        assert_eq!(
            timed_out.message.as_deref(),
            Some("Model slow:turtle timed out after 100ms. The API might be unresponsive.")
        );
        assert_eq!(result.success_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_rejection_loses_to_timeout() {
        let fast = Arc::new(MockProvider::new(Behavior::Reply("hello")));
        let late_fail = Arc::new(
            MockProvider::new(Behavior::Fail(PanelError::api("late", "401 Unauthorized")))
                .with_delay(Duration::from_secs(10)),
        );
        let use_case =
            ExecuteQueriesUseCase::new(registry(vec![("openai", fast), ("late", late_fail)]));

        let models = vec![
            ModelConfig::new("openai", "gpt-4o"),
            ModelConfig::new("ghost", "model-x"),
            ModelConfig::new("late", "m"),
        ];
        let config = AppConfig::new(models.clone());
        let options = QueryOptions::new("prompt").with_timeout_ms(100);

        let result = use_case.execute(&config, &models, &options).await;

        assert_eq!(result.responses.len(), 3);
        assert!(result.responses[0].is_success());

        let status = result.statuses.get("late:m").unwrap();
        assert_eq!(status.status, QueryStatus::Error);
        assert_eq!(
            status.message.as_deref(),
            Some("Model late:m timed out after 100ms. The API might be unresponsive.")
        );
        assert_eq!(result.responses[2].error_category, Some(ErrorCategory::Network));
        assert!(!result.responses[2]
            .error
            .as_deref()
            .unwrap()
            .contains("401"));
        assert_eq!(result.success_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reversed_completion_order_keeps_input_order() {
        let first = Arc::new(
            MockProvider::new(Behavior::Reply("first")).with_delay(Duration::from_millis(300)),
        );
        let second = Arc::new(
            MockProvider::new(Behavior::Reply("second")).with_delay(Duration::from_millis(10)),
        );
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("a", first), ("b", second)]));

        let models = vec![ModelConfig::new("a", "one"), ModelConfig::new("b", "two")];
        let config = AppConfig::new(models.clone());
        let result = use_case
            .execute(&config, &models, &QueryOptions::new("p"))
            .await;

        assert_eq!(result.responses[0].text, "first from one");
        assert_eq!(result.responses[1].text, "second from two");
        let keys: Vec<&str> = result.statuses.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a:one", "b:two"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_sequence_per_model() {
        let ok = Arc::new(MockProvider::new(Behavior::Reply("ok")));
        let bad = Arc::new(MockProvider::new(Behavior::Fail(PanelError::api(
            "bad",
            "401 Unauthorized",
        ))));
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("ok", ok), ("bad", bad)]));

        let models = vec![
            ModelConfig::new("ok", "m"),
            ModelConfig::new("bad", "m"),
            ModelConfig::new("missing", "m"),
        ];
        let config = AppConfig::new(models.clone());
        let observer = RecordingObserver::new();
        let result = use_case
            .execute_with_status(&config, &models, &QueryOptions::new("p"), &observer)
            .await;

        for key in ["ok:m", "bad:m", "missing:m"] {
            let seq = observer.sequence_for(key);
            assert_eq!(seq.len(), 3, "{key}");
            assert_eq!(seq[0], QueryStatus::Pending);
            assert_eq!(seq[1], QueryStatus::Running);
            assert!(seq[2].is_terminal());
        }

        for (_, status) in result.statuses.iter() {
            let start = status.start_time.unwrap();
            let end = status.end_time.unwrap();
            assert!(end >= start);
            assert_eq!(
                status.duration_ms.unwrap() as i64,
                (end - start).num_milliseconds()
            );
        }
        assert!(result.timing.end_time >= result.timing.start_time);
    }

    #[tokio::test]
    async fn test_rejections_are_classified() {
        let classified = Arc::new(MockProvider::new(Behavior::Fail(PanelError::api(
            "c",
            "rate limited",
        ))));
        let raw = Arc::new(MockProvider::new(Behavior::Raw("socket hang up")));
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("c", classified), ("r", raw)]));

        let models = vec![ModelConfig::new("c", "m"), ModelConfig::new("r", "m")];
        let config = AppConfig::new(models.clone());
        let result = use_case
            .execute(&config, &models, &QueryOptions::new("p"))
            .await;

        assert_eq!(result.responses[0].error_category, Some(ErrorCategory::Api));
        assert_eq!(result.responses[0].error.as_deref(), Some("rate limited"));
        assert_eq!(result.responses[1].error_category, Some(ErrorCategory::Unknown));
        assert_eq!(result.responses[1].error.as_deref(), Some("socket hang up"));
        assert!(result.all_failed());
    }

    #[tokio::test]
    async fn test_system_prompt_precedence_and_group_info() {
        let provider = Arc::new(MockProvider::new(Behavior::Reply("ok")));
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("openai", provider.clone())]));

        let grouped = ModelConfig::new("openai", "grouped");
        let own = ModelConfig::new("openai", "own").with_system_prompt("model prompt");
        let plain = ModelConfig::new("openai", "plain");
        let config = AppConfig::new(vec![plain.clone()]).with_group(
            Group::new("coding", "group prompt")
                .with_model(grouped.clone())
                .with_model(own.clone()),
        );
        let models = vec![grouped, own, plain];

        let result = use_case
            .execute(&config, &models, &QueryOptions::new("p"))
            .await;

        let prompts: BTreeMap<String, Option<String>> = provider
            .calls()
            .into_iter()
            .map(|c| (c.model_id, c.system_prompt))
            .collect();
        assert_eq!(prompts["grouped"].as_deref(), Some("group prompt"));
        assert_eq!(prompts["own"].as_deref(), Some("model prompt"));
        assert_eq!(
            prompts["plain"].as_deref(),
            Some(panel_domain::config::defaults::DEFAULT_SYSTEM_PROMPT)
        );

        let info = result.responses[1].group_info.as_ref().unwrap();
        assert_eq!(info.name, "coding");
        assert_eq!(info.system_prompt, "model prompt");
        assert!(result.responses[2].group_info.is_none());

        // sanity check on the precedence helper for the override case
        let resolved = resolve_system_prompt(Some("cli"), &models[1], None);
        assert_eq!(resolved.source, SystemPromptSource::CliOverride);
    }

    #[tokio::test]
    async fn test_override_applies_to_every_model() {
        let provider = Arc::new(MockProvider::new(Behavior::Reply("ok")));
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("openai", provider.clone())]));
        let models = vec![ModelConfig::new("openai", "own").with_system_prompt("model prompt")];
        let config = AppConfig::new(models.clone());

        use_case
            .execute(
                &config,
                &models,
                &QueryOptions::new("p").with_system_prompt("from cli"),
            )
            .await;

        assert_eq!(provider.calls()[0].system_prompt.as_deref(), Some("from cli"));
    }

    #[tokio::test]
    async fn test_thinking_option_only_for_reasoning_models() {
        let anthropic = Arc::new(MockProvider::new(Behavior::Reply("ok")));
        let openai = Arc::new(MockProvider::new(Behavior::Reply("ok")));
        let use_case = ExecuteQueriesUseCase::new(registry(vec![
            ("anthropic", anthropic.clone()),
            ("openai", openai.clone()),
        ]));
        let models = vec![
            ModelConfig::new("anthropic", "claude-3-7-sonnet-latest"),
            ModelConfig::new("openai", "gpt-4o"),
        ];
        let config = AppConfig::new(models.clone());

        use_case
            .execute(&config, &models, &QueryOptions::new("p").with_thinking(true))
            .await;

        let thinking = &anthropic.calls()[0].options["thinking"];
        assert_eq!(thinking["type"], "enabled");
        assert_eq!(thinking["budget_tokens"], 16_000);
        assert!(!openai.calls()[0].options.contains_key("thinking"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_ends_in_flight_queries() {
        let slow = Arc::new(
            MockProvider::new(Behavior::Reply("late")).with_delay(Duration::from_secs(60)),
        );
        let use_case = ExecuteQueriesUseCase::new(registry(vec![("slow", slow)]));
        let models = vec![ModelConfig::new("slow", "m")];
        let config = AppConfig::new(models.clone());

        let token = CancellationToken::new();
        token.cancel();
        let result = use_case
            .execute(
                &config,
                &models,
                &QueryOptions::new("p").with_cancellation(token),
            )
            .await;

        assert_eq!(result.responses.len(), 1);
        assert!(result.responses[0].error.as_deref().unwrap().contains("cancelled"));
    }

    #[tokio::test]
    async fn test_no_models_yields_empty_result() {
        let use_case = ExecuteQueriesUseCase::new(registry(vec![]));
        let result = use_case
            .execute(&AppConfig::default(), &[], &QueryOptions::new("p"))
            .await;
        assert!(result.responses.is_empty());
        assert!(result.statuses.is_empty());
        assert_eq!(result.timing.duration_ms, 0);
        assert!(!result.all_failed());
    }
}
