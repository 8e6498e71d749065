//! Run Workflow use case
//!
//! Sequences one run: naming → input processing → model selection →
//! query execution → output. Every stage failure is routed through
//! [`handle_workflow_error`] before it reaches the caller.

use super::execute_queries::{ExecuteQueriesUseCase, QueryOptions};
use super::select_models::SelectModelsUseCase;
use crate::ports::context_loader::ContextLoaderPort;
use crate::ports::llm_provider::ProviderRegistry;
use crate::ports::output::{OutputWriter, ResponseRenderer, RunNamer};
use crate::ports::status::{NoStatus, StatusObserver};
use chrono::Utc;
use panel_domain::{
    AppConfig, CredentialCheck, PanelError, PromptTemplate, QueryExecutionResult,
    SelectionCriteria, SelectionResult, classify_with_context,
};
use std::collections::HashSet;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Stage a workflow error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStage {
    #[default]
    Setup,
    Input,
    Selection,
    Execution,
    Output,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Setup => "setup",
            WorkflowStage::Input => "input",
            WorkflowStage::Selection => "selection",
            WorkflowStage::Execution => "execution",
            WorkflowStage::Output => "output",
        }
    }
}

/// What the workflow knew about the run when a stage failed
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub stage: WorkflowStage,
    pub run_name: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Classify `err` (unless it already is a [`PanelError`]) and append the
/// run context to its suggestions. Message, category and cause of an
/// already-classified error are left untouched; a raw error's message is
/// prefixed with the failing stage.
pub fn handle_workflow_error<E>(err: E, context: &RunContext) -> PanelError
where
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
{
    let mut error = classify_with_context(
        err,
        format!("Run failed during {} stage", context.stage.as_str()),
    );

    let mut push = |suggestion: String| {
        if !error.suggestions.contains(&suggestion) {
            error.suggestions.push(suggestion);
        }
    };
    if let Some(name) = &context.run_name {
        push(format!("Run: {}", name));
    }
    if let Some(dir) = &context.output_dir {
        push(format!("Output directory: {}", dir.display()));
    }

    debug!(
        "Workflow failed during {}: {} ({})",
        context.stage.as_str(),
        error.message,
        error.category
    );
    error
}

/// Input for the RunWorkflow use case
#[derive(Debug, Clone)]
pub struct WorkflowInput {
    pub instructions_path: PathBuf,
    pub context_paths: Vec<PathBuf>,
    pub criteria: SelectionCriteria,
    pub system_prompt_override: Option<String>,
    pub timeout: Duration,
    pub enable_thinking: bool,
    /// Base directory; the run gets its own sub-directory.
    pub output_dir: PathBuf,
}

impl WorkflowInput {
    pub fn new(instructions_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            instructions_path: instructions_path.into(),
            context_paths: Vec::new(),
            criteria: SelectionCriteria::default(),
            system_prompt_override: None,
            timeout: Duration::from_millis(panel_domain::config::defaults::DEFAULT_TIMEOUT_MS),
            enable_thinking: false,
            output_dir: output_dir.into(),
        }
    }

    pub fn with_context_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.context_paths = paths;
        self
    }

    pub fn with_criteria(mut self, criteria: SelectionCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt_override = prompt;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_thinking(mut self, enable: bool) -> Self {
        self.enable_thinking = enable;
        self
    }
}

/// Output of a completed run
#[derive(Debug, Clone)]
pub struct WorkflowOutput {
    pub run_name: String,
    /// Directory the documents were written to; `None` when no model was
    /// queried.
    pub run_dir: Option<PathBuf>,
    pub selection: SelectionResult,
    pub result: QueryExecutionResult,
    pub written_files: Vec<PathBuf>,
}

/// Use case for one end-to-end run
pub struct RunWorkflowUseCase {
    config: Arc<AppConfig>,
    context_loader: Arc<dyn ContextLoaderPort>,
    selector: SelectModelsUseCase,
    executor: ExecuteQueriesUseCase,
    renderer: Arc<dyn ResponseRenderer>,
    writer: Arc<dyn OutputWriter>,
    namer: Arc<dyn RunNamer>,
    cancellation: Option<CancellationToken>,
}

impl RunWorkflowUseCase {
    pub fn new(
        config: Arc<AppConfig>,
        registry: Arc<dyn ProviderRegistry>,
        credentials: Arc<dyn CredentialCheck>,
        context_loader: Arc<dyn ContextLoaderPort>,
        renderer: Arc<dyn ResponseRenderer>,
        writer: Arc<dyn OutputWriter>,
        namer: Arc<dyn RunNamer>,
    ) -> Self {
        Self {
            config,
            context_loader,
            selector: SelectModelsUseCase::new(credentials),
            executor: ExecuteQueriesUseCase::new(registry),
            renderer,
            writer,
            namer,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Execute the use case without status reporting
    pub async fn execute(&self, input: WorkflowInput) -> Result<WorkflowOutput, PanelError> {
        self.execute_with_status(input, &NoStatus).await
    }

    /// Execute the use case, forwarding model status events to `observer`
    pub async fn execute_with_status(
        &self,
        input: WorkflowInput,
        observer: &dyn StatusObserver,
    ) -> Result<WorkflowOutput, PanelError> {
        let mut context = RunContext::default();

        // Setup
        let run_name = self.namer.name(Utc::now());
        context.run_name = Some(run_name.clone());
        context.output_dir = Some(input.output_dir.join(&run_name));
        info!("Starting run {}", run_name);

        // Input processing
        context.stage = WorkflowStage::Input;
        let prompt = self
            .load_prompt(&input)
            .map_err(|e| handle_workflow_error(e, &context))?;

        // Model selection
        context.stage = WorkflowStage::Selection;
        let selection = self
            .selector
            .execute(&self.config, &input.criteria)
            .map_err(|e| handle_workflow_error(e, &context))?;

        // Query execution
        context.stage = WorkflowStage::Execution;
        let mut options = QueryOptions::new(prompt)
            .with_timeout(input.timeout)
            .with_thinking(input.enable_thinking);
        if let Some(prompt) = &input.system_prompt_override {
            options = options.with_system_prompt(prompt.clone());
        }
        if let Some(token) = &self.cancellation {
            options = options.with_cancellation(token.clone());
        }
        let result = self
            .executor
            .execute_with_status(&self.config, &selection.selected, &options, observer)
            .await;

        // Output
        context.stage = WorkflowStage::Output;
        let (run_dir, written_files) = if result.responses.is_empty() {
            debug!("No responses to write");
            (None, Vec::new())
        } else {
            let (dir, files) = self
                .write_outputs(&input.output_dir, &run_name, &result)
                .await
                .map_err(|e| handle_workflow_error(e, &context))?;
            (Some(dir), files)
        };

        Ok(WorkflowOutput {
            run_name,
            run_dir,
            selection,
            result,
            written_files,
        })
    }

    fn load_prompt(&self, input: &WorkflowInput) -> Result<String, PanelError> {
        let instructions = self
            .context_loader
            .load_instructions(&input.instructions_path)?;
        let documents = self.context_loader.load_context(&input.context_paths)?;
        debug!("Loaded {} context document(s)", documents.len());
        PromptTemplate::combine(&instructions, &documents)
    }

    async fn write_outputs(
        &self,
        base: &Path,
        run_name: &str,
        result: &QueryExecutionResult,
    ) -> Result<(PathBuf, Vec<PathBuf>), PanelError> {
        let dir = self.writer.prepare_run_dir(base, run_name).await?;
        let generated_at = Utc::now();

        let mut taken = HashSet::new();
        let mut written = Vec::with_capacity(result.responses.len());
        for response in &result.responses {
            let mut document = self.renderer.render(response, generated_at);
            document.file_name = claim_file_name(&mut taken, &document.file_name);
            written.push(self.writer.write(&dir, &document).await?);
        }
        info!("Wrote {} file(s) to {}", written.len(), dir.display());
        Ok((dir, written))
    }
}

/// Reserve `name` in `taken`, appending `-2`, `-3`, ... before the
/// extension when it is already used. Duplicate model keys and names that
/// collide after sanitizing each keep their own file.
fn claim_file_name(taken: &mut HashSet<String>, name: &str) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 2;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        };
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
