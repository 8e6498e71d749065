//! Select Models use case
//!
//! Runs the domain selector against the loaded configuration with the
//! injected credential check, logging what was decided.

use panel_domain::{AppConfig, CredentialCheck, ModelSelector, PanelError, SelectionCriteria, SelectionResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SelectModelsUseCase {
    credentials: Arc<dyn CredentialCheck>,
}

impl SelectModelsUseCase {
    pub fn new(credentials: Arc<dyn CredentialCheck>) -> Self {
        Self { credentials }
    }

    pub fn execute(
        &self,
        config: &AppConfig,
        criteria: &SelectionCriteria,
    ) -> Result<SelectionResult, PanelError> {
        let result = ModelSelector::new(config, self.credentials.as_ref()).select(criteria)?;

        for warning in &result.warnings {
            warn!("{}", warning);
        }
        if !result.excluded_disabled.is_empty() {
            debug!(
                "Disabled models: {}",
                result
                    .excluded_disabled
                    .iter()
                    .map(|m| m.key())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        info!(
            "Selected {} model(s): {}",
            result.selected.len(),
            result.selected_keys().join(", ")
        );
        Ok(result)
    }
}
