use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    next_id, EmployerId, StageId, StageKind, TemplateId, WorkflowStageTemplate, WorkflowTemplate,
};
use super::repository::{Notice, Notifier, StoreError, TemplateStore};

/// Authoring payload for one stage of a template. The authored `order` only
/// expresses relative position; the registry renumbers it on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: StageKind,
    pub order: u32,
    #[serde(default = "StageDraft::default_required")]
    pub required: bool,
}

impl StageDraft {
    fn default_required() -> bool {
        true
    }
}

/// Authoring payload for a workflow template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stages: Vec<StageDraft>,
    #[serde(default = "TemplateDraft::default_active")]
    pub is_active: bool,
}

impl TemplateDraft {
    fn default_active() -> bool {
        true
    }
}

/// Error raised by template authoring operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("workflow template {0} not found")]
    NotFound(TemplateId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registry of employer-authored stage sequences. Templates are read-shared
/// by every instance derived from them; edits here never reach into runs
/// already started.
pub struct TemplateRegistry<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> TemplateRegistry<S, N>
where
    S: TemplateStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub fn create_template(
        &self,
        employer_id: EmployerId,
        draft: TemplateDraft,
    ) -> Result<WorkflowTemplate, TemplateError> {
        let template_id = TemplateId(next_id("wt"));
        let now = Utc::now();
        let template = WorkflowTemplate {
            stages: normalized_stages(&template_id, draft.stages),
            id: template_id,
            employer_id,
            name: draft.name,
            description: draft.description,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert_template(template)?;
        self.notify(
            "Workflow template created",
            format!("'{}' is ready to use.", stored.name),
        );
        Ok(stored)
    }

    /// Replace a template's fields and stage list. Instances copy stage
    /// name/id at creation, so running workflows are unaffected.
    pub fn update_template(
        &self,
        template_id: &TemplateId,
        draft: TemplateDraft,
    ) -> Result<WorkflowTemplate, TemplateError> {
        let mut template = self
            .store
            .fetch_template(template_id)?
            .ok_or_else(|| TemplateError::NotFound(template_id.clone()))?;

        template.name = draft.name;
        template.description = draft.description;
        template.stages = normalized_stages(template_id, draft.stages);
        template.is_active = draft.is_active;
        template.updated_at = Utc::now();

        self.store.update_template(template.clone())?;
        self.notify(
            "Workflow template updated",
            format!("'{}' has been updated.", template.name),
        );
        Ok(template)
    }

    pub fn get_template(&self, template_id: &TemplateId) -> Result<WorkflowTemplate, TemplateError> {
        self.store
            .fetch_template(template_id)?
            .ok_or_else(|| TemplateError::NotFound(template_id.clone()))
    }

    pub fn templates_for_employer(
        &self,
        employer: &EmployerId,
    ) -> Result<Vec<WorkflowTemplate>, TemplateError> {
        Ok(self.store.templates_for_employer(employer)?)
    }

    fn notify(&self, title: &str, body: String) {
        if let Err(err) = self.notifier.publish(Notice::new(title, body)) {
            warn!(error = %err, "dropping template notice");
        }
    }
}

/// Sort drafts by authored order (stable, so ties keep their authored
/// sequence) and renumber into the dense 1-based run order instantiation
/// relies on.
fn normalized_stages(
    template_id: &TemplateId,
    mut drafts: Vec<StageDraft>,
) -> Vec<WorkflowStageTemplate> {
    drafts.sort_by_key(|draft| draft.order);
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| WorkflowStageTemplate {
            id: StageId(next_id("wts")),
            workflow_template_id: template_id.clone(),
            name: draft.name,
            description: draft.description,
            kind: draft.kind,
            order: index as u32 + 1,
            required: draft.required,
        })
        .collect()
}
