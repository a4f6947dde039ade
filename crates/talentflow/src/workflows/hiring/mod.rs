//! Hiring workflow domain: job postings, candidate applications,
//! employer-authored stage templates, and the orchestration engine that
//! walks each application through its stages to a hire/reject decision.

pub mod domain;
pub mod repository;
pub mod router;

mod applications;
mod engine;
mod jobs;
mod templates;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use repository::{EntityStore, Notifier};

pub use applications::{ApplicationError, ApplicationService};
pub use engine::{StageCommand, WorkflowEngine, WorkflowError};
pub use jobs::{JobDraft, JobError, JobService};
pub use router::hiring_router;
pub use templates::{StageDraft, TemplateDraft, TemplateError, TemplateRegistry};

/// Bundle of the portal's services over one shared store and notifier. The
/// HTTP router and the CLI both consume this facade.
pub struct HiringPortal<S, N> {
    pub jobs: JobService<S, N>,
    pub applications: ApplicationService<S, N>,
    pub templates: TemplateRegistry<S, N>,
    pub workflows: WorkflowEngine<S, N>,
}

impl<S, N> HiringPortal<S, N>
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            jobs: JobService::new(store.clone(), notifier.clone()),
            applications: ApplicationService::new(store.clone(), notifier.clone()),
            templates: TemplateRegistry::new(store.clone(), notifier.clone()),
            workflows: WorkflowEngine::new(store, notifier),
        }
    }
}
