use super::domain::{
    ApplicationId, CandidateId, EmployerId, InstanceId, Job, JobApplication, JobId, TemplateId,
    WorkflowInstance, WorkflowTemplate,
};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam for job postings.
pub trait JobStore: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError>;
    fn update_job(&self, job: Job) -> Result<(), StoreError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    /// Remove a job record; returns whether anything was deleted.
    fn remove_job(&self, id: &JobId) -> Result<bool, StoreError>;
    fn jobs_for_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, StoreError>;
}

/// Storage seam for job applications.
pub trait ApplicationStore: Send + Sync {
    fn insert_application(&self, app: JobApplication) -> Result<JobApplication, StoreError>;
    fn update_application(&self, app: JobApplication) -> Result<(), StoreError>;
    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, StoreError>;
    fn find_application(
        &self,
        candidate: &CandidateId,
        job: &JobId,
    ) -> Result<Option<JobApplication>, StoreError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, StoreError>;
    /// Cascade hook for job deletion; returns the removed records.
    fn remove_applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, StoreError>;
}

/// Storage seam for workflow templates.
pub trait TemplateStore: Send + Sync {
    fn insert_template(&self, template: WorkflowTemplate) -> Result<WorkflowTemplate, StoreError>;
    fn update_template(&self, template: WorkflowTemplate) -> Result<(), StoreError>;
    fn fetch_template(&self, id: &TemplateId) -> Result<Option<WorkflowTemplate>, StoreError>;
    fn templates_for_employer(
        &self,
        employer: &EmployerId,
    ) -> Result<Vec<WorkflowTemplate>, StoreError>;
}

/// Storage seam for live workflow instances.
pub trait InstanceStore: Send + Sync {
    fn insert_instance(&self, instance: WorkflowInstance) -> Result<WorkflowInstance, StoreError>;
    fn update_instance(&self, instance: WorkflowInstance) -> Result<(), StoreError>;
    fn fetch_instance(&self, id: &InstanceId) -> Result<Option<WorkflowInstance>, StoreError>;
}

/// Union bound for components that need the whole entity store.
pub trait EntityStore: JobStore + ApplicationStore + TemplateStore + InstanceStore {}

impl<T> EntityStore for T where T: JobStore + ApplicationStore + TemplateStore + InstanceStore {}

/// Toast-style payload surfaced to users after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Trait describing the outbound notification sink. Delivery is best-effort
/// observability; callers log and swallow failures.
pub trait Notifier: Send + Sync {
    fn publish(&self, notice: Notice) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
