use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{
    next_id, ApplicationId, ApplicationStatus, CandidateId, JobApplication, JobId,
};
use super::repository::{ApplicationStore, JobStore, Notice, Notifier, StoreError};

/// Error raised by application lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Manages the lifecycle of a job application independent of any workflow:
/// intake on apply, and direct employer-driven status transitions.
pub struct ApplicationService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> ApplicationService<S, N>
where
    S: ApplicationStore + JobStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Submit an application. Applying twice to the same job is not an
    /// error: the existing record is returned unchanged.
    pub fn apply(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<JobApplication, ApplicationError> {
        if self.store.fetch_job(&job_id)?.is_none() {
            return Err(ApplicationError::JobNotFound(job_id));
        }

        if let Some(existing) = self.store.find_application(&candidate_id, &job_id)? {
            self.notify(
                "Already applied",
                "You have already applied for this job.".to_string(),
            );
            return Ok(existing);
        }

        let now = Utc::now();
        let application = JobApplication {
            id: ApplicationId(next_id("app")),
            job_id,
            candidate_id,
            status: ApplicationStatus::Applied,
            applied_at: now,
            updated_at: now,
            workflow: None,
        };

        let stored = self.store.insert_application(application)?;
        self.notify(
            "Application submitted",
            "Your job application has been submitted successfully.".to_string(),
        );
        Ok(stored)
    }

    /// Direct status transition by an employer. Workflow completion
    /// overwrites this field on its own; any status set here can later be
    /// replaced by the engine's hired/rejected resolution.
    pub fn set_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<JobApplication, ApplicationError> {
        let mut application = self
            .store
            .fetch_application(application_id)?
            .ok_or_else(|| ApplicationError::NotFound(application_id.clone()))?;

        application.status = status;
        application.updated_at = Utc::now();
        self.store.update_application(application.clone())?;

        self.notify(
            "Application updated",
            format!("Application status updated to {}.", status.label()),
        );
        Ok(application)
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<JobApplication, ApplicationError> {
        self.store
            .fetch_application(application_id)?
            .ok_or_else(|| ApplicationError::NotFound(application_id.clone()))
    }

    pub fn applications_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<JobApplication>, ApplicationError> {
        Ok(self.store.applications_for_job(job_id)?)
    }

    fn notify(&self, title: &str, body: String) {
        if let Err(err) = self.notifier.publish(Notice::new(title, body)) {
            warn!(error = %err, "dropping application notice");
        }
    }
}
