use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    next_id, EmployerId, Job, JobId, JobStatus, JobType, SalaryRange, WorkflowStatus,
};
use super::repository::{
    ApplicationStore, InstanceStore, JobStore, Notice, Notifier, StoreError,
};

/// Input payload for authoring a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default = "JobDraft::default_type")]
    pub job_type: JobType,
    #[serde(default = "JobDraft::default_status")]
    pub status: JobStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl JobDraft {
    fn default_type() -> JobType {
        JobType::FullTime
    }

    fn default_status() -> JobStatus {
        JobStatus::Draft
    }
}

/// Error raised by job posting operations.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Manages job postings and the deletion cascade over their applications.
pub struct JobService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> JobService<S, N>
where
    S: JobStore + ApplicationStore + InstanceStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub fn create_job(&self, employer_id: EmployerId, draft: JobDraft) -> Result<Job, JobError> {
        let job = Job {
            id: JobId(next_id("job")),
            employer_id,
            title: draft.title,
            description: draft.description,
            requirements: draft.requirements,
            location: draft.location,
            salary: draft.salary,
            job_type: draft.job_type,
            status: draft.status,
            created_at: Utc::now(),
            expires_at: draft.expires_at,
        };

        let stored = self.store.insert_job(job)?;
        self.notify("Job created", format!("'{}' is ready to publish.", stored.title));
        Ok(stored)
    }

    pub fn update_job(&self, job_id: &JobId, draft: JobDraft) -> Result<Job, JobError> {
        let mut job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| JobError::NotFound(job_id.clone()))?;

        job.title = draft.title;
        job.description = draft.description;
        job.requirements = draft.requirements;
        job.location = draft.location;
        job.salary = draft.salary;
        job.job_type = draft.job_type;
        job.status = draft.status;
        job.expires_at = draft.expires_at;

        self.store.update_job(job.clone())?;
        self.notify("Job updated", format!("'{}' has been updated.", job.title));
        Ok(job)
    }

    pub fn get_job(&self, job_id: &JobId) -> Result<Job, JobError> {
        self.store
            .fetch_job(job_id)?
            .ok_or_else(|| JobError::NotFound(job_id.clone()))
    }

    pub fn jobs_for_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, JobError> {
        Ok(self.store.jobs_for_employer(employer)?)
    }

    /// Delete a posting. Its applications are removed with it (the one hard
    /// delete in the system) and any workflow run still in flight for one of
    /// them is canceled rather than deleted.
    pub fn delete_job(&self, job_id: &JobId) -> Result<(), JobError> {
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| JobError::NotFound(job_id.clone()))?;

        let removed = self.store.remove_applications_for_job(job_id)?;
        for application in &removed {
            let Some(instance_id) = &application.workflow else {
                continue;
            };
            let Some(mut instance) = self.store.fetch_instance(instance_id)? else {
                continue;
            };
            if instance.status == WorkflowStatus::InProgress {
                instance.status = WorkflowStatus::Canceled;
                instance.updated_at = Utc::now();
                self.store.update_instance(instance)?;
            }
        }

        self.store.remove_job(job_id)?;
        self.notify(
            "Job deleted",
            format!(
                "'{}' and {} application(s) were removed.",
                job.title,
                removed.len()
            ),
        );
        Ok(())
    }

    fn notify(&self, title: &str, body: String) {
        if let Err(err) = self.notifier.publish(Notice::new(title, body)) {
            warn!(error = %err, "dropping job notice");
        }
    }
}
