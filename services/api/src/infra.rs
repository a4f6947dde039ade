use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talentflow::workflows::hiring::domain::{
    ApplicationId, CandidateId, EmployerId, InstanceId, Job, JobApplication, JobId, TemplateId,
    WorkflowInstance, WorkflowTemplate,
};
use talentflow::workflows::hiring::repository::{
    ApplicationStore, InstanceStore, JobStore, Notice, Notifier, NotifyError, StoreError,
    TemplateStore,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Session-scoped entity store: plain mutex-guarded maps, one per
/// collection. Data lives only as long as the process.
#[derive(Default)]
pub(crate) struct InMemoryEntityStore {
    jobs: Mutex<HashMap<JobId, Job>>,
    applications: Mutex<HashMap<ApplicationId, JobApplication>>,
    templates: Mutex<HashMap<TemplateId, WorkflowTemplate>>,
    instances: Mutex<HashMap<InstanceId, WorkflowInstance>>,
}

impl JobStore for InMemoryEntityStore {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update_job(&self, job: Job) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if !guard.contains_key(&job.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(job.id.clone(), job);
        Ok(())
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove_job(&self, id: &JobId) -> Result<bool, StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.remove(id).is_some())
    }

    fn jobs_for_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| &job.employer_id == employer)
            .cloned()
            .collect())
    }
}

impl ApplicationStore for InMemoryEntityStore {
    fn insert_application(&self, app: JobApplication) -> Result<JobApplication, StoreError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&app.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(app.id.clone(), app.clone());
        Ok(app)
    }

    fn update_application(&self, app: JobApplication) -> Result<(), StoreError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if !guard.contains_key(&app.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(app.id.clone(), app);
        Ok(())
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_application(
        &self,
        candidate: &CandidateId,
        job: &JobId,
    ) -> Result<Option<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|app| &app.candidate_id == candidate && &app.job_id == job)
            .cloned())
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|app| &app.job_id == job)
            .cloned()
            .collect())
    }

    fn remove_applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, StoreError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let ids: Vec<ApplicationId> = guard
            .values()
            .filter(|app| &app.job_id == job)
            .map(|app| app.id.clone())
            .collect();
        Ok(ids.iter().filter_map(|id| guard.remove(id)).collect())
    }
}

impl TemplateStore for InMemoryEntityStore {
    fn insert_template(&self, template: WorkflowTemplate) -> Result<WorkflowTemplate, StoreError> {
        let mut guard = self.templates.lock().expect("template mutex poisoned");
        if guard.contains_key(&template.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(template.id.clone(), template.clone());
        Ok(template)
    }

    fn update_template(&self, template: WorkflowTemplate) -> Result<(), StoreError> {
        let mut guard = self.templates.lock().expect("template mutex poisoned");
        if !guard.contains_key(&template.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(template.id.clone(), template);
        Ok(())
    }

    fn fetch_template(&self, id: &TemplateId) -> Result<Option<WorkflowTemplate>, StoreError> {
        let guard = self.templates.lock().expect("template mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn templates_for_employer(
        &self,
        employer: &EmployerId,
    ) -> Result<Vec<WorkflowTemplate>, StoreError> {
        let guard = self.templates.lock().expect("template mutex poisoned");
        Ok(guard
            .values()
            .filter(|template| &template.employer_id == employer)
            .cloned()
            .collect())
    }
}

impl InstanceStore for InMemoryEntityStore {
    fn insert_instance(&self, instance: WorkflowInstance) -> Result<WorkflowInstance, StoreError> {
        let mut guard = self.instances.lock().expect("instance mutex poisoned");
        if guard.contains_key(&instance.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(instance.id.clone(), instance.clone());
        Ok(instance)
    }

    fn update_instance(&self, instance: WorkflowInstance) -> Result<(), StoreError> {
        let mut guard = self.instances.lock().expect("instance mutex poisoned");
        if !guard.contains_key(&instance.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(instance.id.clone(), instance);
        Ok(())
    }

    fn fetch_instance(&self, id: &InstanceId) -> Result<Option<WorkflowInstance>, StoreError> {
        let guard = self.instances.lock().expect("instance mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Notification sink that lands toast payloads in the service log.
#[derive(Default)]
pub(crate) struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn publish(&self, notice: Notice) -> Result<(), NotifyError> {
        info!(title = %notice.title, body = %notice.body, "portal notice");
        Ok(())
    }
}
