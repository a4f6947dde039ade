use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::hiring::domain::{
    ApplicationId, CandidateId, EmployerId, InstanceId, Job, JobApplication, JobId, JobStatus,
    JobType, StageKind, TemplateId, WorkflowInstance, WorkflowTemplate,
};
use crate::workflows::hiring::repository::{
    ApplicationStore, InstanceStore, JobStore, Notice, Notifier, NotifyError, StoreError,
    TemplateStore,
};
use crate::workflows::hiring::{HiringPortal, JobDraft, StageDraft, TemplateDraft};

#[derive(Default)]
pub(super) struct MemoryStore {
    jobs: Mutex<HashMap<JobId, Job>>,
    applications: Mutex<HashMap<ApplicationId, JobApplication>>,
    templates: Mutex<HashMap<TemplateId, WorkflowTemplate>>,
    instances: Mutex<HashMap<InstanceId, WorkflowInstance>>,
}

impl JobStore for MemoryStore {
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

impl ApplicationStore for MemoryStore {
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

impl TemplateStore for MemoryStore {
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

impl InstanceStore for MemoryStore {
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

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notice mutex poisoned").clone()
    }

    pub(super) fn titles(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .map(|notice| notice.title)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn publish(&self, notice: Notice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Sink that refuses every notice; mutations must still succeed.
pub(super) struct DeadNotifier;

impl Notifier for DeadNotifier {
    fn publish(&self, _notice: Notice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("sink offline".to_string()))
    }
}

pub(super) struct Harness {
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) portal: Arc<HiringPortal<MemoryStore, MemoryNotifier>>,
}

pub(super) fn build_portal() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let portal = Arc::new(HiringPortal::new(store, notifier.clone()));
    Harness { notifier, portal }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn employer() -> EmployerId {
    EmployerId::from("emp-001")
}

pub(super) fn candidate() -> CandidateId {
    CandidateId::from("cand-001")
}

pub(super) fn job_draft() -> JobDraft {
    JobDraft {
        title: "Senior Backend Engineer".to_string(),
        description: "Own the services behind the candidate pipeline.".to_string(),
        requirements: "5+ years building networked services.".to_string(),
        location: "Remote".to_string(),
        salary: None,
        job_type: JobType::FullTime,
        status: JobStatus::Published,
        expires_at: None,
    }
}

pub(super) fn stage_draft(name: &str, kind: StageKind, order: u32) -> StageDraft {
    StageDraft {
        name: name.to_string(),
        description: String::new(),
        kind,
        order,
        required: true,
    }
}

/// Screening, interview, decision. The standard three-stage pipeline used
/// across the engine tests.
pub(super) fn template_draft() -> TemplateDraft {
    TemplateDraft {
        name: "Engineering hiring".to_string(),
        description: "Default pipeline for engineering roles.".to_string(),
        stages: vec![
            stage_draft("Resume Screening", StageKind::ResumeScreening, 1),
            stage_draft("Technical Interview", StageKind::TechnicalInterview, 2),
            stage_draft("Final Decision", StageKind::FinalDecision, 3),
        ],
        is_active: true,
    }
}

pub(super) fn single_stage_draft() -> TemplateDraft {
    TemplateDraft {
        name: "Screening only".to_string(),
        description: String::new(),
        stages: vec![stage_draft("Resume Screening", StageKind::ResumeScreening, 1)],
        is_active: true,
    }
}

/// Create a published job and one application from the default candidate.
pub(super) fn seed_application(harness: &Harness) -> JobApplication {
    let job = harness
        .portal
        .jobs
        .create_job(employer(), job_draft())
        .expect("job creates");
    harness
        .portal
        .applications
        .apply(candidate(), job.id)
        .expect("application submits")
}

pub(super) fn seed_template(harness: &Harness, draft: TemplateDraft) -> WorkflowTemplate {
    harness
        .portal
        .templates
        .create_template(employer(), draft)
        .expect("template creates")
}

/// Seed an application with a started three-stage workflow.
pub(super) fn seed_workflow(harness: &Harness) -> (JobApplication, WorkflowInstance) {
    let application = seed_application(harness);
    let template = seed_template(harness, template_draft());
    let instance = harness
        .portal
        .workflows
        .start_workflow(&application.id, &template.id)
        .expect("workflow starts");
    (application, instance)
}
