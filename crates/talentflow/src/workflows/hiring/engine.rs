use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    next_id, ApplicationId, ApplicationStatus, InstanceId, JobApplication, StageId, StageStatus,
    TemplateId, WorkflowInstance, WorkflowStageInstance, WorkflowStatus,
};
use super::repository::{
    ApplicationStore, InstanceStore, Notice, Notifier, StoreError, TemplateStore,
};

/// The closed set of transitions a stage can take. There is no free-form
/// patching of stage fields; a state change not listed here cannot be
/// expressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StageCommand {
    /// Mark the active stage as passed and hand over to the next one.
    Pass {
        #[serde(default)]
        feedback: Option<String>,
    },
    /// Mark the active stage as failed, ending the workflow.
    Fail {
        #[serde(default)]
        feedback: Option<String>,
    },
    /// Annotate a stage with scheduling metadata without advancing it.
    Schedule {
        at: DateTime<Utc>,
        #[serde(default)]
        assigned_to: Option<String>,
    },
}

impl StageCommand {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass { .. } => "pass",
            Self::Fail { .. } => "fail",
            Self::Schedule { .. } => "schedule",
        }
    }

    const fn past_label(&self) -> &'static str {
        match self {
            Self::Pass { .. } => "passed",
            Self::Fail { .. } => "failed",
            Self::Schedule { .. } => "scheduled",
        }
    }
}

/// Error raised by the orchestration engine. All variants are caller errors
/// over bad ids or illegal transitions; none is transient.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow template {0} not found")]
    TemplateNotFound(TemplateId),
    #[error("workflow instance {0} not found")]
    InstanceNotFound(InstanceId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("stage {stage} is not part of workflow {instance}")]
    StageNotFound { instance: InstanceId, stage: StageId },
    #[error("workflow template {0} has no stages")]
    EmptyTemplate(TemplateId),
    #[error("application {0} already has a workflow; restart it explicitly")]
    WorkflowAlreadyStarted(ApplicationId),
    #[error("workflow {instance} is already {status}")]
    WorkflowFinished {
        instance: InstanceId,
        status: &'static str,
    },
    #[error("stage {stage} cannot accept '{command}' while {status}")]
    StageNotActive {
        stage: StageId,
        command: &'static str,
        status: &'static str,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates hiring workflow runs: instantiates a template against an
/// application, advances the run stage by stage, and writes the final
/// hired/rejected status back onto the application.
pub struct WorkflowEngine<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    /// Serializes every instance read-modify-write. Two concurrent
    /// advancements of the same run must not interleave, or the
    /// single-active-stage invariant is lost.
    write_lock: Mutex<()>,
}

impl<S, N> WorkflowEngine<S, N>
where
    S: TemplateStore + ApplicationStore + InstanceStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// Instantiate `template_id` against an application that has no workflow
    /// yet. The first stage starts `in_progress`, the rest `pending`.
    pub fn start_workflow(
        &self,
        application_id: &ApplicationId,
        template_id: &TemplateId,
    ) -> Result<WorkflowInstance, WorkflowError> {
        let _guard = self.write_lock.lock().expect("engine mutex poisoned");

        let application = self.fetch_application(application_id)?;
        if application.workflow.is_some() {
            return Err(WorkflowError::WorkflowAlreadyStarted(application_id.clone()));
        }

        self.instantiate(application, template_id)
    }

    /// Replace an application's workflow with a fresh run of `template_id`.
    /// A previous run still in flight is canceled, never deleted.
    pub fn restart_workflow(
        &self,
        application_id: &ApplicationId,
        template_id: &TemplateId,
    ) -> Result<WorkflowInstance, WorkflowError> {
        let _guard = self.write_lock.lock().expect("engine mutex poisoned");

        let application = self.fetch_application(application_id)?;
        if let Some(previous_id) = &application.workflow {
            if let Some(mut previous) = self.store.fetch_instance(previous_id)? {
                if previous.status == WorkflowStatus::InProgress {
                    previous.status = WorkflowStatus::Canceled;
                    previous.updated_at = Utc::now();
                    self.store.update_instance(previous)?;
                }
            }
        }

        self.instantiate(application, template_id)
    }

    /// Apply one transition command to a stage of a live run and re-derive
    /// the run's current stage and overall status.
    pub fn advance_stage(
        &self,
        instance_id: &InstanceId,
        stage_id: &StageId,
        command: StageCommand,
    ) -> Result<WorkflowInstance, WorkflowError> {
        let _guard = self.write_lock.lock().expect("engine mutex poisoned");

        let mut instance = self
            .store
            .fetch_instance(instance_id)?
            .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))?;

        if instance.status.is_terminal() {
            return Err(WorkflowError::WorkflowFinished {
                instance: instance_id.clone(),
                status: instance.status.label(),
            });
        }

        let position = instance
            .stages
            .iter()
            .position(|stage| &stage.id == stage_id)
            .ok_or_else(|| WorkflowError::StageNotFound {
                instance: instance_id.clone(),
                stage: stage_id.clone(),
            })?;

        let now = Utc::now();
        let stage_name = instance.stages[position].name.clone();
        let command_label = command.label();
        let verb = command.past_label();
        let mut outcome = None;

        match command {
            StageCommand::Pass { feedback } => {
                close_stage(&mut instance.stages[position], StageStatus::Passed, feedback, now)
                    .map_err(|status| Self::not_active(stage_id, command_label, status))?;

                if position + 1 < instance.stages.len() {
                    // Next stage by normalized order; stages are kept sorted.
                    let next = &mut instance.stages[position + 1];
                    next.status = StageStatus::InProgress;
                    instance.current_stage_id = next.id.clone();
                } else {
                    instance.status = WorkflowStatus::Completed;
                    outcome = Some(ApplicationStatus::Hired);
                }
            }
            StageCommand::Fail { feedback } => {
                close_stage(&mut instance.stages[position], StageStatus::Failed, feedback, now)
                    .map_err(|status| Self::not_active(stage_id, command_label, status))?;

                // A failed stage ends the run even if later stages exist.
                instance.status = WorkflowStatus::Completed;
                outcome = Some(ApplicationStatus::Rejected);
            }
            StageCommand::Schedule { at, assigned_to } => {
                let stage = &mut instance.stages[position];
                if stage.status.is_terminal() {
                    return Err(Self::not_active(stage_id, command_label, stage.status));
                }
                stage.scheduled_at = Some(at);
                if let Some(assignee) = assigned_to {
                    stage.assigned_to = Some(assignee);
                }
            }
        }

        instance.updated_at = now;

        match outcome {
            Some(final_status) => {
                // Load the application before persisting anything so a bad
                // reference surfaces with no partial write.
                let mut application = self.fetch_application(&instance.application_id)?;
                self.store.update_instance(instance.clone())?;

                application.status = final_status;
                application.updated_at = now;
                self.store.update_application(application)?;

                info!(
                    instance = %instance.id,
                    application = %instance.application_id,
                    outcome = final_status.label(),
                    "workflow completed"
                );
                self.notify(
                    "Workflow completed",
                    format!(
                        "Stage '{stage_name}' {}; candidate {}.",
                        if final_status == ApplicationStatus::Hired {
                            "passed"
                        } else {
                            "failed"
                        },
                        final_status.label()
                    ),
                );
            }
            None => {
                self.store.update_instance(instance.clone())?;
                self.notify(
                    "Workflow stage updated",
                    format!("Stage '{stage_name}' {verb}."),
                );
            }
        }

        Ok(instance)
    }

    pub fn get_instance(&self, instance_id: &InstanceId) -> Result<WorkflowInstance, WorkflowError> {
        self.store
            .fetch_instance(instance_id)?
            .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))
    }

    /// The run currently attached to an application. Resolves through the
    /// application's workflow reference, so a canceled predecessor left by
    /// a restart is never returned.
    pub fn instance_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<WorkflowInstance>, WorkflowError> {
        let Some(application) = self.store.fetch_application(application_id)? else {
            return Ok(None);
        };
        match application.workflow {
            Some(instance_id) => Ok(self.store.fetch_instance(&instance_id)?),
            None => Ok(None),
        }
    }

    fn instantiate(
        &self,
        mut application: JobApplication,
        template_id: &TemplateId,
    ) -> Result<WorkflowInstance, WorkflowError> {
        let template = self
            .store
            .fetch_template(template_id)?
            .ok_or_else(|| WorkflowError::TemplateNotFound(template_id.clone()))?;

        if template.stages.is_empty() {
            return Err(WorkflowError::EmptyTemplate(template_id.clone()));
        }

        let mut ordered = template.stages.clone();
        ordered.sort_by_key(|stage| stage.order);

        let instance_id = InstanceId(next_id("wi"));
        let now = Utc::now();
        let stages: Vec<WorkflowStageInstance> = ordered
            .into_iter()
            .enumerate()
            .map(|(index, stage)| WorkflowStageInstance {
                id: StageId(next_id("ws")),
                workflow_instance_id: instance_id.clone(),
                template_stage_id: stage.id,
                name: stage.name,
                order: index as u32 + 1,
                status: if index == 0 {
                    StageStatus::InProgress
                } else {
                    StageStatus::Pending
                },
                feedback: None,
                assigned_to: None,
                scheduled_at: None,
                completed_at: None,
            })
            .collect();

        let instance = WorkflowInstance {
            current_stage_id: stages[0].id.clone(),
            id: instance_id,
            application_id: application.id.clone(),
            workflow_template_id: template_id.clone(),
            status: WorkflowStatus::InProgress,
            stages,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert_instance(instance)?;

        application.workflow = Some(stored.id.clone());
        application.updated_at = now;
        self.store.update_application(application)?;

        info!(instance = %stored.id, application = %stored.application_id, "workflow started");
        self.notify(
            "Workflow started",
            "A new workflow has been started for this application.".to_string(),
        );
        Ok(stored)
    }

    fn fetch_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<JobApplication, WorkflowError> {
        self.store
            .fetch_application(application_id)?
            .ok_or_else(|| WorkflowError::ApplicationNotFound(application_id.clone()))
    }

    fn not_active(stage_id: &StageId, command: &'static str, status: StageStatus) -> WorkflowError {
        WorkflowError::StageNotActive {
            stage: stage_id.clone(),
            command,
            status: status.label(),
        }
    }

    fn notify(&self, title: &str, body: String) {
        if let Err(err) = self.notifier.publish(Notice::new(title, body)) {
            warn!(error = %err, "dropping workflow notice");
        }
    }
}

/// Pass/fail a stage; only the stage currently awaiting action may be
/// closed. Returns the offending status on refusal.
fn close_stage(
    stage: &mut WorkflowStageInstance,
    status: StageStatus,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), StageStatus> {
    if stage.status != StageStatus::InProgress {
        return Err(stage.status);
    }
    stage.status = status;
    if let Some(text) = feedback {
        stage.feedback = Some(text);
    }
    stage.completed_at = Some(now);
    Ok(())
}
