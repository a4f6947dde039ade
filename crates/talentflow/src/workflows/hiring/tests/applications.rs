use super::common::*;
use crate::workflows::hiring::domain::{
    ApplicationId, ApplicationStatus, JobId, JobStatus, WorkflowStatus,
};
use crate::workflows::hiring::{ApplicationError, JobError, StageCommand};

#[test]
fn apply_creates_applied_record() {
    let harness = build_portal();
    let application = seed_application(&harness);

    assert_eq!(application.status, ApplicationStatus::Applied);
    assert_eq!(application.candidate_id, candidate());
    assert!(application.workflow.is_none());
    assert!(harness
        .notifier
        .titles()
        .iter()
        .any(|title| title == "Application submitted"));
}

#[test]
fn duplicate_apply_returns_existing_record() {
    let harness = build_portal();
    let first = seed_application(&harness);

    let second = harness
        .portal
        .applications
        .apply(candidate(), first.job_id.clone())
        .expect("reapply is not an error");

    assert_eq!(second.id, first.id);
    assert_eq!(second.applied_at, first.applied_at);
    assert!(harness
        .notifier
        .titles()
        .iter()
        .any(|title| title == "Already applied"));
}

#[test]
fn apply_to_missing_job_errors() {
    let harness = build_portal();
    let result = harness
        .portal
        .applications
        .apply(candidate(), JobId::from("job-missing"));
    assert!(matches!(result, Err(ApplicationError::JobNotFound(_))));
}

#[test]
fn set_status_overwrites_and_stamps() {
    let harness = build_portal();
    let application = seed_application(&harness);

    let updated = harness
        .portal
        .applications
        .set_status(&application.id, ApplicationStatus::Shortlisted)
        .expect("status updates");

    assert_eq!(updated.status, ApplicationStatus::Shortlisted);
    assert!(updated.updated_at >= application.updated_at);
}

#[test]
fn set_status_on_missing_application_errors() {
    let harness = build_portal();
    let result = harness
        .portal
        .applications
        .set_status(&ApplicationId::from("app-missing"), ApplicationStatus::Hired);
    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[test]
fn job_update_replaces_fields() {
    let harness = build_portal();
    let job = harness
        .portal
        .jobs
        .create_job(employer(), job_draft())
        .expect("job creates");

    let mut draft = job_draft();
    draft.title = "Staff Backend Engineer".to_string();
    draft.status = JobStatus::Closed;
    let updated = harness
        .portal
        .jobs
        .update_job(&job.id, draft)
        .expect("job updates");

    assert_eq!(updated.title, "Staff Backend Engineer");
    assert_eq!(updated.status, JobStatus::Closed);
    assert_eq!(updated.created_at, job.created_at);
}

#[test]
fn update_missing_job_errors() {
    let harness = build_portal();
    let result = harness
        .portal
        .jobs
        .update_job(&JobId::from("job-missing"), job_draft());
    assert!(matches!(result, Err(JobError::NotFound(_))));
}

#[test]
fn delete_job_cascades_to_applications_and_cancels_runs() {
    let harness = build_portal();
    let (application, instance) = seed_workflow(&harness);

    harness
        .portal
        .jobs
        .delete_job(&application.job_id)
        .expect("job deletes");

    let gone = harness.portal.applications.get(&application.id);
    assert!(matches!(gone, Err(ApplicationError::NotFound(_))));

    // The run record survives but is canceled, not deleted.
    let run = harness
        .portal
        .workflows
        .get_instance(&instance.id)
        .expect("instance kept");
    assert_eq!(run.status, WorkflowStatus::Canceled);
}

#[test]
fn delete_job_leaves_finished_runs_alone() {
    let harness = build_portal();
    let application = seed_application(&harness);
    let template = seed_template(&harness, single_stage_draft());
    let instance = harness
        .portal
        .workflows
        .start_workflow(&application.id, &template.id)
        .expect("workflow starts");
    harness
        .portal
        .workflows
        .advance_stage(
            &instance.id,
            &instance.stages[0].id,
            StageCommand::Pass { feedback: None },
        )
        .expect("stage passes");

    harness
        .portal
        .jobs
        .delete_job(&application.job_id)
        .expect("job deletes");

    let run = harness
        .portal
        .workflows
        .get_instance(&instance.id)
        .expect("instance kept");
    assert_eq!(run.status, WorkflowStatus::Completed);
}

#[test]
fn delete_missing_job_errors() {
    let harness = build_portal();
    let result = harness.portal.jobs.delete_job(&JobId::from("job-missing"));
    assert!(matches!(result, Err(JobError::NotFound(_))));
}

#[test]
fn applications_listed_per_job() {
    let harness = build_portal();
    let application = seed_application(&harness);
    let listed = harness
        .portal
        .applications
        .applications_for_job(&application.job_id)
        .expect("listing succeeds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, application.id);
}
