use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::applications::ApplicationError;
use super::domain::{
    ApplicationId, ApplicationStatus, CandidateId, EmployerId, InstanceId, JobId, StageId,
    TemplateId,
};
use super::engine::{StageCommand, WorkflowError};
use super::jobs::{JobDraft, JobError};
use super::repository::{EntityStore, Notifier, StoreError};
use super::templates::{TemplateDraft, TemplateError};
use super::HiringPortal;

/// Router builder exposing the hiring boundary contract over HTTP.
pub fn hiring_router<S, N>(portal: Arc<HiringPortal<S, N>>) -> Router
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/hiring/jobs",
            post(create_job_handler::<S, N>).get(list_jobs_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/jobs/:job_id",
            get(get_job_handler::<S, N>)
                .put(update_job_handler::<S, N>)
                .delete(delete_job_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/jobs/:job_id/applications",
            post(apply_handler::<S, N>).get(list_applications_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/applications/:application_id",
            get(get_application_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/applications/:application_id/status",
            post(set_status_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/templates",
            post(create_template_handler::<S, N>).get(list_templates_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/templates/:template_id",
            put(update_template_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/applications/:application_id/workflow",
            post(start_workflow_handler::<S, N>).get(get_workflow_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/applications/:application_id/workflow/restart",
            post(restart_workflow_handler::<S, N>),
        )
        .route(
            "/api/v1/hiring/workflows/:instance_id/stages/:stage_id",
            post(advance_stage_handler::<S, N>),
        )
        .with_state(portal)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployerQuery {
    pub(crate) employer_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateJobRequest {
    pub(crate) employer_id: String,
    #[serde(flatten)]
    pub(crate) draft: JobDraft,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    pub(crate) candidate_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    pub(crate) status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTemplateRequest {
    pub(crate) employer_id: String,
    #[serde(flatten)]
    pub(crate) draft: TemplateDraft,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartWorkflowRequest {
    pub(crate) template_id: String,
}

pub(crate) async fn create_job_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Json(request): Json<CreateJobRequest>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .jobs
        .create_job(EmployerId(request.employer_id), request.draft)
    {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn get_job_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.jobs.get_job(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn update_job_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(job_id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.jobs.update_job(&JobId(job_id), draft) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn delete_job_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.jobs.delete_job(&JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn list_jobs_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Query(query): Query<EmployerQuery>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .jobs
        .jobs_for_employer(&EmployerId(query.employer_id))
    {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn apply_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .applications
        .apply(CandidateId(request.candidate_id), JobId(job_id))
    {
        Ok(application) => (StatusCode::ACCEPTED, Json(application)).into_response(),
        Err(err) => application_error_response(err),
    }
}

pub(crate) async fn list_applications_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.applications.applications_for_job(&JobId(job_id)) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => application_error_response(err),
    }
}

pub(crate) async fn get_application_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.applications.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => application_error_response(err),
    }
}

pub(crate) async fn set_status_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .applications
        .set_status(&ApplicationId(application_id), request.status)
    {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => application_error_response(err),
    }
}

pub(crate) async fn create_template_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Json(request): Json<CreateTemplateRequest>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .templates
        .create_template(EmployerId(request.employer_id), request.draft)
    {
        Ok(template) => (StatusCode::CREATED, Json(template)).into_response(),
        Err(err) => template_error_response(err),
    }
}

pub(crate) async fn update_template_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(template_id): Path<String>,
    Json(draft): Json<TemplateDraft>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .templates
        .update_template(&TemplateId(template_id), draft)
    {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(err) => template_error_response(err),
    }
}

pub(crate) async fn list_templates_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Query(query): Query<EmployerQuery>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .templates
        .templates_for_employer(&EmployerId(query.employer_id))
    {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(err) => template_error_response(err),
    }
}

pub(crate) async fn start_workflow_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(application_id): Path<String>,
    Json(request): Json<StartWorkflowRequest>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.workflows.start_workflow(
        &ApplicationId(application_id),
        &TemplateId(request.template_id),
    ) {
        Ok(instance) => (StatusCode::CREATED, Json(instance)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn restart_workflow_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(application_id): Path<String>,
    Json(request): Json<StartWorkflowRequest>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal.workflows.restart_workflow(
        &ApplicationId(application_id),
        &TemplateId(request.template_id),
    ) {
        Ok(instance) => (StatusCode::OK, Json(instance)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn get_workflow_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .workflows
        .instance_for_application(&ApplicationId(application_id.clone()))
    {
        Ok(Some(instance)) => (StatusCode::OK, Json(instance)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("application {application_id} has no workflow"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => workflow_error_response(err),
    }
}

pub(crate) async fn advance_stage_handler<S, N>(
    State(portal): State<Arc<HiringPortal<S, N>>>,
    Path((instance_id, stage_id)): Path<(String, String)>,
    Json(command): Json<StageCommand>,
) -> Response
where
    S: EntityStore + 'static,
    N: Notifier + 'static,
{
    match portal
        .workflows
        .advance_stage(&InstanceId(instance_id), &StageId(stage_id), command)
    {
        Ok(instance) => (StatusCode::OK, Json(instance)).into_response(),
        Err(err) => workflow_error_response(err),
    }
}

fn error_payload(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Conflict => StatusCode::CONFLICT,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn job_error_response(err: JobError) -> Response {
    let status = match &err {
        JobError::NotFound(_) => StatusCode::NOT_FOUND,
        JobError::Store(source) => store_status(source),
    };
    error_payload(status, err.to_string())
}

fn application_error_response(err: ApplicationError) -> Response {
    let status = match &err {
        ApplicationError::JobNotFound(_) | ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
        ApplicationError::Store(source) => store_status(source),
    };
    error_payload(status, err.to_string())
}

fn template_error_response(err: TemplateError) -> Response {
    let status = match &err {
        TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
        TemplateError::Store(source) => store_status(source),
    };
    error_payload(status, err.to_string())
}

fn workflow_error_response(err: WorkflowError) -> Response {
    let status = match &err {
        WorkflowError::TemplateNotFound(_)
        | WorkflowError::InstanceNotFound(_)
        | WorkflowError::ApplicationNotFound(_)
        | WorkflowError::StageNotFound { .. } => StatusCode::NOT_FOUND,
        WorkflowError::WorkflowAlreadyStarted(_) => StatusCode::CONFLICT,
        WorkflowError::EmptyTemplate(_)
        | WorkflowError::WorkflowFinished { .. }
        | WorkflowError::StageNotActive { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Store(source) => store_status(source),
    };
    error_payload(status, err.to_string())
}
