use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::hiring::{ApplicationError, JobError, TemplateError, WorkflowError};
use std::fmt;

/// Application-boundary error for the server and CLI entry points.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Workflow(WorkflowError),
    Application(ApplicationError),
    Job(JobError),
    Template(TemplateError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
            AppError::Application(err) => write!(f, "application error: {}", err),
            AppError::Job(err) => write!(f, "job error: {}", err),
            AppError::Template(err) => write!(f, "template error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Workflow(err) => Some(err),
            AppError::Application(err) => Some(err),
            AppError::Job(err) => Some(err),
            AppError::Template(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<WorkflowError> for AppError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<ApplicationError> for AppError {
    fn from(value: ApplicationError) -> Self {
        Self::Application(value)
    }
}

impl From<JobError> for AppError {
    fn from(value: JobError) -> Self {
        Self::Job(value)
    }
}

impl From<TemplateError> for AppError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}
