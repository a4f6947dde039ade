use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Mint a process-unique id with a per-entity prefix (`job-000001`,
/// `app-000002`, ...). A single shared counter keeps ids unique across
/// entity kinds within a session.
pub(crate) fn next_id(prefix: &str) -> String {
    let id = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a job posting.
    JobId
);
string_id!(
    /// Identifier of a submitted job application.
    ApplicationId
);
string_id!(
    /// Identifier of an employer account.
    EmployerId
);
string_id!(
    /// Identifier of a candidate account.
    CandidateId
);
string_id!(
    /// Identifier of a workflow template.
    TemplateId
);
string_id!(
    /// Identifier of a live workflow instance.
    InstanceId
);
string_id!(
    /// Identifier of a stage, either a template definition or a live
    /// per-run stage instance.
    StageId
);

/// The kind of hiring step a stage represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    ResumeScreening,
    PhoneInterview,
    TechnicalInterview,
    HrInterview,
    Assessment,
    FinalDecision,
}

impl StageKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ResumeScreening => "Resume Screening",
            Self::PhoneInterview => "Phone Interview",
            Self::TechnicalInterview => "Technical Interview",
            Self::HrInterview => "HR Interview",
            Self::Assessment => "Assessment",
            Self::FinalDecision => "Final Decision",
        }
    }
}

/// Progress of one stage within a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    InProgress,
    Passed,
    Failed,
}

impl StageStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
        }
    }

    /// Passed and failed stages never change again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// Overall state of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    InProgress,
    Completed,
    Canceled,
}

impl WorkflowStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

/// Lifecycle status of a job application as employers see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Reviewing,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Reviewing => "reviewing",
            Self::Shortlisted => "shortlisted",
            Self::Rejected => "rejected",
            Self::Hired => "hired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Published,
    Closed,
}

/// Advertised pay band for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

/// A job posting owned by an employer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer_id: EmployerId,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub salary: Option<SalaryRange>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A candidate's application to one job. The attached workflow run, if any,
/// is referenced by id; the instance record is the source of truth for
/// progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workflow: Option<InstanceId>,
}

/// Immutable stage definition inside a template. `order` is normalized to a
/// dense 1-based sequence by the registry on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStageTemplate {
    pub id: StageId,
    pub workflow_template_id: TemplateId,
    pub name: String,
    pub description: String,
    pub kind: StageKind,
    pub order: u32,
    pub required: bool,
}

/// Reusable, employer-authored ordered list of hiring stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub id: TemplateId,
    pub employer_id: EmployerId,
    pub name: String,
    pub description: String,
    pub stages: Vec<WorkflowStageTemplate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One stage of a live workflow run. Name and order are copied from the
/// template at instantiation, so later template edits cannot reach into
/// running workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStageInstance {
    pub id: StageId,
    pub workflow_instance_id: InstanceId,
    pub template_stage_id: StageId,
    pub name: String,
    pub order: u32,
    pub status: StageStatus,
    pub feedback: Option<String>,
    pub assigned_to: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A live execution of a template against one application. Stages are held
/// sorted by their normalized `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: InstanceId,
    pub application_id: ApplicationId,
    pub workflow_template_id: TemplateId,
    pub status: WorkflowStatus,
    pub current_stage_id: StageId,
    pub stages: Vec<WorkflowStageInstance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowInstance {
    pub fn stage(&self, stage_id: &StageId) -> Option<&WorkflowStageInstance> {
        self.stages.iter().find(|stage| &stage.id == stage_id)
    }

    /// The stage currently awaiting action, if the run is still live.
    pub fn current_stage(&self) -> Option<&WorkflowStageInstance> {
        self.stage(&self.current_stage_id)
    }
}
