use crate::infra::InMemoryEntityStore;
use clap::Args;
use std::sync::Arc;
use talentflow::error::AppError;
use talentflow::workflows::hiring::domain::{
    CandidateId, EmployerId, JobStatus, JobType, StageKind,
};
use talentflow::workflows::hiring::repository::{Notice, Notifier, NotifyError};
use talentflow::workflows::hiring::{
    HiringPortal, JobDraft, StageCommand, StageDraft, TemplateDraft,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fail the stage with this 1-based order instead of passing it
    #[arg(long)]
    pub(crate) fail_at: Option<u32>,
    /// Suppress the toast-style notice lines
    #[arg(long)]
    pub(crate) quiet: bool,
}

/// Notification sink that prints toast payloads to stdout.
struct ConsoleNotifier {
    quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn publish(&self, notice: Notice) -> Result<(), NotifyError> {
        if !self.quiet {
            println!("  [notice] {}: {}", notice.title, notice.body);
        }
        Ok(())
    }
}

/// Walk one candidate through a three-stage hiring pipeline end to end.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryEntityStore::default());
    let notifier = Arc::new(ConsoleNotifier { quiet: args.quiet });
    let portal = HiringPortal::new(store, notifier);

    let employer = EmployerId("emp-demo".to_string());
    let candidate = CandidateId("cand-demo".to_string());

    println!("Talentflow hiring workflow demo");
    println!("\n1. Employer publishes a job");
    let job = portal.jobs.create_job(
        employer.clone(),
        JobDraft {
            title: "Senior Backend Engineer".to_string(),
            description: "Own the services behind the candidate pipeline.".to_string(),
            requirements: "Rust, HTTP services, relational data models.".to_string(),
            location: "Remote".to_string(),
            salary: None,
            job_type: JobType::FullTime,
            status: JobStatus::Published,
            expires_at: None,
        },
    )?;
    println!("  {} -> '{}'", job.id, job.title);

    println!("\n2. Candidate applies");
    let application = portal.applications.apply(candidate, job.id)?;
    println!("  {} ({})", application.id, application.status.label());

    println!("\n3. Employer authors a workflow template");
    let template = portal.templates.create_template(
        employer,
        TemplateDraft {
            name: "Engineering hiring".to_string(),
            description: "Screening, interview, decision.".to_string(),
            stages: vec![
                stage("Resume Screening", StageKind::ResumeScreening, 1),
                stage("Technical Interview", StageKind::TechnicalInterview, 2),
                stage("Final Decision", StageKind::FinalDecision, 3),
            ],
            is_active: true,
        },
    )?;
    println!("  {} with {} stages", template.id, template.stages.len());
    for stage in &template.stages {
        println!("    {}. {} ({})", stage.order, stage.name, stage.kind.label());
    }

    println!("\n4. Workflow starts");
    let instance = portal
        .workflows
        .start_workflow(&application.id, &template.id)?;
    println!(
        "  {} -> current stage '{}'",
        instance.id,
        instance
            .current_stage()
            .map(|s| s.name.as_str())
            .unwrap_or("?")
    );

    println!("\n5. Stages advance");
    let interview_slot = chrono::Utc::now() + chrono::Duration::days(3);
    portal.workflows.advance_stage(
        &instance.id,
        &instance.stages[1].id,
        StageCommand::Schedule {
            at: interview_slot,
            assigned_to: Some("interviewer-demo".to_string()),
        },
    )?;
    println!(
        "  stage '{}' scheduled for {}",
        instance.stages[1].name,
        interview_slot.format("%Y-%m-%d")
    );
    for stage in &instance.stages {
        let failing = args.fail_at == Some(stage.order);
        let command = if failing {
            StageCommand::Fail {
                feedback: Some("Did not meet the bar.".to_string()),
            }
        } else {
            StageCommand::Pass {
                feedback: Some(format!("{} cleared.", stage.name)),
            }
        };
        let updated = portal
            .workflows
            .advance_stage(&instance.id, &stage.id, command)?;
        println!(
            "  stage '{}' -> {} (workflow {})",
            stage.name,
            if failing { "failed" } else { "passed" },
            updated.status.label()
        );
        if failing {
            break;
        }
    }

    println!("\n6. Outcome");
    let record = portal.applications.get(&application.id)?;
    let run = portal.workflows.get_instance(&instance.id)?;
    println!(
        "  workflow {} / application {}",
        run.status.label(),
        record.status.label()
    );
    for stage in &run.stages {
        println!(
            "    {:>2}. {:<20} {:<12} {}",
            stage.order,
            stage.name,
            stage.status.label(),
            stage.feedback.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

fn stage(name: &str, kind: StageKind, order: u32) -> StageDraft {
    StageDraft {
        name: name.to_string(),
        description: String::new(),
        kind,
        order,
        required: true,
    }
}
