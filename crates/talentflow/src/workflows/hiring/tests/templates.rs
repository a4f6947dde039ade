use super::common::*;
use crate::workflows::hiring::domain::{EmployerId, StageKind, TemplateId};
use crate::workflows::hiring::{TemplateDraft, TemplateError};

#[test]
fn create_normalizes_gapped_orders() {
    let harness = build_portal();
    let template = seed_template(
        &harness,
        TemplateDraft {
            name: "Gapped".to_string(),
            description: String::new(),
            stages: vec![
                stage_draft("Resume Screening", StageKind::ResumeScreening, 10),
                stage_draft("Phone Interview", StageKind::PhoneInterview, 20),
                stage_draft("Final Decision", StageKind::FinalDecision, 30),
            ],
            is_active: true,
        },
    );

    let orders: Vec<u32> = template.stages.iter().map(|stage| stage.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(template.stages[0].name, "Resume Screening");
    assert_eq!(template.stages[2].name, "Final Decision");
}

#[test]
fn duplicate_orders_keep_authored_sequence() {
    let harness = build_portal();
    let template = seed_template(
        &harness,
        TemplateDraft {
            name: "Tied".to_string(),
            description: String::new(),
            stages: vec![
                stage_draft("Phone Interview", StageKind::PhoneInterview, 1),
                stage_draft("HR Interview", StageKind::HrInterview, 1),
            ],
            is_active: true,
        },
    );

    // Stable sort: ties stay in the order they were authored.
    assert_eq!(template.stages[0].name, "Phone Interview");
    assert_eq!(template.stages[1].name, "HR Interview");
    assert_eq!(template.stages[0].order, 1);
    assert_eq!(template.stages[1].order, 2);
}

#[test]
fn update_replaces_stage_list() {
    let harness = build_portal();
    let template = seed_template(&harness, template_draft());

    let updated = harness
        .portal
        .templates
        .update_template(
            &template.id,
            TemplateDraft {
                name: "Engineering hiring v2".to_string(),
                description: "Now with an assessment round.".to_string(),
                stages: vec![
                    stage_draft("Assessment", StageKind::Assessment, 1),
                    stage_draft("Final Decision", StageKind::FinalDecision, 2),
                ],
                is_active: false,
            },
        )
        .expect("template updates");

    assert_eq!(updated.name, "Engineering hiring v2");
    assert_eq!(updated.stages.len(), 2);
    assert!(!updated.is_active);
    assert!(updated.updated_at >= template.updated_at);
    assert_eq!(updated.created_at, template.created_at);
}

#[test]
fn lookup_by_id_round_trips() {
    let harness = build_portal();
    let template = seed_template(&harness, template_draft());

    let fetched = harness
        .portal
        .templates
        .get_template(&template.id)
        .expect("template present");
    assert_eq!(fetched, template);

    let missing = harness
        .portal
        .templates
        .get_template(&TemplateId::from("wt-missing"));
    assert!(matches!(missing, Err(TemplateError::NotFound(_))));
}

#[test]
fn update_missing_template_errors() {
    let harness = build_portal();
    let result = harness
        .portal
        .templates
        .update_template(&TemplateId::from("wt-missing"), template_draft());
    assert!(matches!(result, Err(TemplateError::NotFound(_))));
}

#[test]
fn listing_filters_by_employer() {
    let harness = build_portal();
    seed_template(&harness, template_draft());
    harness
        .portal
        .templates
        .create_template(EmployerId::from("emp-other"), single_stage_draft())
        .expect("template creates");

    let mine = harness
        .portal
        .templates
        .templates_for_employer(&employer())
        .expect("listing succeeds");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Engineering hiring");

    let theirs = harness
        .portal
        .templates
        .templates_for_employer(&EmployerId::from("emp-other"))
        .expect("listing succeeds");
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].name, "Screening only");
}

#[test]
fn template_edits_do_not_reach_running_instances() {
    let harness = build_portal();
    let (_, instance) = seed_workflow(&harness);

    harness
        .portal
        .templates
        .update_template(
            &instance.workflow_template_id,
            TemplateDraft {
                name: "Renamed".to_string(),
                description: String::new(),
                stages: vec![stage_draft("Totally Different", StageKind::Assessment, 1)],
                is_active: true,
            },
        )
        .expect("template updates");

    let run = harness
        .portal
        .workflows
        .get_instance(&instance.id)
        .expect("instance present");
    assert_eq!(run.stages.len(), 3);
    assert_eq!(run.stages[0].name, "Resume Screening");
}
