use crate::infra::{build_intake_service, parse_answer};
use clap::Args;
use neck_intake::config::{IntakeConfig, TelemetryConfig};
use neck_intake::error::AppError;
use neck_intake::telemetry;
use neck_intake::workflows::intake::{
    compute_score, format_report, max_score, AnswerError, AnswerSet, ContactInfo, LeadForm,
    PayloadEncoding, QuestionCatalog, SubmissionOutcome, TierTable,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Answer as QUESTION=VALUE; repeat for every question. Missing answers count as 0.
    #[arg(long = "answer", value_name = "QUESTION=VALUE", value_parser = parse_answer)]
    pub(crate) answers: Vec<(String, u32)>,
    /// Respondent name for the report header
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Respondent e-mail for the report header
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Respondent phone number for the report header
    #[arg(long)]
    pub(crate) phone: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Post the finished intake to this webhook instead of showing the e-mail fallback
    #[arg(long)]
    pub(crate) webhook_url: Option<String>,
    /// Declare the webhook body as text/plain
    #[arg(long)]
    pub(crate) plain_text: bool,
    /// Emit debug logs while the demo runs
    #[arg(long)]
    pub(crate) verbose: bool,
}

const DEMO_ANSWERS: [(&str, u32); 7] = [
    ("werk_huishouden", 6),
    ("slapen", 7),
    ("sport_recreatie", 8),
    ("autorijden", 4),
    ("verzorging", 3),
    ("concentratie", 5),
    ("sociaal", 4),
];

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers: raw_answers,
        name,
        email,
        phone,
    } = args;

    let catalog = QuestionCatalog::standard();
    let answers = collect_answers(&catalog, raw_answers)?;

    let tiers = TierTable::standard();
    let total = compute_score(&answers, &catalog);
    let tier = tiers.classify(total);
    let contact = ContactInfo {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone,
        consent: false,
    };

    println!(
        "{}",
        format_report(
            &contact,
            total,
            max_score(&catalog),
            tier,
            &answers,
            &catalog
        )
    );
    Ok(())
}

fn collect_answers(
    catalog: &QuestionCatalog,
    raw_answers: Vec<(String, u32)>,
) -> Result<AnswerSet, AnswerError> {
    let mut answers = AnswerSet::initialized(catalog);
    for (question, value) in raw_answers {
        let definition = catalog
            .find(&question)
            .ok_or_else(|| AnswerError::UnknownQuestion(question.clone()))?;
        answers.record(definition, value)?;
    }
    Ok(answers)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        webhook_url,
        plain_text,
        verbose,
    } = args;

    if verbose {
        telemetry::init(&TelemetryConfig {
            log_level: "debug".to_string(),
            ansi: false,
        })?;
    }

    let config = IntakeConfig {
        webhook_url,
        webhook_encoding: if plain_text {
            PayloadEncoding::PlainText
        } else {
            PayloadEncoding::Json
        },
        ..IntakeConfig::default()
    };
    let service = build_intake_service(&config);

    println!("Neck pain intake demo");
    let session_id = service.create_session().session_id.to_string();
    println!("- Session {session_id} created");

    service.start(&session_id)?;
    for (question, value) in DEMO_ANSWERS {
        let view = service.answer(&session_id, question, value)?;
        if let Some(progress) = &view.progress {
            println!(
                "  Vraag {} van {}: {} -> {}",
                progress.current, progress.total, progress.question.text, value
            );
        }
        service.next(&session_id)?;
    }

    let view = service.capture_lead(
        &session_id,
        LeadForm {
            name: "Demo Patiënt".to_string(),
            email: "demo@example.nl".to_string(),
            phone: None,
            consent: true,
        },
    )?;
    println!("- Lead captured, now on the {} step", view.step.token());

    let result = service.result(&session_id)?;
    println!(
        "- Score {}/{} -> {}",
        result.score,
        result.max_score,
        result.level.label()
    );
    println!("  {}", result.urgency);

    match service.submit(&session_id).await? {
        SubmissionOutcome::Delivered { appointment_url } => {
            println!("- Intake delivered to staff; book a visit at {appointment_url}");
        }
        SubmissionOutcome::Fallback {
            message, mailto, ..
        } => {
            println!("- {message}");
            println!("  Fallback link: {mailto}");
        }
    }

    Ok(())
}
