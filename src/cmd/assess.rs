//! `vendor-risk assess`: collect answers and submit a questionnaire.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;

use vendor_risk::config::Config;
use vendor_risk::questionnaire::{ImpactFlag, MaturityFlag, QuestionnaireAnswers};
use vendor_risk::operations::{self, SubmissionOutcome, SubmissionRequest};
use vendor_risk::ui::{self, colors, format};

use super::{load_config, open_documents, open_repository};

/// Options for `vendor-risk assess`, as parsed from the command line.
pub struct AssessOptions {
    pub vendor: String,
    pub answers: Option<PathBuf>,
    pub yes: Vec<String>,
    pub certificate: Option<PathBuf>,
    pub expires: Option<String>,
    pub maturity_notes: Option<String>,
    pub impact_notes: Option<String>,
    pub json: bool,
}

pub fn cmd_assess(options: AssessOptions) -> Result<()> {
    let config = load_config()?;
    let repo = open_repository()?;
    let documents = open_documents(&config)?;

    let interactive = options.answers.is_none() && options.yes.is_empty() && std::io::stdin().is_terminal();
    let answers = if let Some(path) = &options.answers {
        QuestionnaireAnswers::load(path)?
    } else if !options.yes.is_empty() {
        QuestionnaireAnswers::from_yes_flags(&options.yes)?
    } else if interactive {
        prompt_answers()?
    } else {
        log::warn!("No answers given; every flag is treated as unanswered");
        QuestionnaireAnswers::default()
    };

    let mut certificate = options.certificate;
    let mut expires = options.expires;
    if interactive && claims_certification(&config, &answers) {
        if certificate.is_none() {
            let path: String = dialoguer::Input::new()
                .with_prompt("Path to ISO-27001 certificate")
                .allow_empty(true)
                .interact_text()?;
            certificate = Some(PathBuf::from(path.trim())).filter(|p| !p.as_os_str().is_empty());
        }
        if expires.is_none() {
            let date: String = dialoguer::Input::new()
                .with_prompt("Certificate expiry date (YYYY-MM-DD)")
                .allow_empty(true)
                .interact_text()?;
            expires = Some(date).filter(|d| !d.trim().is_empty());
        }
    }

    let certificate_expiry = expires
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid expiry date '{}', expected YYYY-MM-DD", raw))
        })
        .transpose()?;

    let request = SubmissionRequest {
        vendor_name: options.vendor,
        answers,
        maturity_notes: options.maturity_notes,
        impact_notes: options.impact_notes,
        certificate,
        certificate_expiry,
    };

    let outcome = operations::submit_assessment(request, &repo, &documents, &config, Utc::now())?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome.assessment)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn claims_certification(config: &Config, answers: &QuestionnaireAnswers) -> bool {
    config
        .scoring
        .certification_flag()
        .is_some_and(|flag| answers.maturity.get(flag))
}

fn prompt_answers() -> Result<QuestionnaireAnswers> {
    let mut answers = QuestionnaireAnswers::default();

    println!("{}", colors::heading("Security maturity"));
    for flag in MaturityFlag::ALL {
        let value = dialoguer::Confirm::new()
            .with_prompt(flag.question())
            .default(false)
            .interact()?;
        answers.maturity.set(flag, value);
    }

    println!();
    println!("{}", colors::heading("Relationship impact"));
    for flag in ImpactFlag::ALL {
        let value = dialoguer::Confirm::new()
            .with_prompt(flag.question())
            .default(false)
            .interact()?;
        answers.impact.set(flag, value);
    }
    println!();

    Ok(answers)
}

fn print_outcome(outcome: &SubmissionOutcome) {
    let snapshot = &outcome.assessment;
    if ui::is_quiet() {
        println!("{}", snapshot.id);
        return;
    }

    if outcome.created_vendor {
        println!(
            "{} Created vendor {} {}",
            "✓".green(),
            outcome.vendor_name.bold(),
            colors::identifier(&outcome.vendor_id)
        );
    }
    println!(
        "{} Recorded assessment {} for {}",
        "✓".green(),
        colors::identifier(&snapshot.id),
        outcome.vendor_name.bold()
    );
    println!(
        "  Maturity {} ({})  Impact {} ({})  Risk {}",
        ui::rating_badge(Some(snapshot.maturity.rating), true),
        snapshot.maturity.score,
        ui::rating_badge(Some(snapshot.impact.rating), false),
        snapshot.impact.score,
        ui::risk_badge(Some(snapshot.risk))
    );
    if let Some(certificate) = &snapshot.certificate {
        println!(
            "  {} {} (expires {})",
            colors::secondary("Certificate"),
            certificate.path,
            certificate.expires_on
        );
    }
    println!(
        "  {} {}",
        colors::secondary("Next review"),
        format::date(Some(snapshot.next_review_date))
    );
}
