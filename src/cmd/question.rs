//! Question bank commands.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use vendor_risk::domain::NewQuestion;
use vendor_risk::operations;
use vendor_risk::ui::{self, colors, format};

use super::open_repository;

pub fn cmd_add(input: NewQuestion) -> Result<()> {
    let repo = open_repository()?;
    let question = operations::add_question(&repo, input, Utc::now())?;

    if ui::is_quiet() {
        println!("{}", question.id);
    } else {
        println!(
            "{} Added question {} ({}, weight {})",
            "✓".green(),
            colors::identifier(&question.id),
            question.question_type,
            question.weight
        );
    }
    Ok(())
}

pub fn cmd_list(json: bool) -> Result<()> {
    let repo = open_repository()?;
    let questions = operations::list_questions(&repo)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }
    if questions.is_empty() {
        println!("{}", "No active questions.".yellow());
        return Ok(());
    }

    for question in &questions {
        let marker = if question.mandatory { "*".red() } else { " ".normal() };
        println!(
            "{}{} {} {}",
            marker,
            colors::identifier(&question.id),
            colors::secondary(&format!(
                "[{} / {} / {}]",
                question.category, question.question_type, question.weight
            )),
            format::truncate(&question.text, 72)
        );
        if !question.options.is_empty() {
            println!("    {}", colors::secondary(&question.options.join(" | ")));
        }
    }
    Ok(())
}

pub fn cmd_delete(id: &str) -> Result<()> {
    let repo = open_repository()?;
    let question = operations::delete_question(&repo, id)?;
    if !ui::is_quiet() {
        println!(
            "{} Deactivated question {}",
            "✓".green(),
            colors::identifier(&question.id)
        );
    }
    Ok(())
}
