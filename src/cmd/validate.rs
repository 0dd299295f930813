//! Validate command - surface malformed entity instances without computing anything

use crate::cmd::read_input;
use crate::core::{Population, PopulationError, RoleError};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Population file (JSON). Reads from stdin if "-".
    #[arg(short, long, default_value = "-")]
    population: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: &'static str,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    individus: usize,
    familles: usize,
    foyers_fiscaux: usize,
    menages: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_input(&self.population)?;
        let (population, errors) = Population::load(input);

        let issues: Vec<ValidationIssue> = errors
            .iter()
            .map(|e| ValidationIssue {
                issue_type: issue_type_name(e),
                message: e.to_string(),
            })
            .collect();

        let output = ValidationOutput {
            individus: population.individus.len(),
            familles: population.familles.len(),
            foyers_fiscaux: population.foyers_fiscaux.len(),
            menages: population.menages.len(),
            issue_count: issues.len(),
            issues,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }

        // Exit with code 1 if issues found
        if output.issue_count > 0 {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(output: &ValidationOutput) {
    println!();
    println!(
        "VALIDATION RESULTS ({} individus, {} familles, {} foyers fiscaux, {} ménages)",
        output.individus, output.familles, output.foyers_fiscaux, output.menages
    );
    println!();

    if output.issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", output.issue_count);
    println!();
    for (i, issue) in output.issues.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.message);
    }
    println!();
}

fn issue_type_name(error: &PopulationError) -> &'static str {
    match error {
        PopulationError::DuplicatePerson(_) => "DuplicatePerson",
        PopulationError::UnknownPerson { .. } => "UnknownPerson",
        PopulationError::MultipleMembership { .. } => "MultipleMembership",
        PopulationError::Role { source, .. } => match source {
            RoleError::MissingMandatoryRole { .. } => "MissingMandatoryRole",
            RoleError::InvalidRoleCardinality { .. } => "InvalidRoleCardinality",
            RoleError::NullIdentifier { .. } => "NullIdentifier",
            RoleError::UnknownRole { .. } => "UnknownRole",
            RoleError::DuplicateMember { .. } => "DuplicateMember",
            RoleError::NotAGroupingEntity { .. } => "NotAGroupingEntity",
        },
    }
}
