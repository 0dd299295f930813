//! E2E tests for the roles, compute, validate and schema commands

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Test the roles table lists every grouping entity
#[test]
fn roles_table() {
    let output = run(&["roles", "-p", "tests/data/household.json"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("familles"));
    assert!(stdout.contains("foyers_fiscaux"));
    assert!(stdout.contains("menages"));
    assert!(stdout.contains("personne_de_reference"));
    assert!(stdout.contains("personnes_a_charge"));
}

/// Test roles CSV output: roles with a maximum reserve their slots
#[test]
fn roles_csv_reserves_slots() {
    let output = run(&["roles", "-p", "tests/data/household.json", "--entity", "men", "--csv"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "entity,instance,role,role_index,person",
            "menages,m1,personne_de_reference,0,1",
            "menages,m1,conjoint,1,2",
            "menages,m1,enfants,2,3",
            "menages,m1,autres,3,4",
        ]
    );
}

/// Test roles JSON output for a single entity selected by plural key
#[test]
fn roles_json_single_entity() {
    let output = run(&["roles", "-p", "tests/data/household.json", "--entity", "familles", "--json"]);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    let rows = rows.as_array().expect("Expected an array");
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r["entity"] == "familles"));

    // the lone parent of f2 still sits at index 0
    let f2 = rows.iter().find(|r| r["instance"] == "f2").unwrap();
    assert_eq!(f2["role_index"], 0);
    assert_eq!(f2["person"], "4");
}

/// Test per-person membership columns
#[test]
fn roles_columns_csv() {
    let output = run(&["roles", "-p", "tests/data/household.json", "--columns", "--csv"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "individu,idfam,quifam,idfoy,quifoy,idmen,quimen");
    assert_eq!(lines[3], "3,0,2,0,2,0,2");
    assert_eq!(lines[4], "4,1,0,1,0,0,3");
}

/// Test the persons entity is rejected as a roles filter
#[test]
fn roles_rejects_persons_entity() {
    let output = run(&["roles", "-p", "tests/data/household.json", "--entity", "individus"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("has no roles"));
}

/// Test reading the population from stdin
#[test]
fn roles_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let data = std::fs::read("tests/data/tenant.json").unwrap();
    let mut child = Command::new("cargo")
        .args(["run", "--quiet", "--", "roles", "--csv"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("menages,men,enfants,2,bob"));
}

/// Test the compute table for a household with a property disposal
#[test]
fn compute_table() {
    let output = run(&["compute", "-p", "tests/data/household.json", "-y", "2015"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("Year 2015"));
    assert!(stdout.contains("ff1"));
    assert!(stdout.contains("70000.00 €"));
    assert!(stdout.contains("-13300.00 €"));
    assert!(stdout.contains("oui"));
}

/// Test compute for a tenant household that pays the housing tax
#[test]
fn compute_tenant_pays_housing_tax() {
    let output = run(&["compute", "-p", "tests/data/tenant.json", "-y", "2015"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("12112.50 €"));
    assert!(stdout.contains("non"));
    assert!(stdout.contains("3400.00 €"));
    assert!(stdout.contains("-340.00 €"));
}

/// Test compute JSON output
#[test]
fn compute_json() {
    let output = run(&["compute", "-p", "tests/data/household.json", "-y", "2015", "--json"]);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(report["year"], 2015);
    assert_eq!(report["foyers_fiscaux"].as_array().unwrap().len(), 2);
    assert_eq!(report["foyers_fiscaux"][0]["cessions"][0]["duree_detention"], 10);
    assert_eq!(report["menages"][0]["exonere_taxe_habitation"], true);
}

/// Test compute refuses years without legislation
#[test]
fn compute_unsupported_year() {
    let output = run(&["compute", "-p", "tests/data/household.json", "-y", "1990"]);

    assert!(!output.status.success());
}

/// Test compute refuses a malformed population
#[test]
fn compute_invalid_population() {
    let output = run(&["compute", "-p", "tests/data/invalid.json", "-y", "2015"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("trois_parents"));
}

/// Test validate passes a well-formed population
#[test]
fn validate_ok() {
    let output = run(&["validate", "-p", "tests/data/household.json"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("No issues found"));
}

/// Test validate reports every malformed instance and exits with 1
#[test]
fn validate_reports_all_issues() {
    let output = run(&["validate", "-p", "tests/data/invalid.json", "--json"]);

    assert_eq!(output.status.code(), Some(1));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(result["issue_count"], 3);
    let types: Vec<_> = result["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        types,
        vec!["InvalidRoleCardinality", "UnknownPerson", "MissingMandatoryRole"]
    );
}

/// Test the JSON schema describes the population input
#[test]
fn schema_json() {
    let output = run(&["schema", "json-schema"]);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    let properties = &schema["properties"];
    assert!(properties.get("individus").is_some());
    assert!(properties.get("menages").is_some());
}

/// Test the CSV header of the roles output
#[test]
fn schema_csv_header() {
    let output = run(&["schema", "csv-header"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout(&output).trim(), "entity,instance,role,role_index,person");
}

/// Test the entity listing
#[test]
fn schema_entities() {
    let output = run(&["schema", "entities"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("foyers_fiscaux (foyer_fiscal, foy)"));
    assert!(stdout.contains("idmen, quimen"));
}
