pub mod compute;
pub mod roles;
pub mod schema;
pub mod validate;

use crate::core::{read_population_json, Population, PopulationInput};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Column of a CSV output, generated by `#[derive(CsvSchema)]`.
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Read a population input (JSON) from a file, or stdin with "-"
pub fn read_input(path: &Path) -> anyhow::Result<PopulationInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        read_population_json(BufReader::new(file))
    }
}

/// Read and validate a population, failing on the first malformed instance.
pub fn read_population(path: &Path) -> anyhow::Result<Population> {
    let input = read_input(path)?;
    let population = Population::from_input(input)?;
    log::info!(
        "loaded {} individuals, {} familles, {} foyers fiscaux, {} menages",
        population.individus.len(),
        population.familles.len(),
        population.foyers_fiscaux.len(),
        population.menages.len()
    );
    Ok(population)
}

fn read_from_stdin() -> anyhow::Result<PopulationInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_population_json(io::Cursor::new(buffer))
}

pub(crate) fn format_eur(amount: Decimal) -> String {
    format!("{:.2} €", amount.round_dp(2))
}
