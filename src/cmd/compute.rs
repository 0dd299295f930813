//! Compute command - evaluate the capital gains tax and the housing tax for
//! one year

use crate::cmd::{format_eur, read_population};
use crate::tax::simulation::{FoyerFiscalResult, MenageResult};
use crate::tax::{Simulation, SimulationReport, Year};
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// Population file (JSON). Reads from stdin if "-".
    #[arg(short, long, default_value = "-")]
    population: PathBuf,

    /// Tax year to compute
    #[arg(short, long)]
    year: i32,

    /// Output the full report as JSON
    #[arg(long)]
    json: bool,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let population = read_population(&self.population)?;
        let simulation = Simulation::new(&population, Year(self.year))?;
        let report = simulation.run();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct FoyerRow {
    #[tabled(rename = "Foyer fiscal")]
    id: String,
    #[tabled(rename = "Cessions")]
    cessions: usize,
    #[tabled(rename = "3VZ")]
    f3vz: String,
    #[tabled(rename = "IR plus-value immo")]
    ir_pv_immo: String,
}

impl From<&FoyerFiscalResult> for FoyerRow {
    fn from(r: &FoyerFiscalResult) -> Self {
        FoyerRow {
            id: r.id.clone(),
            cessions: r.cessions.len(),
            f3vz: format_eur(r.f3vz),
            ir_pv_immo: format_eur(r.ir_pv_immo),
        }
    }
}

#[derive(Tabled)]
struct MenageRow {
    #[tabled(rename = "Ménage")]
    id: String,
    #[tabled(rename = "RFR")]
    rfr: String,
    #[tabled(rename = "Seuil")]
    seuil: String,
    #[tabled(rename = "Exonéré")]
    exonere: String,
    #[tabled(rename = "Base nette")]
    base_nette: String,
    #[tabled(rename = "Taxe d'habitation")]
    tax_hab: String,
}

impl From<&MenageResult> for MenageRow {
    fn from(r: &MenageResult) -> Self {
        MenageRow {
            id: r.id.clone(),
            rfr: format_eur(r.exoneration.rfr),
            seuil: format_eur(r.seuil_exoneration),
            exonere: if r.exonere_taxe_habitation { "oui" } else { "non" }.to_string(),
            base_nette: format_eur(r.base_nette),
            tax_hab: format_eur(r.tax_hab),
        }
    }
}

fn print_report(report: &SimulationReport) {
    println!("Year {}", report.year);
    println!();

    if report.foyers_fiscaux.is_empty() {
        println!("No foyers fiscaux");
    } else {
        let rows: Vec<FoyerRow> = report.foyers_fiscaux.iter().map(FoyerRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!();

    if report.menages.is_empty() {
        println!("No ménages");
    } else {
        let rows: Vec<MenageRow> = report.menages.iter().map(MenageRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
}
