//! Roles command - role index assignments of every grouping entity instance

use crate::cmd::{read_population, CsvField};
use crate::core::entities::{self, EntityDescriptor};
use crate::core::population::Instance;
use crate::core::{EntityKind, Population};
use clap::Args;
use fiscafr_derive::CsvSchema;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct RolesCommand {
    /// Population file (JSON). Reads from stdin if "-".
    #[arg(short, long, default_value = "-")]
    population: PathBuf,

    /// Only show one entity kind (plural key, singular key or symbol)
    #[arg(short, long)]
    entity: Option<String>,

    /// Show per-person membership columns (idfam, quifam, ...) instead
    #[arg(long)]
    columns: bool,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// Row of the roles output
#[derive(Debug, Clone, Tabled, Serialize, CsvSchema)]
pub struct RoleRow {
    /// Plural key of the entity kind
    #[tabled(rename = "Entity")]
    pub entity: String,

    /// Instance id
    #[tabled(rename = "Instance")]
    pub instance: String,

    /// Role label key
    #[tabled(rename = "Role")]
    pub role: String,

    /// Role index within the instance
    #[tabled(rename = "Index")]
    #[serde(rename = "role_index")]
    pub index: usize,

    /// Individual id
    #[tabled(rename = "Person")]
    pub person: String,
}

impl RolesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let population = read_population(&self.population)?;
        let kinds = self.kinds()?;

        if self.columns {
            return self.print_columns(&population, &kinds);
        }

        let rows = build_role_rows(&population, &kinds);
        if self.csv {
            write_csv(&rows)
        } else if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        } else {
            print_table(&rows);
            Ok(())
        }
    }

    fn kinds(&self) -> anyhow::Result<Vec<EntityKind>> {
        let Some(key) = &self.entity else {
            return Ok(EntityKind::GROUPS.to_vec());
        };
        match entities::lookup(key) {
            Some(descriptor) if descriptor.is_persons_entity() => {
                anyhow::bail!("{} has no roles", descriptor.key_plural)
            }
            Some(descriptor) => Ok(vec![descriptor.kind]),
            None => anyhow::bail!("Unknown entity '{}'", key),
        }
    }

    fn print_columns(&self, population: &Population, kinds: &[EntityKind]) -> anyhow::Result<()> {
        let mut header = vec!["individu".to_string()];
        for kind in kinds {
            let descriptor = kind.descriptor();
            header.extend(
                [descriptor.index_variable, descriptor.role_variable]
                    .into_iter()
                    .flatten()
                    .map(str::to_string),
            );
        }

        let records = population.individus.iter().enumerate().map(|(row, individu)| {
            let mut record = vec![individu.id.to_string()];
            for kind in kinds {
                match population.membership(*kind, row) {
                    Some(m) => record.extend([m.entity.to_string(), m.role.to_string()]),
                    None => record.extend([String::new(), String::new()]),
                }
            }
            record
        });

        if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            wtr.write_record(&header)?;
            for record in records {
                wtr.write_record(&record)?;
            }
            wtr.flush()?;
        } else if self.json {
            let objects: Vec<serde_json::Map<String, serde_json::Value>> = records
                .map(|record| {
                    header
                        .iter()
                        .cloned()
                        .zip(record.into_iter().map(serde_json::Value::String))
                        .collect()
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&objects)?);
        } else {
            let mut builder = Builder::default();
            builder.push_record(header.clone());
            for record in records {
                builder.push_record(record);
            }
            let table = builder
                .build()
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
        Ok(())
    }
}

pub fn build_role_rows(population: &Population, kinds: &[EntityKind]) -> Vec<RoleRow> {
    let mut rows = Vec::new();
    for kind in kinds {
        let descriptor = kind.descriptor();
        match kind {
            EntityKind::Famille => push_rows(&mut rows, descriptor, population, &population.familles),
            EntityKind::FoyerFiscal => {
                push_rows(&mut rows, descriptor, population, &population.foyers_fiscaux)
            }
            EntityKind::Menage => push_rows(&mut rows, descriptor, population, &population.menages),
            EntityKind::Individu => {}
        }
    }
    rows
}

fn push_rows<A>(
    rows: &mut Vec<RoleRow>,
    descriptor: &EntityDescriptor,
    population: &Population,
    instances: &[Instance<A>],
) {
    for instance in instances {
        rows.extend(instance.roles.iter().map(|a| RoleRow {
            entity: descriptor.key_plural.to_string(),
            instance: instance.id.clone(),
            role: a.role.key.to_string(),
            index: a.index,
            person: population.person(a.person).id.to_string(),
        }));
    }
}

fn print_table(rows: &[RoleRow]) {
    if rows.is_empty() {
        println!("No entity instances found");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::one(3)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[RoleRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
