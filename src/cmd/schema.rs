//! Schema command - print expected input and output formats

use crate::cmd::roles::RoleRow;
use crate::core::{EntityDescriptor, PopulationInput, ENTITIES};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header, csv-fields or entities
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the population input
    JsonSchema,
    /// CSV header row of the roles output
    CsvHeader,
    /// Column descriptions of the roles output
    CsvFields,
    /// Entity kinds with their keys and roles
    Entities,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
            SchemaFormat::Entities => self.print_entities(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(PopulationInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", RoleRow::csv_header());
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Roles CSV Output");
        println!("================");
        println!();
        for field in RoleRow::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:20} ({:8})  {}", field.name, req, field.description);
        }
        Ok(())
    }

    fn print_entities(&self) -> anyhow::Result<()> {
        for descriptor in &ENTITIES {
            print_entity(descriptor);
        }
        Ok(())
    }
}

fn print_entity(descriptor: &EntityDescriptor) {
    println!(
        "{} ({}, {}) - {}",
        descriptor.key_plural, descriptor.key_singular, descriptor.symbol, descriptor.label
    );
    if let (Some(index), Some(role)) = (descriptor.index_variable, descriptor.role_variable) {
        println!("  columns: {}, {}", index, role);
    }
    for role in descriptor.roles {
        let max = role.max.map_or("unbounded".to_string(), |m| format!("max {m}"));
        let mandatory = if role.mandatory { ", mandatory" } else { "" };
        println!("  {:24} {} ({}{})", role.key, role.label, max, mandatory);
    }
    println!();
}
