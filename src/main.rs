use clap::{Parser, Subcommand};
use fiscafr::cmd;

/// French household role model with property capital gains and housing tax formulas
#[derive(Parser, Debug)]
#[command(name = "fiscafr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the role index assigned to every member of every entity instance
    Roles(cmd::roles::RolesCommand),
    /// Compute the property capital gains tax and the housing tax for a year
    Compute(cmd::compute::ComputeCommand),
    /// Check a population for malformed entity instances
    Validate(cmd::validate::ValidateCommand),
    /// Print the expected input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Roles(cmd) => cmd.exec(),
        Command::Compute(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
