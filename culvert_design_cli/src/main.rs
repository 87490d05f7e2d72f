use std::borrow::Cow;

use clap::{Parser, Subcommand};
use culvert_design::{
    io::{read_requests_csv, run_batch, write_results_csv, write_table_json},
    CulvertDesign, HeadwallDimensionTable, TableError,
};

/// Command line interface for culvert headwall dimension lookups.
#[derive(Parser)]
#[command(name = "culvert_design_cli", version)]
struct Cli {
    /// JSON headwall table to use instead of the bundled one
    #[arg(long, env = "CULVERT_TABLE", global = true)]
    table: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the headwall dimensions for a shape class and size.
    Lookup { shape_class: String, size: f64 },
    /// Print a single headwall dimension.
    Dimension {
        shape_class: String,
        size: f64,
        name: String,
    },
    /// List shape classes with their supported size range.
    Classes,
    /// Look up every `shape_class,size` row of a CSV file.
    Batch { input: String, output: String },
    /// Check that a table file loads.
    Validate { path: String },
    /// Write the active table as JSON.
    Export { output: String },
}

fn load_table(path: Option<&str>) -> Result<Cow<'static, HeadwallDimensionTable>, TableError> {
    match path {
        Some(p) => HeadwallDimensionTable::from_json_file(p).map(Cow::Owned),
        None => HeadwallDimensionTable::embedded().map(Cow::Borrowed),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let active_table = || load_table(cli.table.as_deref());
    match cli.command {
        Commands::Lookup { shape_class, size } => {
            let table = active_table()?;
            let result = CulvertDesign::new(shape_class, size).headwall(&table)?;
            for (name, value) in &result.dimensions {
                println!("{} = {:.3}", name, value);
            }
            if result.interpolated {
                println!("(interpolated)");
            } else {
                println!("(tabulated)");
            }
        }
        Commands::Dimension {
            shape_class,
            size,
            name,
        } => {
            let table = active_table()?;
            let value = CulvertDesign::new(shape_class, size).headwall_dimension(&table, &name)?;
            println!("{:.3}", value);
        }
        Commands::Classes => {
            let table = active_table()?;
            for class in table.classes() {
                let names: Vec<&str> = class.dimension_names().collect();
                println!(
                    "{}: {:.3} - {:.3} ({})",
                    class.shape_class(),
                    class.min_size(),
                    class.max_size(),
                    names.join(", ")
                );
            }
        }
        Commands::Batch { input, output } => {
            let table = active_table()?;
            let requests = read_requests_csv(&input)?;
            let records = run_batch(&table, &requests);
            write_results_csv(&output, &records)?;
            let failed = records.iter().filter(|r| r.outcome.is_err()).count();
            println!("Wrote {} results to {} ({} failed)", records.len(), output, failed);
        }
        Commands::Validate { path } => {
            let table = HeadwallDimensionTable::from_json_file(&path)?;
            println!("Valid table: {} classes", table.classes().count());
        }
        Commands::Export { output } => {
            let table = active_table()?;
            write_table_json(&output, &table)?;
            println!("Wrote {}", output);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::debug!("command failed: {e:?}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
