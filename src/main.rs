#![deny(clippy::all)]

use demografie_mongo::prelude::*;
use polars::prelude::DataFrame;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = MongoConfig::default();
    if let Ok(uri) = std::env::var("MONGO_URI") {
        config.uri = uri;
    }

    let banner = "=".repeat(70);
    println!("{banner}");
    println!("WIEN DEMOGRAFIE DATA READER");
    println!("{banner}");

    let reader = match DemografieReader::connect(config) {
        Ok(reader) => reader,
        Err(err) => {
            eprintln!("ERROR: mongodb connection failed - {err}");
            eprintln!();
            eprintln!("Troubleshooting:");
            eprintln!("1. Ensure mongodb is running: docker ps");
            eprintln!("2. Start mongodb: docker-compose up -d");
            std::process::exit(1);
        }
    };

    println!("\nLoading all datasets...");
    let population = load(reader.population(), "population");
    let births = load(reader.births(), "births");
    let merged = load(reader.merged(), "merged");

    println!("\n{banner}");
    println!("DATA LOADED SUCCESSFULLY");
    println!("{banner}");

    println!("\nPopulation data:");
    println!("  Shape: {:?}", population.shape());
    let columns = population.get_column_names();
    println!("  Columns: {:?}...", &columns[..columns.len().min(5)]);

    println!("\nBirths data:");
    println!("  Shape: {:?}", births.shape());
    println!("  Columns: {:?}", births.get_column_names());

    println!("\nMerged data (for analysis):");
    println!("  Shape: {:?}", merged.shape());
    println!("  Columns: {:?}", merged.get_column_names());

    println!("\nFirst 3 rows of merged data:");
    println!("{}", merged.head(Some(3)));

    reader.close();
}

fn load(result: Result<DataFrame, FetchError>, name: &str) -> DataFrame {
    result.unwrap_or_else(|err| {
        eprintln!("ERROR: loading {name} data failed - {err}");
        std::process::exit(1);
    })
}
