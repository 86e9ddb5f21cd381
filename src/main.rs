//! Entry point for the nchelpers application.
//! Parses the CLI, opens the NetCDF file and prints its derived metadata.

use clap::Parser;
use nchelpers::prelude::*;
use nchelpers::Concept;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Each fact is computed independently; a failure is reported in place of its value.
fn collect_report(dataset: &CfDataset<netcdf::File>) -> Vec<(String, Result<Value>)> {
    let text = |r: Result<String>| r.map(Value::String);
    let metadata = dataset.metadata();

    let mut report = vec![
        ("unique_id".to_string(), text(dataset.unique_id())),
        (
            "time_resolution".to_string(),
            text(dataset.time_resolution().map(|r| r.to_string())),
        ),
        ("time_range".to_string(), text(dataset.time_range_formatted())),
        (
            "time_step_seconds".to_string(),
            dataset.time_step_size().map(Value::from),
        ),
        (
            "multi_year_mean".to_string(),
            Ok(Value::Bool(dataset.is_multi_year_mean())),
        ),
        (
            "dependent_variables".to_string(),
            Ok(Value::from(
                dataset
                    .dependent_variable_names()
                    .into_iter()
                    .collect::<Vec<_>>(),
            )),
        ),
        (
            "axes".to_string(),
            Ok(Value::Object(
                dataset
                    .axes(None)
                    .into_iter()
                    .map(|(dim, axis)| (dim, Value::from(axis.as_str())))
                    .collect(),
            )),
        ),
    ];

    for concept in Concept::ALL {
        report.push((concept.to_string(), text(metadata.get(concept))));
    }

    report.push((
        "first_mib_md5".to_string(),
        text(dataset.first_mib_digest().map(|d| d.to_hex())),
    ));
    report
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let dataset = open_dataset(&args.file)?;
    let report = collect_report(&dataset);

    if args.json {
        let mut object = Map::new();
        object.insert(
            "file".to_string(),
            Value::String(args.file.display().to_string()),
        );
        for (key, value) in report {
            let value = value.unwrap_or_else(|e| {
                let mut error = Map::new();
                error.insert("error".to_string(), Value::String(e.to_string()));
                Value::Object(error)
            });
            object.insert(key, value);
        }
        println!("{}", serde_json::to_string_pretty(&Value::Object(object))?);
    } else {
        println!("{}", args.file.display());
        for (key, value) in report {
            match value {
                Ok(Value::String(s)) => println!("  {key}: {s}"),
                Ok(other) => println!("  {key}: {other}"),
                Err(e) => println!("  {key}: <{e}>"),
            }
        }
    }

    Ok(())
}
