use clap::Parser;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use std::fs;

const FIRST_NAMES: [&str; 10] = [
    "Ada", "Ben", "Cleo", "Dev", "Eli", "Fay", "Gus", "Hana", "Ivo", "June",
];
const CITIES: [&str; 6] = ["Lisbon", "Oslo", "Kyoto", "Lima", "Accra", "Perth"];
const DEPARTMENTS: [&str; 4] = ["sales", "support", "engineering", "finance"];

/// A CLI tool to generate sample datasets for flowcraft source nodes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_data.json")]
    output: String,

    /// Number of rows to generate
    #[arg(short, long, default_value_t = 100)]
    rows: usize,

    /// Fraction of cells (0.0 to 1.0) left empty, to exercise missing values
    #[arg(long, default_value_t = 0.05)]
    missing: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.missing) {
        eprintln!(
            "Error: --missing ({}) must be between 0.0 and 1.0",
            cli.missing
        );
        std::process::exit(1);
    }

    println!("Generating {} row(s)...", cli.rows);

    let rows: Vec<Value> = (0..cli.rows)
        .map(|i| generate_row(&mut rng, i, cli.missing))
        .collect();
    let document = json!({
        "columns": ["id", "name", "age", "city", "department", "salary", "active"],
        "rows": rows,
    });

    fs::write(&cli.output, serde_json::to_string_pretty(&document)?)?;

    println!("Successfully generated and saved dataset to '{}'", cli.output);

    Ok(())
}

/// Generates one employee-like record. Cells are dropped at the given rate, except `id`.
fn generate_row(rng: &mut impl Rng, index: usize, missing: f64) -> Value {
    let mut row = serde_json::Map::new();
    row.insert("id".to_string(), json!(index + 1));

    let cells = [
        ("name", json!(FIRST_NAMES.choose(rng).copied().unwrap_or("Ada"))),
        ("age", json!(rng.random_range(18..70))),
        ("city", json!(CITIES.choose(rng).copied().unwrap_or("Oslo"))),
        (
            "department",
            json!(DEPARTMENTS.choose(rng).copied().unwrap_or("sales")),
        ),
        (
            "salary",
            json!((rng.random_range(30_000.0..120_000.0_f64) * 100.0).round() / 100.0),
        ),
        ("active", json!(rng.random_bool(0.8))),
    ];
    for (column, value) in cells {
        if !rng.random_bool(missing) {
            row.insert(column.to_string(), value);
        }
    }
    Value::Object(row)
}
