use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use billfold::initialize_db;

/// A utility for creating a demo database for billfold.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Vendors to rotate through, with a category and a base amount each.
const SAMPLE_BILLS: [(&str, &str, f64); 9] = [
    ("Corner Cafe", "food", 18.50),
    ("Fresh Mart", "food", 86.20),
    ("City Power", "utilities", 120.40),
    ("Metro Transit", "travel", 45.00),
    ("Night Owl Cinema", "entertainment", 32.00),
    ("Main St Pharmacy", "healthcare", 24.90),
    ("Plyhaus Hardware", "shopping", 63.75),
    ("Broadband Co", "utilities", 79.99),
    ("Thai Corner", "food", 41.30),
];

/// Create and populate a database for trying out the app without real bills.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample bills...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    // A few bills per month over the last year, with slightly varying
    // amounts so the charts have some shape to them.
    for month_offset in 0..12 {
        for (index, (vendor, category, base_amount)) in SAMPLE_BILLS.iter().enumerate() {
            if (month_offset + index) % 3 == 0 {
                continue;
            }

            let date = today - Duration::days(month_offset as i64 * 30 + (index as i64 * 3) % 28);
            let amount = base_amount * (1.0 + (month_offset as f64 * 0.03));

            conn.execute(
                "INSERT INTO bill (vendor, category, date, amount, image_path)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (vendor, category, date, (amount * 100.0).round() / 100.0, ""),
            )?;

            count += 1;
        }
    }

    println!("Created {count} bills. Success!");

    Ok(())
}
