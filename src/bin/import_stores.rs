//! Load a JSON array of stores into the store directory
//! Usage: cargo run --bin import_stores -- <stores.json>

use fittrack::config;
use fittrack::db::{self, Database};
use fittrack::tools::stores;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let file_path = match args.get(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: import_stores <stores.json>");
            std::process::exit(2);
        }
    };

    let db_path = config::database_path();
    println!("Database: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(db::run_migrations)?;

    let result = stores::import_stores(&database, file_path)?;
    println!(
        "Imported {} of {} stores from {}",
        result.imported, result.total_rows, result.file_path
    );
    for error in &result.errors {
        println!("  skipped {}", error);
    }

    Ok(())
}
