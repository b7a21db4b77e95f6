//! Set the biometric profile and print the derived metrics
//! Usage: cargo run --bin set_profile -- <height_cm> <weight_kg> <age> <sex> [activity_level]

use fittrack::config::Config;
use fittrack::db::{self, Database};
use fittrack::tools::health::{self, ProfileInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 4 {
        eprintln!("Usage: set_profile <height_cm> <weight_kg> <age> <sex> [activity_level]");
        std::process::exit(2);
    }

    let input = ProfileInput {
        height: args[0].parse()?,
        height_unit: "cm".to_string(),
        weight: args[1].parse()?,
        weight_unit: "kg".to_string(),
        age_years: args[2].parse()?,
        sex: args[3].clone(),
        activity_factor: None,
        activity_level: args.get(4).cloned(),
    };

    let config = Config::from_env();
    println!("Database: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(db::run_migrations)?;

    let profile = health::set_profile(&database, &input, config.default_activity_factor)?;
    println!("Profile set:");
    println!("  Height: {:.1} cm", profile.height_cm);
    println!("  Weight: {:.1} kg", profile.weight_kg);
    println!("  Age: {}", profile.age_years);
    println!("  Sex: {}", profile.sex.as_str());
    println!("  Activity factor: {}", profile.activity_factor);

    let summary = health::get_profile_health_summary(&database)?;
    if let Some(summary) = summary.summary {
        println!("  BMI: {:.2} ({})", summary.bmi, summary.bmi_category);
        println!("  BMR: {:.1} kcal", summary.bmr);
        println!("  Daily calories: {} kcal", summary.daily_calories);
    }

    Ok(())
}
