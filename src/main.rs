use anyhow::{Context, Result};
use clap::Parser;
use quintile_trends::survey::{clean_table, load_survey_csv, reshape};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Clean a quarterly household-expenditure survey export and print one
/// income quintile's spending series in long form (JSON lines).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the survey CSV export
    #[arg(long)]
    file: PathBuf,

    /// Income quintile to plot
    #[arg(long, default_value = "1분위")]
    quintile: String,

    /// Expense category to include (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// List the distinct quintile and category values, then exit
    #[arg(long)]
    list: bool,
}

/// Categories the dashboard preselects when none are given.
const DEFAULT_CATEGORIES: &[&str] = &["소비지출", "식료품·비주류음료", "교통"];

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    let loaded = load_survey_csv(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;
    info!(
        encoding = loaded.report.encoding,
        rows = loaded.report.rows,
        columns = loaded.report.columns,
        "survey export loaded"
    );

    let table = clean_table(&loaded.table).context("cleaning survey table")?;
    info!(
        rows = table.rows.len(),
        quarters = table.quarters.len(),
        "survey table cleaned"
    );

    if args.list {
        for quintile in table.quintile_values() {
            println!("quintile\t{quintile}");
        }
        for category in table.category_values() {
            println!("category\t{category}");
        }
        return Ok(());
    }

    let categories = if args.categories.is_empty() {
        DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.categories
    };

    let records = reshape(&table, &args.quintile, &categories);
    if records.is_empty() {
        println!(
            "no data for quintile {} with categories {:?}",
            args.quintile, categories
        );
        return Ok(());
    }

    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}
