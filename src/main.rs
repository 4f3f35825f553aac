use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use olympic_explorer::config::load_config;
use olympic_explorer::logging::init_logging;
use olympic_explorer::synth::synthetic_records;
use olympic_explorer::{
    parse_age_input, Dashboard, DashboardViews, Dataset, FilterCriteria, Selection, Sex, ValueMode, View,
};

/// Explore Olympic athlete participation and medals for one selection.
#[derive(Debug, Parser)]
#[command(name = "olympic-explorer", version)]
struct Cli {
    /// Sex to show (M/F)
    #[arg(long)]
    sex: Sex,

    /// Sport to restrict to
    #[arg(long)]
    discipline: Option<String>,

    /// NOC code to restrict to and highlight in the medal flow
    #[arg(long)]
    country: Option<String>,

    /// Exact age, as typed; blank means any age
    #[arg(long, default_value = "")]
    age: String,

    #[arg(long)]
    year: Option<i32>,

    #[arg(long)]
    event: Option<String>,

    /// Show percentages of each group instead of counts
    #[arg(long)]
    relative: bool,

    /// Config file (defaults to ./explorer.toml when present)
    #[arg(long, env = "EXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Generate this many synthetic athletes instead of reading the CSV files
    #[arg(long)]
    synthetic: Option<usize>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write every ready view as Parquet into the configured output directory
    #[arg(long)]
    export: bool,
}

fn summary<T>(name: &str, view: &View<T>) {
    match view {
        View::Ready(_) => println!("  {name:<26} ready"),
        View::NoData => println!("  {name:<26} no data for this selection"),
    }
}

fn print_views(views: &DashboardViews) {
    println!("{} matching records", views.matched);
    summary("age distribution", &views.age_distribution);
    summary("participation over time", &views.participation_over_time);
    summary("medals by age group", &views.medal_by_age_group);
    summary("medal flow", &views.medal_flow);
    summary("gender share", &views.gender_share);
    summary("event gender split", &views.event_gender);
    summary("medal rate by participation", &views.participation_medal_rate);
    summary("first medal participation", &views.first_medal);
    summary("career spans", &views.career_spans);
    summary("hall of fame", &views.hall_of_fame);

    if let View::Ready(top) = &views.hall_of_fame {
        for (rank, tally) in top.iter().enumerate() {
            println!(
                "    {:>2}. {} ({}G {}S {}B)",
                rank + 1,
                tally.name,
                tally.gold,
                tally.silver,
                tally.bronze
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = load_config(cli.config.as_deref()).context("loading configuration")?;
    let _guard = init_logging(&cfg.log_dir, &cfg.log_level);
    let start = Instant::now();

    // field-level validation: show the message and render nothing
    let age = match parse_age_input(&cli.age) {
        Ok(age) => age,
        Err(err) => {
            eprintln!("age: {err}");
            warn!(input = %cli.age, %err, "rejected age input");
            return Ok(());
        }
    };

    let dataset = match cli.synthetic {
        Some(n) => Dataset::new(synthetic_records(n, cli.seed)),
        None => Dataset::load(&cfg.athletes_csv, cfg.regions_csv.as_deref())
            .with_context(|| format!("loading athletes from {}", cfg.athletes_csv.display()))?,
    };
    info!(records = dataset.len(), "dataset ready");

    let criteria = FilterCriteria {
        sex: Selection::Only(cli.sex),
        discipline: cli.discipline.into(),
        country: cli.country.into(),
        age,
        event: cli.event,
        year: cli.year,
    };
    let mode = if cli.relative {
        ValueMode::Relative
    } else {
        ValueMode::Absolute
    };

    let views = Dashboard::new(dataset.records())
        .render(&criteria, mode)
        .context("rendering dashboard")?;
    print_views(&views);
    if views.matched == 0 {
        for (filter, value) in dataset.unknown_filter_values(&criteria) {
            let choices = match filter {
                "discipline" => dataset.disciplines(),
                _ => dataset.countries(),
            };
            println!("  no {filter} named `{value}`; available: {}", choices.join(", "));
        }
    }

    if cli.export {
        std::fs::create_dir_all(&cfg.output_dir)
            .with_context(|| format!("creating {}", cfg.output_dir.display()))?;
        let written = views.export(&cfg.output_dir).context("exporting views")?;
        println!("wrote {} parquet files to {}", written.len(), cfg.output_dir.display());
    }

    info!(elapsed_ms = start.elapsed().as_millis() as u64, "done");
    Ok(())
}
