use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, bail};
use lifeplan::data::storage::export_table;
use lifeplan::util::format::{render_issues, render_table};
use lifeplan::{ScenarioSession, default_data_dir, init_logging, load_scenario, save_scenario};
use lifeplan_core::model::{BasicInfo, Parameters};
use lifeplan_core::validation::is_synthesizable;
use lifeplan_core::{StandardFormulas, seed_scenario, validate};

#[derive(Parser, Debug)]
#[command(name = "lifeplan")]
#[command(about = "Year-by-year household and corporate cash-flow projection")]
struct Args {
    /// Path to the data directory (default: ~/.lifeplan/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a seeded default scenario
    Init {
        file: PathBuf,
        /// Age in the start year
        #[arg(long, default_value_t = 35)]
        age: u32,
        #[arg(long, default_value_t = 90)]
        death_age: u32,
        /// Annual face income
        #[arg(long, default_value_t = 500.0)]
        income: f64,
        /// First simulated year (default: the current year)
        #[arg(long)]
        start_year: Option<i32>,
    },
    /// Synthesize a scenario and print or export the table
    Project {
        file: PathBuf,
        /// Write the table as JSON instead of printing it
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        from: Option<i32>,
        #[arg(long)]
        to: Option<i32>,
    },
    /// List problems in a scenario
    Validate { file: PathBuf },
}

fn current_year() -> i32 {
    jiff::Zoned::now().year() as i32
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    match args.command {
        Command::Init {
            file,
            age,
            death_age,
            income,
            start_year,
        } => {
            let mut info = BasicInfo::new(start_year.unwrap_or_else(current_year), age, death_age);
            info.annual_income = income;
            let scenario = seed_scenario(info, Parameters::default(), &StandardFormulas);
            save_scenario(&file, &scenario)
                .wrap_err_with(|| format!("writing {}", file.display()))?;
            tracing::info!(path = %file.display(), "Seeded scenario written");
            println!("Wrote {}", file.display());
        }
        Command::Project {
            file,
            json,
            from,
            to,
        } => {
            let scenario =
                load_scenario(&file).wrap_err_with(|| format!("reading {}", file.display()))?;
            let session = ScenarioSession::new(scenario);
            if let Some(error) = session.last_error() {
                bail!("synthesis failed: {error}");
            }
            match json {
                Some(out) => {
                    export_table(&out, session.table())?;
                    println!("Wrote {} years to {}", session.table().len(), out.display());
                }
                None => print!("{}", render_table(session.table(), from, to)),
            }
        }
        Command::Validate { file } => {
            let scenario =
                load_scenario(&file).wrap_err_with(|| format!("reading {}", file.display()))?;
            let issues = validate(&scenario);
            if issues.is_empty() {
                println!("No issues found");
            } else {
                print!("{}", render_issues(&issues));
            }
            if !is_synthesizable(&issues) {
                bail!("scenario cannot be synthesized");
            }
        }
    }

    tracing::info!("lifeplan finished");
    Ok(())
}
