use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hourglass_core::layout::UNALLOCATED_LABEL;
use hourglass_core::{distribution_order, format, Budget, TaskStore, TimeFrame};
use std::path::PathBuf;

mod app;
mod command;
mod config;
mod export;
mod logging;
mod shell;
mod state;
mod ui;

use command::CommandParser;
use export::ExportFormat;

const BUILD_SHA: &str = env!("HOURGLASS_BUILD_SHA");

/// Written into exported PDFs.
pub fn producer() -> String {
    format!("hourglass {} ({BUILD_SHA})", env!("CARGO_PKG_VERSION"))
}

#[derive(Parser, Debug)]
#[command(
    name = "hourglass",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("HOURGLASS_BUILD_SHA"), ")"),
    about = "Budget your hours across tasks and export a summary report"
)]
struct Cli {
    /// Config file (default: ~/.hourglass/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. debug or hourglass=trace (RUST_LOG wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
struct BudgetArgs {
    /// Time frame label: daily or weekly
    #[arg(long)]
    frame: Option<TimeFrame>,

    /// Hours available in the time frame
    #[arg(long)]
    available: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Session {
        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// Lay out the report for the given tasks and export it
    Report {
        #[command(flatten)]
        budget: BudgetArgs,

        /// Task as NAME:HOURS[:PRIORITY]; repeat for more tasks
        #[arg(long = "task", value_name = "SPEC")]
        tasks: Vec<String>,

        #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
        format: ExportFormat,

        /// Output directory (default: export.output_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the allocation summary for the given tasks
    Summary {
        #[command(flatten)]
        budget: BudgetArgs,

        /// Task as NAME:HOURS[:PRIORITY]; repeat for more tasks
        #[arg(long = "task", value_name = "SPEC")]
        tasks: Vec<String>,
    },

    /// Manage ~/.hourglass/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg_path = config::config_path(cli.config.as_deref())?;
    let mut cfg = config::load_config(&cfg_path)?;

    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log.level.clone());
    let log_file = match &cfg.log.file {
        Some(p) => Some(p.clone()),
        None => state::default_log_path().ok(),
    };
    let _guard = logging::init_logging(&level, log_file.as_deref());
    tracing::debug!(config = %cfg_path.display(), "loaded config");

    match cli.command.unwrap_or(Command::Session {
        budget: BudgetArgs::default(),
    }) {
        Command::Session { budget } => {
            cfg.apply_budget_overrides(budget.frame, budget.available);
            checked_store(cfg.budget())?;
            let rt = tokio::runtime::Handle::current();
            tokio::task::block_in_place(|| shell::run_session(&cfg, rt))?;
        }

        Command::Report {
            budget,
            tasks,
            format,
            out,
        } => {
            cfg.apply_budget_overrides(budget.frame, budget.available);
            let store = store_from_specs(cfg.budget(), &tasks)?;
            let meta = cfg.report_meta()?;
            let doc = hourglass_core::report(&store, &meta);
            println!(
                "Laid out {} task(s) on {} page(s)",
                store.len(),
                doc.page_count()
            );
            let path = export::export(doc, format, &cfg.export_settings(out)).await?;
            println!("Wrote {}", path.display());
        }

        Command::Summary { budget, tasks } => {
            cfg.apply_budget_overrides(budget.frame, budget.available);
            let store = store_from_specs(cfg.budget(), &tasks)?;
            print_summary(&store);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&cfg_path)?,
            ConfigCommand::Show => {
                println!("# {}", cfg_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// A store with `budget` applied through the store's own validation.
fn checked_store(budget: Budget) -> Result<TaskStore> {
    let mut store = TaskStore::new();
    store.set_time_frame(budget.time_frame);
    store
        .set_available_time(budget.available_time)
        .context("--available")?;
    Ok(store)
}

fn store_from_specs(budget: Budget, specs: &[String]) -> Result<TaskStore> {
    let parser = CommandParser::new()?;
    let mut store = checked_store(budget)?;
    for spec in specs {
        let task = parser.parse_task_spec(spec)?;
        store
            .add_task(task)
            .with_context(|| format!("--task {spec}"))?;
    }
    Ok(store)
}

fn print_summary(store: &TaskStore) {
    let alloc = store.allocation();
    let frame = store.budget().time_frame;

    println!("# Time summary\n");
    println!("{}", format::time_frame_line(frame));
    println!("Available time:  {} hours", format::hours(alloc.available_time));
    println!(
        "Allocated time:  {} hours ({})",
        format::fixed1(alloc.total_allocated_time),
        format::percent(alloc.utilization())
    );
    println!("Remaining time:  {}", format::remaining_value(&alloc));
    println!("\n{}", format::status_line(&alloc));
    println!("{}\n", format::advice_line(&alloc, frame));

    if store.is_empty() {
        println!("No tasks added yet. Pass --task NAME:HOURS[:PRIORITY].");
        return;
    }

    println!("## Distribution\n");
    for t in distribution_order(store.tasks()) {
        println!(
            "- {} | {} {} | {}",
            t.name,
            format::fixed1(t.duration),
            format::hours_noun(t.duration),
            format::percent(alloc.task_percent(t))
        );
    }
    if let Some(free) = alloc.unallocated() {
        println!(
            "- {UNALLOCATED_LABEL} | {} hours | {}",
            format::fixed1(free),
            format::percent(alloc.percent_of(free))
        );
    }
}
