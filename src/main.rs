use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use patchforge::compare::mixed_weapons;
use patchforge::config::{Config, ConfigOverrides};
use patchforge::output::csv::{comparison_to_csv, totals_to_csv};
use patchforge::output::json::{render_json, render_report_json, render_summary_json};
use patchforge::output::table::{
    render_comparison_table, render_summary_table, render_top_changes_table, render_totals_table,
    TableOptions,
};
use patchforge::session::{Action, Comparison, Outcome, Session, Side};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "patchforge",
    version,
    about = "Compare weapon stats between two patches"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Where last-used snapshot paths are remembered.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two snapshots and print the per-metric changes
    Compare {
        old: Option<PathBuf>,
        new: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write an HTML report
        #[arg(long)]
        export: Option<PathBuf>,
        /// Print every row instead of the preview
        #[arg(long)]
        all: bool,
        #[arg(long)]
        rows: Option<usize>,
        /// Add an overall "Mixed" row after weapons with both buffs and nerfs
        #[arg(long)]
        show_mixed: bool,
    },
    /// Print aggregate counts, net deltas and the largest changes
    Summary {
        old: Option<PathBuf>,
        new: Option<PathBuf>,
        #[arg(long)]
        top: Option<usize>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(overrides_for(&cli.command));

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| config.resolved_settings_path());
    debug!(settings = %settings_path.display(), "using settings file");
    let mut session = Session::new(config.catalog(), Some(settings_path));

    match &cli.command {
        Commands::Compare {
            old,
            new,
            csv,
            export,
            all,
            ..
        } => {
            let comparison = run_comparison(&mut session, old.as_deref(), new.as_deref())?;
            let limit = if *all {
                None
            } else {
                Some(config.report.preview_rows)
            };
            print_comparison(&comparison, &config, limit, cli.output)?;

            if let Some(path) = csv {
                report_export(session.dispatch(Action::ExportCsv(path.clone()))?);
            }
            if let Some(path) = export {
                report_export(session.dispatch(Action::ExportHtml(path.clone()))?);
            }
        }
        Commands::Summary { old, new, .. } => {
            run_comparison(&mut session, old.as_deref(), new.as_deref())?;
            let Outcome::Summarized(summary) = session.dispatch(Action::Summarize)? else {
                return Err(anyhow!("summary action returned an unexpected outcome"));
            };
            let top = session.top_changes(config.report.top_n)?;
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_summary_table(&summary));
                    println!("Net Δ by metric");
                    println!("{}", render_totals_table(&summary));
                    println!("Top {} changes (by absolute Δ)", config.report.top_n);
                    println!("{}", render_top_changes_table(&top));
                }
                OutputFormat::Json => println!("{}", render_summary_json(&summary, &top)?),
                OutputFormat::Csv => print!("{}", totals_to_csv(&summary)?),
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn overrides_for(command: &Commands) -> ConfigOverrides {
    match command {
        Commands::Compare {
            rows, show_mixed, ..
        } => ConfigOverrides {
            preview_rows: *rows,
            show_mixed_rows: show_mixed.then_some(true),
            ..ConfigOverrides::default()
        },
        Commands::Summary { top, .. } => ConfigOverrides {
            top_n: *top,
            ..ConfigOverrides::default()
        },
        Commands::Config { .. } => ConfigOverrides::default(),
    }
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

/// Loads both sides (falling back to remembered paths) and compares them.
fn run_comparison(
    session: &mut Session,
    old: Option<&Path>,
    new: Option<&Path>,
) -> Result<Comparison> {
    let old = resolve_path(session, Side::Old, old)?;
    let new = resolve_path(session, Side::New, new)?;

    for action in [Action::LoadOld(old), Action::LoadNew(new), Action::Compare] {
        match session.dispatch(action)? {
            Outcome::Loaded {
                side,
                path,
                weapons,
            } => info!("loaded {side} snapshot {} ({weapons} weapons)", path.display()),
            Outcome::Compared { rows } => debug!(rows, "comparison ready"),
            _ => {}
        }
    }

    session
        .last_comparison()
        .cloned()
        .ok_or_else(|| anyhow!("comparison produced no result"))
}

fn resolve_path(session: &Session, side: Side, given: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = given {
        return Ok(path.to_path_buf());
    }
    session
        .remembered_path(side)
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("no {side} snapshot given and none remembered from a previous run"))
}

fn print_comparison(
    comparison: &Comparison,
    config: &Config,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let Comparison { records, summary } = comparison;
    match format {
        OutputFormat::Table => {
            println!("PATCH COMPARISON SUMMARY");
            println!("{}", render_summary_table(summary));
            let mixed = mixed_weapons(records);
            let options = TableOptions {
                limit,
                show_mixed: config.report.show_mixed_rows,
            };
            println!("{}", render_comparison_table(records, &mixed, options));
        }
        OutputFormat::Json => println!("{}", render_report_json(records, summary)?),
        OutputFormat::Csv => print!("{}", comparison_to_csv(records)?),
    }
    Ok(())
}

fn report_export(outcome: Outcome) {
    if let Outcome::Exported { format, path } = outcome {
        eprintln!("{format} exported: {}", path.display());
    }
}
