use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use budget_cli::config::{AppConfig, ConfigOverrides};
use budget_cli::report::{AllocationReport, GoalTable, format_money};
use budget_cli::{app, logging, utils};
use budget_core::starter::new_goal;
use budget_core::{PayCycle, PayFrequency};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Splits each paycheck across savings goals so every goal is funded by its
/// deadline.
#[derive(Debug, Parser)]
#[command(name = "budget", version, about)]
struct Cli {
    /// Config file (defaults to $BUDGET_CONFIG, then ./budget.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database backend to use.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `budget.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or filter directive (e.g. `debug`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Date to treat as today (YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// View and edit savings goals.
    #[command(subcommand)]
    Goals(GoalsCommand),

    /// Split a paycheck across a user's goals.
    Allocate(AllocateArgs),

    /// List users with stored goals.
    Users,
}

#[derive(Debug, Subcommand)]
enum GoalsCommand {
    /// Show a user's goals.
    List {
        #[arg(long)]
        user: String,
    },

    /// Add a goal. Omitted fields come from the "New Goal" template.
    Add {
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = utils::parse_amount)]
        target: Option<Decimal>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        created: Option<NaiveDate>,
        #[arg(long, value_parser = utils::parse_amount)]
        saved: Option<Decimal>,
    },

    /// Record the amount saved toward a goal.
    SetSaved {
        #[arg(long)]
        user: String,
        /// Goal number as shown by `goals list`.
        #[arg(long)]
        index: usize,
        #[arg(long, value_parser = utils::parse_amount)]
        amount: Decimal,
    },

    /// Delete a goal.
    Remove {
        #[arg(long)]
        user: String,
        /// Goal number as shown by `goals list`.
        #[arg(long)]
        index: usize,
    },
}

#[derive(Debug, Args)]
struct AllocateArgs {
    #[arg(long)]
    user: String,

    /// Paycheck amount.
    #[arg(long, value_parser = utils::parse_amount)]
    amount: Decimal,

    /// Side income added to this paycheck.
    #[arg(long, value_parser = utils::parse_amount)]
    additional_income: Option<Decimal>,

    /// weekly, biweekly or monthly (defaults to the config file value).
    #[arg(long)]
    frequency: Option<PayFrequency>,

    /// Date of this paycheck (defaults to today).
    #[arg(long)]
    pay_date: Option<NaiveDate>,

    /// Store the effective saved amounts back into the goals.
    #[arg(long, default_value_t = false)]
    write_back: bool,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let (mut config, config_path) = AppConfig::discover(cli.config.as_deref())?;
    let level_from_cli = cli.log_level.is_some();
    config.apply(ConfigOverrides {
        backend: cli.backend,
        connection_string: cli.db,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });

    // RUST_LOG wins unless a level was given on the command line.
    if level_from_cli || std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.logging.level)?;
    }
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    if let Some(path) = &config_path {
        debug!("using config file {}", path.display());
    }

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let db_config = config.db_config();

    debug!("connecting to {} backend", db_config.backend);
    let registry = app::build_registry();
    let repo = registry
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open database '{}'", db_config.connection_string))?;

    match cli.command {
        Command::Users => {
            for user in app::list_users(&*repo).await? {
                println!("{user}");
            }
        }
        Command::Goals(GoalsCommand::List { user }) => {
            let goals = app::list_goals(&*repo, &user).await?;
            print!("{}", GoalTable(&goals));
        }
        Command::Goals(GoalsCommand::Add {
            user,
            name,
            target,
            deadline,
            created,
            saved,
        }) => {
            let mut goal = new_goal(today);
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                goal.name = name.trim().to_string();
            }
            goal.target = target.unwrap_or(goal.target);
            goal.deadline = deadline.unwrap_or(goal.deadline);
            goal.created = created.unwrap_or(goal.created);
            goal.saved_so_far = saved.unwrap_or(goal.saved_so_far);

            let name = goal.name.clone();
            let position = app::add_goal(&*repo, &user, goal).await?;
            println!("Added goal #{position} '{name}' for {user}.");
        }
        Command::Goals(GoalsCommand::SetSaved {
            user,
            index,
            amount,
        }) => {
            let goal = app::set_saved(&*repo, &user, index, amount).await?;
            println!(
                "Saved so far for '{}' is now {}.",
                goal.name,
                format_money(goal.saved_so_far)
            );
        }
        Command::Goals(GoalsCommand::Remove { user, index }) => {
            let goal = app::remove_goal(&*repo, &user, index).await?;
            println!("Removed goal '{}'.", goal.name);
        }
        Command::Allocate(args) => {
            let frequency = args.frequency.unwrap_or(config.pay.frequency);
            let pay_date = args.pay_date.unwrap_or(today);
            let cycle = PayCycle::new(frequency, pay_date, args.amount)
                .with_additional_income(args.additional_income.unwrap_or(Decimal::ZERO));

            let allocation =
                app::allocate(&*repo, &args.user, &cycle, today, args.write_back).await?;
            if allocation.seeded {
                println!("No goals found for {}; added starter goals.", args.user);
            }
            print!(
                "{}",
                AllocationReport {
                    cycle: &cycle,
                    result: &allocation.result,
                }
            );
            if allocation.result.is_underfunded() {
                warn!(
                    user = %args.user,
                    shortfall = %allocation.result.shortfall,
                    "paycheck does not cover all goals"
                );
            }
            if args.write_back {
                println!("Saved amounts updated.");
            }
        }
    }

    Ok(())
}
