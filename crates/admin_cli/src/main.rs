use std::{error::Error, io::Write, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{BudgetNewCmd, Engine, EngineError, ItemDraft, RegisterCmd};
use migration::MigratorTrait;
use sea_orm::Database;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "family_budget_admin")]
#[command(about = "Admin utilities for family_budget (bootstrap users and budgets)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./family_budget.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Budget(Budget),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user; the password is prompted for.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: Option<String>,
}

#[derive(Args, Debug)]
struct Budget {
    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    Create(BudgetCreateArgs),
    Share(BudgetShareArgs),
    /// Budgets visible to a user.
    List(BudgetListArgs),
}

#[derive(Args, Debug)]
struct BudgetCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    /// `AMOUNT[:CATEGORY]`, repeatable.
    #[arg(long = "income", value_parser = parse_item)]
    incomes: Vec<ItemDraft>,
    /// `AMOUNT[:CATEGORY]`, repeatable.
    #[arg(long = "expense", value_parser = parse_item)]
    expenses: Vec<ItemDraft>,
}

#[derive(Args, Debug)]
struct BudgetShareArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    budget: i32,
    /// Username receiving access.
    #[arg(long)]
    user: String,
}

#[derive(Args, Debug)]
struct BudgetListArgs {
    #[arg(long)]
    user: String,
}

/// `"12.50"` or `"12.50:FOOD"`. Values are validated by the engine.
fn parse_item(raw: &str) -> Result<ItemDraft, String> {
    match raw.split_once(':') {
        Some((_, "")) => Err(format!("missing category after ':' in {raw:?}")),
        Some((amount, category)) => Ok(ItemDraft::new(amount).category(category)),
        None => Ok(ItemDraft::new(raw)),
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(message: &str) -> CliResult<()> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Reads a line without echoing it, printing `*` per character.
fn prompt_password(prompt: &str) -> CliResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                break;
            }
            KeyCode::Backspace if buf.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    Ok(buf)
}

fn prompt_new_password() -> CliResult<String> {
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            notice("Password must not be empty.")?;
            continue;
        }
        if prompt_password("Confirm password: ")? == first {
            return Ok(first);
        }
        notice("Passwords do not match. Try again.")?;
    }
    Err("too many attempts".into())
}

async fn connect_engine(database_url: &str) -> CliResult<Engine> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Engine::builder().database(db).build().await?)
}

/// Prints engine failures the way an operator wants to read them.
fn report(err: &EngineError) -> ExitCode {
    match err {
        EngineError::Validation(errors) => {
            for (field, messages) in errors.fields() {
                for message in messages {
                    eprintln!("{field}: {message}");
                }
            }
            ExitCode::from(2)
        }
        other => {
            eprintln!("{other}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<Result<(), EngineError>> {
    let engine = connect_engine(&cli.database_url).await?;

    let outcome = match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;
            let mut cmd = RegisterCmd::new(args.username, password);
            if let Some(email) = args.email {
                cmd = cmd.email(email);
            }
            engine.register(cmd).await.map(|user| {
                println!("created user: {}", user.username);
            })
        }
        Command::Budget(Budget {
            command: BudgetCommand::Create(args),
        }) => {
            let mut cmd = BudgetNewCmd::new(args.name, args.owner);
            cmd.incomes = args.incomes;
            cmd.expenses = args.expenses;
            engine.create_budget(cmd).await.map(|budget| {
                println!(
                    "created budget: {} (revenue {})",
                    budget.label(),
                    budget.revenue()
                );
            })
        }
        Command::Budget(Budget {
            command: BudgetCommand::Share(args),
        }) => engine
            .share_budget(args.budget, &args.user, &args.owner)
            .await
            .map(|()| println!("shared budget #{} with {}", args.budget, args.user)),
        Command::Budget(Budget {
            command: BudgetCommand::List(args),
        }) => engine.list_budgets(&args.user).await.map(|budgets| {
            for budget in budgets {
                println!(
                    "{}\towner={}\trevenue={}\tincomes={}\texpenses={}",
                    budget.label(),
                    budget.owner,
                    budget.revenue(),
                    budget.incomes.len(),
                    budget.expenses.len()
                );
            }
        }),
    };

    Ok(outcome)
}

#[tokio::main]
async fn main() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    match run(cli).await? {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => Ok(report(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_argument_with_and_without_category() {
        assert_eq!(parse_item("12.50"), Ok(ItemDraft::new("12.50")));
        assert_eq!(
            parse_item("3:FOOD"),
            Ok(ItemDraft::new("3").category("FOOD"))
        );
        assert!(parse_item("3:").is_err());
    }

    #[test]
    fn budget_create_collects_repeated_items() {
        let cli = Cli::try_parse_from([
            "family_budget_admin",
            "budget",
            "create",
            "--owner",
            "alice",
            "--name",
            "Home",
            "--income",
            "100:WORK",
            "--expense",
            "1",
            "--expense",
            "2:FOOD",
        ])
        .unwrap();

        let Command::Budget(Budget {
            command: BudgetCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected budget create");
        };
        assert_eq!(args.incomes, vec![ItemDraft::new("100").category("WORK")]);
        assert_eq!(args.expenses.len(), 2);
    }
}
