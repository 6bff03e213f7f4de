use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[derive(Parser, Debug)]
#[command(name = "migration")]
#[command(about = "Apply or inspect the family_budget schema")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./family_budget.db?mode=rwc"
    )]
    database_url: String,

    /// Defaults to `up`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default, PartialEq, Eq)]
enum Command {
    /// Apply every pending migration.
    #[default]
    Up,
    /// Revert every applied migration, dropping all budget data.
    Down,
    /// Drop all tables and apply every migration again.
    Fresh,
    /// List applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command.unwrap_or_default() {
        Command::Up => Migrator::up(&db, None).await?,
        Command::Down => Migrator::down(&db, None).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_defaults_to_up() {
        let cli = Cli::try_parse_from(["migration", "--database-url", "sqlite::memory:"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Command::Up);

        let cli = Cli::try_parse_from(["migration", "--database-url", "sqlite::memory:", "fresh"])
            .unwrap();
        assert_eq!(cli.command, Some(Command::Fresh));
    }
}
