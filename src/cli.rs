use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::{error, info};

use crate::config::Config;
use crate::database::Database;
use crate::error::SeedError;
use crate::runner::{self, report_line, RunOptions};
use crate::schema::{CATEGORY_COLUMN, OLD_PRICE_COLUMN};
use crate::seed::InsertMode;

#[derive(Parser)]
#[command(
    name = "productseed",
    version,
    about = "Adds the oldPrice/category columns to the Product table and inserts the starter products"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Patch the schema, then insert the seed products (default if no command specified)
    Run {
        #[command(flatten)]
        db: DbArgs,

        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Add the oldPrice and category columns only
    Patch {
        #[command(flatten)]
        db: DbArgs,
    },

    /// Insert the seed products only
    Seed {
        #[command(flatten)]
        db: DbArgs,

        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Show which seed columns exist and how many products are stored
    Status {
        #[command(flatten)]
        db: DbArgs,
    },
}

#[derive(Args, Default)]
pub struct DbArgs {
    /// Database file (default: from config, "prisma/dev.db")
    #[arg(long = "db", short = 'd')]
    pub db: Option<PathBuf>,
}

impl DbArgs {
    fn resolve(&self, config: &Config) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| config.database.path.clone())
    }
}

#[derive(Args, Default)]
pub struct SeedArgs {
    /// Don't insert products whose name is already present
    #[arg(long = "skip-existing", default_value_t = false)]
    pub skip_existing: bool,

    /// Exit with an error if the database can't be opened or the insert fails
    #[arg(long = "strict", default_value_t = false)]
    pub strict: bool,
}

impl SeedArgs {
    fn mode(&self) -> InsertMode {
        if self.skip_existing {
            InsertMode::SkipExisting
        } else {
            InsertMode::Append
        }
    }
}

impl Cli {
    pub fn handle_command_line(config: &Config) -> Result<(), SeedError> {
        let args = Cli::parse();

        let command = args.command.unwrap_or(Command::Run {
            db: DbArgs::default(),
            seed: SeedArgs::default(),
        });

        Self::execute(command, config, &mut io::stdout())
    }

    fn execute<W: Write>(
        command: Command,
        config: &Config,
        out: &mut W,
    ) -> Result<(), SeedError> {
        match command {
            Command::Run { db, seed } => Self::run_steps(&db, &seed, true, true, config, out),
            Command::Patch { db } => {
                Self::run_steps(&db, &SeedArgs::default(), true, false, config, out)
            }
            Command::Seed { db, seed } => Self::run_steps(&db, &seed, false, true, config, out),
            Command::Status { db } => Self::print_status(&db.resolve(config), out),
        }
    }

    fn run_steps<W: Write>(
        db: &DbArgs,
        seed: &SeedArgs,
        patch_schema: bool,
        run_seed: bool,
        config: &Config,
        out: &mut W,
    ) -> Result<(), SeedError> {
        let path = db.resolve(config);

        // A connection failure is reported like an insert failure.
        let database = match Database::open(&path) {
            Ok(database) => database,
            Err(e) => {
                error!("Failed to open database: {}", e);
                report_line(out, &format!("Error: {}", e));
                return Self::strict_result(seed, true);
            }
        };

        let options = RunOptions {
            patch_schema,
            seed: run_seed,
            mode: seed.mode(),
        };
        info!("Running with {:?} against {}", options, path.display());

        let outcome = runner::run(database, &options, out);

        if !run_seed {
            for (patch, status) in &outcome.patches.entries {
                report_line(out, &format!("{}.{}: {}", patch.table, patch.column, status));
            }
        }

        Self::strict_result(seed, outcome.is_failure())
    }

    fn strict_result(seed: &SeedArgs, failed: bool) -> Result<(), SeedError> {
        if seed.strict && failed {
            return Err(SeedError::Error("seeding failed".to_string()));
        }
        Ok(())
    }

    fn print_status<W: Write>(path: &Path, out: &mut W) -> Result<(), SeedError> {
        let database = Database::open(path)?;
        let columns = database.product_columns()?;
        let count = database.product_count()?;

        writeln!(out, "Database: {}", database.path().display())?;
        for name in [OLD_PRICE_COLUMN, CATEGORY_COLUMN] {
            match columns.iter().find(|c| c.name == name) {
                Some(column) => writeln!(out, "  {}: present ({})", name, column.definition())?,
                None => writeln!(out, "  {}: missing", name)?,
            }
        }
        writeln!(out, "  Products: {}", count)?;

        Ok(())
    }
}
