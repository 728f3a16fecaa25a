mod cli;
mod config;
mod database;
mod error;
mod logging;
mod product;
mod runner;
mod schema;
mod seed;
mod store;

use cli::Cli;
use config::Config;
use directories::ProjectDirs;
use log::{debug, error};

fn main() {
    // Without a home directory there is no config file and no log file;
    // defaults apply and seeding still runs.
    let project_dirs = ProjectDirs::from("", "", "productseed");
    if project_dirs.is_none() {
        eprintln!("Warning: could not determine the home directory for configuration and logs");
    }

    let config = match &project_dirs {
        Some(dirs) => Config::load_config(dirs),
        None => Config::default(),
    };

    // Without file logging the log macros are no-ops.
    let _logger = project_dirs.as_ref().and_then(|dirs| {
        logging::try_setup_logging(dirs.data_local_dir().join("logs"), &config.logging)
    });

    debug!("Command-line args: {:?}", std::env::args_os().collect::<Vec<_>>());
    debug!("Configuration: {:?}", config);

    if let Err(err) = Cli::handle_command_line(&config) {
        error!("{:?}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
