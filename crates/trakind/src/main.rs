// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! trakind - a Telegram bot announcing open IND appointment slots.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod locations;
mod serve;
mod shutdown;
mod status;

use clap::{Parser, Subcommand};

use trakind_config::{TrakindConfig, render_errors};

/// trakind - IND appointment slot tracker for Telegram.
#[derive(Parser, Debug)]
#[command(name = "trakind", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot (default).
    Serve,
    /// Show stored subscription and user counts.
    Status {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// List the tracked offices and the appointment types they offer.
    Locations {
        #[arg(long)]
        json: bool,
    },
}

fn config_or_exit(
    loaded: Result<TrakindConfig, Vec<trakind_config::ConfigError>>,
) -> TrakindConfig {
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = config_or_exit(trakind_config::load_and_validate_for_serve());
            serve::run_serve(config).await
        }
        Commands::Status { json, plain } => {
            let config = config_or_exit(trakind_config::load_and_validate());
            status::run_status(&config, json, plain).await
        }
        Commands::Locations { json } => locations::print_locations(json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["trakind"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn status_flags_parse() {
        let cli = Cli::try_parse_from(["trakind", "status", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Status {
                json: true,
                plain: false
            })
        ));
    }
}
