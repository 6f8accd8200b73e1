//! meal-wheel: spin a wheel of recipes to decide what to eat.
//!
//! With no subcommand it opens the wheel window. `serve` runs the HTTP API;
//! the remaining commands edit or spin the local wheel from the terminal.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use meal_wheel::config::Config;
use meal_wheel::paths::AppPaths;
use meal_wheel::server::{self, AppState};
use meal_wheel::{SourceType, Spinner, Store, logging, viewer};

/// Recipe wheel
#[derive(Parser, Debug)]
#[command(name = "meal-wheel", version, about = "Spin a wheel of recipes to decide what to eat")]
struct Args {
    /// Config file (default: ~/.config/meal-wheel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wheel database file (overrides [storage] path)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the wheel window (default)
    View {
        /// Start fullscreen instead of windowed
        #[arg(short, long)]
        fullscreen: bool,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the recipes on the wheel
    List,
    /// Print the popular recipe catalog
    Popular,
    /// Add a recipe to the wheel
    Add {
        name: String,
        /// Create it as a custom recipe
        #[arg(long)]
        custom: bool,
    },
    /// Remove a recipe from the wheel
    Remove { name: String },
    /// Pick a recipe
    Spin,
}

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let args = Args::parse();

    let paths = AppPaths::resolve().context("HOME is not set")?;
    let config_path = args.config.clone().unwrap_or_else(|| paths.config_file());
    let config = Config::load(&config_path)?;

    let db_path = args
        .data_file
        .clone()
        .or_else(|| config.storage.path.clone())
        .unwrap_or_else(|| paths.db_file());
    if args.data_file.is_none() && config.storage.path.is_none() {
        paths.ensure().context("Failed to create app directories")?;
    }
    let mut store =
        Store::open(&db_path).with_context(|| format!("Failed to open {}", db_path.display()))?;
    info!(path = %db_path.display(), "Opened wheel database");

    match args.command.unwrap_or(Command::View { fullscreen: false }) {
        Command::View { fullscreen } => {
            let user_id = store.resolve_user()?;
            viewer::run(store, user_id, &config, fullscreen)?;
        }

        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to create Tokio runtime")?;
            let state = AppState::new(store, config);
            runtime.block_on(server::serve(state, &host, port))?;
        }

        Command::List => {
            let user_id = store.resolve_user()?;
            let items = store.wheel_items(&user_id);
            if items.is_empty() {
                println!("No recipes yet. Add recipes to start spinning!");
            }
            for (i, item) in items.iter().enumerate() {
                println!(
                    "{:>2}. {} ({}, {})",
                    i + 1,
                    item.recipe_name,
                    item.source_type,
                    item.color
                );
            }
        }

        Command::Popular => {
            for recipe in store.popular_recipes() {
                println!("{}", recipe.name);
            }
        }

        Command::Add { name, custom } => {
            let user_id = store.resolve_user()?;
            let name = name.trim();
            let item = if custom {
                store.create_custom_recipe(&user_id, name)?
            } else {
                store.add_wheel_item(&user_id, name, SourceType::Popular)?
            };
            println!("Added {} ({})", item.recipe_name, item.color);
        }

        Command::Remove { name } => {
            let user_id = store.resolve_user()?;
            store.remove_wheel_item(&user_id, name.trim())?;
            println!("Removed {}", name.trim());
        }

        Command::Spin => {
            let user_id = store.resolve_user()?;
            let items = store.wheel_items(&user_id);
            let mut spinner = Spinner::with_duration(config.spin_duration());
            let outcome = spinner.spin(&items, Instant::now())?;
            println!(
                "{} (segment {} of {}, rotate to {:.1} degrees)",
                outcome.chosen.recipe_name,
                outcome.index + 1,
                items.len(),
                outcome.target_rotation
            );
        }
    }

    Ok(())
}
