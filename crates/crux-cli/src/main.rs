use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::context::AppContext;
use commands::settings::{Switch, Theme};
use crux_core::user::RouteCollection;
use crux_infrastructure::{ConfigService, CruxPaths};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "crux")]
#[command(about = "crux - find climbing routes and track your ticks", long_about = None)]
struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// User whose ticks and bookmarks to use
    #[arg(long, global = true, env = "CRUX_USER")]
    user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the route catalog by name
    Search { query: String },
    /// Show one route in detail
    Show { route_id: String },
    /// Tick a route, or untick it if already ticked
    Tick { route_id: String },
    /// Bookmark a route, or remove the bookmark
    Bookmark { route_id: String },
    /// List ticked routes, most recent first
    Ticks {
        /// List every tick instead of the most recent ones
        #[arg(long)]
        all: bool,
    },
    /// List bookmarked routes, most recent first
    Bookmarks,
    /// Tick statistics
    Stats,
    /// Show or set the theme
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
    },
    /// Show or set milestone notifications
    Notifications {
        #[arg(value_enum)]
        switch: Option<Switch>,
    },
    /// Delete all data stored for the user
    DeleteAccount {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new()?,
    };
    let config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    let paths = CruxPaths::new(config.storage.data_dir.as_deref());

    let _log_guard = logging::init(&config.logging.level, &paths.logs_dir()?)?;
    tracing::info!(
        "[Main] crux started with config {}",
        config_service.path().display()
    );

    let mut ctx = AppContext::build(config, &paths, cli.user, cli.json).await?;

    match cli.command {
        Commands::Search { query } => commands::routes::search(&ctx, &query).await?,
        Commands::Show { route_id } => commands::routes::show(&ctx, &route_id).await?,
        Commands::Tick { route_id } => {
            commands::routes::toggle(&mut ctx, RouteCollection::Ticks, &route_id).await?
        }
        Commands::Bookmark { route_id } => {
            commands::routes::toggle(&mut ctx, RouteCollection::Bookmarks, &route_id).await?
        }
        Commands::Ticks { all } => {
            commands::routes::list(&ctx, RouteCollection::Ticks, all).await?
        }
        Commands::Bookmarks => {
            commands::routes::list(&ctx, RouteCollection::Bookmarks, true).await?
        }
        Commands::Stats => commands::routes::stats(&ctx).await?,
        Commands::Theme { theme } => commands::settings::theme(&ctx, theme).await?,
        Commands::Notifications { switch } => commands::settings::notifications(&ctx, switch)?,
        Commands::DeleteAccount { yes } => commands::account::delete_account(&ctx, yes).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["crux", "ticks", "--all", "--user", "u1", "--json"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("u1"));
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Ticks { all: true }));
    }

    #[test]
    fn test_parses_theme_value() {
        let cli = Cli::try_parse_from(["crux", "theme", "dark"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Theme {
                theme: Some(Theme::Dark)
            }
        ));
    }
}
