//! Theme and notification switches.

use super::context::AppContext;
use super::output::print_json;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

fn theme_name(is_dark_mode: bool) -> &'static str {
    if is_dark_mode { "dark" } else { "light" }
}

/// Shows or sets the theme. With `--user` the remote preference is loaded
/// first and updated too.
pub async fn theme(ctx: &AppContext, theme: Option<Theme>) -> Result<()> {
    ctx.optional_session().await?;

    if let Some(theme) = theme {
        ctx.manager
            .set_dark_mode(theme == Theme::Dark)
            .await
            .context("Theme saved on this device but not for the account")?;
    }

    let current = theme_name(ctx.manager.is_dark_mode());
    if ctx.json {
        return print_json(&json!({ "theme": current }));
    }
    println!("Theme: {}", current);
    Ok(())
}

pub fn notifications(ctx: &AppContext, switch: Option<Switch>) -> Result<()> {
    if let Some(switch) = switch {
        ctx.notifier.set_enabled(switch == Switch::On)?;
    }

    let enabled = ctx.notifier.is_enabled();
    if ctx.json {
        return print_json(&json!({ "notifications_enabled": enabled }));
    }
    println!(
        "Milestone notifications: {}",
        if enabled { "on" } else { "off" }
    );
    Ok(())
}
