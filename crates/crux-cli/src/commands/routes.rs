//! Search, detail and tick/bookmark commands.

use super::context::AppContext;
use super::output::{print_json, print_routes, route_details, route_line};
use anyhow::Result;
use crux_application::ToggleOutcome;
use crux_core::route::RouteInfo;
use crux_core::user::RouteCollection;
use serde_json::json;

pub async fn search(ctx: &AppContext, query: &str) -> Result<()> {
    let routes = ctx.search.search(query).await?;
    if ctx.json {
        return print_json(&routes);
    }
    print_routes(&routes, "No routes found.");
    Ok(())
}

pub async fn show(ctx: &AppContext, route_id: &str) -> Result<()> {
    ctx.optional_session().await?;
    let route = ctx.find_route(route_id).await?;
    let ticked = ctx.manager.is_ticked(&route.id);
    let bookmarked = ctx.manager.is_bookmarked(&route.id);

    if ctx.json {
        return print_json(&json!({
            "route": route,
            "ticked": ticked,
            "bookmarked": bookmarked,
        }));
    }
    println!("{}", route_details(&route, ticked, bookmarked));
    Ok(())
}

pub async fn toggle(
    ctx: &mut AppContext,
    collection: RouteCollection,
    route_id: &str,
) -> Result<()> {
    ctx.require_session().await?;
    let route = ctx.find_route(route_id).await?;

    let outcome = match collection {
        RouteCollection::Ticks => ctx.manager.toggle_tick(&route).await?,
        RouteCollection::Bookmarks => ctx.manager.toggle_bookmark(&route).await?,
    };
    let count = match collection {
        RouteCollection::Ticks => ctx.manager.ticked_count(),
        RouteCollection::Bookmarks => ctx.manager.bookmarked_routes().len(),
    };
    let notifications = ctx.drain_notifications();

    if ctx.json {
        return print_json(&json!({
            "route_id": route.id,
            "collection": collection,
            "outcome": outcome_label(outcome),
            "count": count,
            "notifications": notifications,
        }));
    }

    println!("{}", toggle_message(collection, &route, outcome, count));
    for notification in notifications {
        println!("{} {}", notification.title, notification.body);
    }
    Ok(())
}

pub async fn list(ctx: &AppContext, collection: RouteCollection, all: bool) -> Result<()> {
    ctx.require_session().await?;
    let mut routes = match collection {
        RouteCollection::Ticks => ctx.manager.ticked_routes(),
        RouteCollection::Bookmarks => ctx.manager.bookmarked_routes(),
    };
    if !all {
        routes.truncate(ctx.config.profile.recent_ticks_limit);
    }

    if ctx.json {
        return print_json(&routes);
    }
    let empty = match collection {
        RouteCollection::Ticks => "No ticks yet.",
        RouteCollection::Bookmarks => "No bookmarks yet.",
    };
    print_routes(&routes, empty);
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<()> {
    ctx.require_session().await?;
    let stats = ctx.manager.tick_stats(ctx.config.profile.recent_ticks_limit);

    if ctx.json {
        return print_json(&stats);
    }

    println!("Total ticks: {}", stats.total);
    if !stats.grade_distribution.is_empty() {
        println!("By grade:");
        for entry in &stats.grade_distribution {
            println!("  {:<8} {}", entry.grade, entry.count);
        }
    }
    if !stats.recent.is_empty() {
        println!("Recent:");
        for route in &stats.recent {
            println!("{}", route_line(route));
        }
    }
    Ok(())
}

fn outcome_label(outcome: ToggleOutcome) -> &'static str {
    match outcome {
        ToggleOutcome::Added => "added",
        ToggleOutcome::Removed => "removed",
        ToggleOutcome::InFlight => "in_flight",
        ToggleOutcome::Stale => "stale",
    }
}

fn toggle_message(
    collection: RouteCollection,
    route: &RouteInfo,
    outcome: ToggleOutcome,
    count: usize,
) -> String {
    match outcome {
        ToggleOutcome::Added => format!(
            "Added {} to {} ({} total).",
            route.route_name, collection, count
        ),
        ToggleOutcome::Removed => format!(
            "Removed {} from {} ({} total).",
            route.route_name, collection, count
        ),
        ToggleOutcome::InFlight => format!("{} is already being updated.", route.route_name),
        ToggleOutcome::Stale => "Session ended before the change completed.".to_string(),
    }
}
