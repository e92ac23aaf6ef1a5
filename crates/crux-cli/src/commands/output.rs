//! Text and JSON rendering shared by the commands.

use anyhow::Result;
use crux_core::route::RouteInfo;
use crux_core::route::display::{capitalize_words, clean_list_text, format_rating, sector_path};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per route: id, name, grade and area.
pub fn route_line(route: &RouteInfo) -> String {
    let grade = if route.grade.is_empty() { "?" } else { route.grade.as_str() };
    format!(
        "{:>8}  {:<32} {:<7} {}",
        route.id,
        route.route_name,
        grade,
        sector_path(route)
    )
}

pub fn print_routes(routes: &[RouteInfo], empty_message: &str) {
    if routes.is_empty() {
        println!("{}", empty_message);
        return;
    }
    for route in routes {
        println!("{}", route_line(route));
    }
}

/// Full detail view of a route.
pub fn route_details(route: &RouteInfo, ticked: bool, bookmarked: bool) -> String {
    let mut lines = vec![
        format!("{} ({})", route.route_name, route.grade),
        format!("  Type:     {}", capitalize_words(&route.type_string)),
        format!("  Area:     {}", sector_path(route)),
        format!(
            "  Rating:   {} ({} votes)",
            format_rating(route.mean_rating),
            route.num_votes
        ),
    ];
    if let Some(safety) = &route.safety {
        lines.push(format!("  Safety:   {}", safety));
    }
    let description = clean_list_text(&route.description);
    if !description.is_empty() {
        lines.push(format!("  About:    {}", description));
    }
    let location = clean_list_text(&route.location);
    if !location.is_empty() {
        lines.push(format!("  Location: {}", location));
    }
    lines.push(format!(
        "  Ticked: {}  Bookmarked: {}",
        yes_no(ticked),
        yes_no(bookmarked)
    ));
    lines.join("\n")
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
