//! Display helpers for route text.
//!
//! Description and location fields came out of the data import as
//! stringified lists (`"['P1. Corner.', 'P2. Crack.']"`). These helpers turn
//! them into readable text; storage always keeps the raw value.

use super::model::RouteInfo;

/// Strips list punctuation from imported free text.
///
/// Removes `[`, `]` and `'`, turns commas into spaces, collapses repeated
/// spaces and trims the result.
pub fn clean_list_text(text: &str) -> String {
    let replaced: String = text
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\''))
        .map(|c| if c == ',' { ' ' } else { c })
        .collect();

    let mut cleaned = String::with_capacity(replaced.len());
    let mut previous_space = false;
    for c in replaced.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        cleaned.push(c);
    }

    cleaned.trim().to_string()
}

/// `2.666` → `"2.7 stars"`.
pub fn format_rating(mean_rating: f64) -> String {
    format!("{:.1} stars", mean_rating)
}

/// `"Oregon > Steins Overlook"`.
pub fn sector_path(route: &RouteInfo) -> String {
    format!("{} > {}", route.state, route.parent_sector)
}

/// Upper-cases the first letter of every whitespace-separated word.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
