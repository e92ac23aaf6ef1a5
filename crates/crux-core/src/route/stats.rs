//! Aggregate statistics over ticked routes.

use super::model::RouteInfo;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for routes that carry no grade.
pub const UNKNOWN_GRADE: &str = "Unknown";

/// Number of ticked routes at one grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    pub grade: String,
    pub count: usize,
}

/// Counts routes per grade, sorted by grade label.
pub fn grade_distribution(routes: &[RouteInfo]) -> Vec<GradeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for route in routes {
        let grade = if route.grade.is_empty() {
            UNKNOWN_GRADE
        } else {
            route.grade.as_str()
        };
        *counts.entry(grade).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(grade, count)| GradeCount {
            grade: grade.to_string(),
            count,
        })
        .collect()
}

/// The first `limit` routes. Collections are kept most-recent-first, so this
/// is the most recent activity.
pub fn recent_routes(routes: &[RouteInfo], limit: usize) -> Vec<RouteInfo> {
    routes.iter().take(limit).cloned().collect()
}

/// Everything the profile view shows about a user's ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickStats {
    pub total: usize,
    pub grade_distribution: Vec<GradeCount>,
    pub recent: Vec<RouteInfo>,
}

impl TickStats {
    pub fn from_routes(routes: &[RouteInfo], recent_limit: usize) -> Self {
        Self {
            total: routes.len(),
            grade_distribution: grade_distribution(routes),
            recent: recent_routes(routes, recent_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_distribution_groups_and_sorts() {
        let routes = vec![
            RouteInfo::new("1", "a").with_grade("5.10a"),
            RouteInfo::new("2", "b").with_grade("5.9"),
            RouteInfo::new("3", "c").with_grade("5.10a"),
            RouteInfo::new("4", "d"),
        ];

        let dist = grade_distribution(&routes);
        assert_eq!(
            dist,
            vec![
                GradeCount {
                    grade: "5.10a".into(),
                    count: 2
                },
                GradeCount {
                    grade: "5.9".into(),
                    count: 1
                },
                GradeCount {
                    grade: "Unknown".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_stats_recent_limit() {
        let routes: Vec<RouteInfo> = (0..15)
            .map(|i| RouteInfo::new(i.to_string(), format!("route {i}")))
            .collect();

        let stats = TickStats::from_routes(&routes, 10);
        assert_eq!(stats.total, 15);
        assert_eq!(stats.recent.len(), 10);
        assert_eq!(stats.recent[0].id, "0");
        assert_eq!(stats.grade_distribution.len(), 1);
        assert_eq!(stats.grade_distribution[0].count, 15);
    }

    #[test]
    fn test_empty() {
        let stats = TickStats::from_routes(&[], 10);
        assert_eq!(stats.total, 0);
        assert!(stats.grade_distribution.is_empty());
        assert!(stats.recent.is_empty());
    }
}
