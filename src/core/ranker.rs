use crate::core::filters::LevelFilter;
use crate::models::Project;
use std::cmp::Ordering;

/// Result cap for ad hoc search
pub const SEARCH_CAP: usize = 30;

/// Result cap for profile recommendations
pub const RECOMMENDATION_CAP: usize = 20;

/// Result of the ranking process
#[derive(Debug)]
pub struct RankResult {
    pub projects: Vec<Project>,
    /// Candidates that survived the level filter, before truncation
    pub total_candidates: usize,
}

/// Ranking stage of the pipeline
///
/// # Stages
/// 1. Level filter
/// 2. Stable sort by novelty score, descending
/// 3. Truncate to the cap
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    pub fn new() -> Self {
        Self
    }

    /// Rank merged candidates
    ///
    /// Ties keep their merged order, so projects with equal scores appear in
    /// provider order and within a provider in the provider's own order.
    pub fn rank(&self, candidates: Vec<Project>, level: LevelFilter, cap: usize) -> RankResult {
        let mut ranked: Vec<Project> = candidates
            .into_iter()
            .filter(|project| level.matches(project))
            .collect();

        let total_candidates = ranked.len();

        // sort_by is stable
        ranked.sort_by(|a, b| {
            b.novelty_score
                .partial_cmp(&a.novelty_score)
                .unwrap_or(Ordering::Equal)
        });

        ranked.truncate(cap);

        RankResult {
            projects: ranked,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, Source};

    fn candidate(id: &str, level: Level, novelty_score: f64) -> Project {
        Project {
            id: id.to_string(),
            title: format!("Project {}", id),
            description: String::new(),
            source: Source::Repository,
            level,
            novelty_score,
            url: format!("https://example.com/{}", id),
            tags: vec![],
            language: None,
            stars: None,
        }
    }

    #[test]
    fn test_sorted_by_novelty_descending() {
        let ranker = Ranker::new();
        let candidates = vec![
            candidate("a", Level::Easy, 3.0),
            candidate("b", Level::Advanced, 9.5),
            candidate("c", Level::Intermediate, 6.1),
        ];

        let result = ranker.rank(candidates, LevelFilter::All, SEARCH_CAP);

        let ids: Vec<&str> = result.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranker = Ranker::new();
        let candidates = vec![
            candidate("first", Level::Easy, 7.0),
            candidate("high", Level::Easy, 8.0),
            candidate("second", Level::Easy, 7.0),
            candidate("third", Level::Easy, 7.0),
        ];

        let result = ranker.rank(candidates, LevelFilter::All, SEARCH_CAP);

        let ids: Vec<&str> = result.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "first", "second", "third"]);
    }

    #[test]
    fn test_level_filter_applied_before_cap() {
        let ranker = Ranker::new();
        let candidates: Vec<Project> = (0..50)
            .map(|i| {
                let level = if i % 2 == 0 { Level::Easy } else { Level::Advanced };
                candidate(&i.to_string(), level, (i % 10) as f64)
            })
            .collect();

        let result = ranker.rank(candidates, LevelFilter::Only(Level::Advanced), RECOMMENDATION_CAP);

        assert_eq!(result.total_candidates, 25);
        assert_eq!(result.projects.len(), RECOMMENDATION_CAP);
        assert!(result.projects.iter().all(|p| p.level == Level::Advanced));
    }

    #[test]
    fn test_respects_cap() {
        let ranker = Ranker::new();
        let candidates: Vec<Project> = (0..45)
            .map(|i| candidate(&i.to_string(), Level::Easy, (i % 7) as f64))
            .collect();

        let result = ranker.rank(candidates, LevelFilter::All, SEARCH_CAP);

        assert_eq!(result.projects.len(), SEARCH_CAP);
        for pair in result.projects.windows(2) {
            assert!(pair[0].novelty_score >= pair[1].novelty_score);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = Ranker::new().rank(vec![], LevelFilter::All, SEARCH_CAP);
        assert!(result.projects.is_empty());
        assert_eq!(result.total_candidates, 0);
    }
}
