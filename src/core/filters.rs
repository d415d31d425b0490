use crate::models::{Level, Project, Source};
use std::str::FromStr;

/// Which providers take part in an aggregation round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(Source),
}

impl SourceFilter {
    /// Parse an optional query parameter; absent, empty and `all` select everything
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        match value.map(str::trim) {
            None | Some("") => Ok(SourceFilter::All),
            Some(v) => v.parse(),
        }
    }

    #[inline]
    pub fn selects(&self, source: Source) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(wanted) => *wanted == source,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SourceFilter::All),
            "repository" | "github" => Ok(SourceFilter::Only(Source::Repository)),
            "paper" => Ok(SourceFilter::Only(Source::Paper)),
            "dataset" => Ok(SourceFilter::Only(Source::Dataset)),
            other => Err(format!(
                "Source must be one of: repository, paper, dataset, all (got '{}')",
                other
            )),
        }
    }
}

/// Difficulty filter applied by the ranker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    pub fn parse(value: Option<&str>) -> Result<Self, String> {
        match value.map(str::trim) {
            None | Some("") => Ok(LevelFilter::All),
            Some(v) => v.parse(),
        }
    }

    #[inline]
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => project.level == *level,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::All);
        }
        s.parse::<Level>().map(LevelFilter::Only).map_err(|_| {
            format!(
                "Level must be one of: easy, intermediate, advanced, all (got '{}')",
                s.trim()
            )
        })
    }
}
