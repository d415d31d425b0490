use crate::core::scoring::{paper_level, paper_novelty};
use crate::models::{Project, Source};
use crate::services::provider::{Provider, ProviderError};
use async_trait::async_trait;
use chrono::Datelike;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;

/// Public arXiv export endpoint
pub const DEFAULT_ARXIV_URL: &str = "https://export.arxiv.org";

/// Summaries longer than this are cut and suffixed with an ellipsis
pub const MAX_SUMMARY_CHARS: usize = 300;

/// Maximum number of categories carried over as tags
const MAX_PAPER_TAGS: usize = 3;

/// One `<entry>` of the Atom feed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub published: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"id" => Some(Field::Id),
            b"title" => Some(Field::Title),
            b"summary" => Some(Field::Summary),
            b"published" => Some(Field::Published),
            _ => None,
        }
    }
}

/// Paper feed provider backed by the arXiv Atom API
pub struct ArxivProvider {
    base_url: String,
    client: Client,
}

impl ArxivProvider {
    pub fn new(base_url: String, client: Client) -> Self {
        Self { base_url, client }
    }
}

#[async_trait]
impl Provider for ArxivProvider {
    fn source(&self) -> Source {
        Source::Paper
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Project>, ProviderError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/query", self.base_url.trim_end_matches('/'));
        let search_query = format!("all:{}", query);
        let max_results = limit.to_string();

        tracing::debug!("Querying paper feed: {} (search_query={})", url, search_query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(response.status()));
        }

        let body = response.text().await?;
        let entries = parse_feed(&body)?;

        let projects: Vec<Project> = entries
            .into_iter()
            .filter_map(entry_to_project)
            .take(limit)
            .collect();

        tracing::debug!("Paper feed for '{}' produced {} projects", query, projects.len());

        Ok(projects)
    }
}

/// Parse the entries of an Atom feed document
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field: Option<Field> = None;
    let mut saw_feed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"feed" => saw_feed = true,
                    b"entry" => current = Some(FeedEntry::default()),
                    b"category" => push_category(&mut current, &e),
                    other if current.is_some() => field = Field::from_tag(other),
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"category" {
                    push_category(&mut current, &e);
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map_err(|e| ProviderError::InvalidResponse(format!("Bad feed text: {}", e)))?;
                    append_text(entry, f, &text);
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    let text = String::from_utf8_lossy(&t).into_owned();
                    append_text(entry, f, &text);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"entry" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                    field = None;
                } else if field.is_some() && Field::from_tag(name.as_ref()) == field {
                    field = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ProviderError::InvalidResponse(format!(
                    "Malformed feed at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !saw_feed {
        return Err(ProviderError::InvalidResponse("Missing <feed> root element".to_string()));
    }

    Ok(entries)
}

fn push_category(current: &mut Option<FeedEntry>, e: &BytesStart<'_>) {
    let Some(entry) = current.as_mut() else {
        return;
    };
    if let Ok(Some(attr)) = e.try_get_attribute("term") {
        if let Ok(term) = attr.unescape_value() {
            entry.categories.push(term.into_owned());
        }
    }
}

fn append_text(entry: &mut FeedEntry, field: Field, text: &str) {
    let target = match field {
        Field::Id => &mut entry.id,
        Field::Title => &mut entry.title,
        Field::Summary => &mut entry.summary,
        Field::Published => &mut entry.published,
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Normalize a feed entry; entries without an identifier or title are dropped
pub fn entry_to_project(entry: FeedEntry) -> Option<Project> {
    let link = entry.id.trim().to_string();
    let title = collapse_whitespace(&entry.title);
    if link.is_empty() || title.is_empty() {
        tracing::debug!("Skipping feed entry without id or title");
        return None;
    }

    let id = link
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(link.as_str())
        .to_string();

    let year = publication_year(&entry.published);
    let novelty_score = paper_novelty(year);

    Some(Project {
        id,
        title,
        description: truncate_summary(&collapse_whitespace(&entry.summary)),
        source: Source::Paper,
        level: paper_level(novelty_score),
        novelty_score,
        url: link,
        tags: entry.categories.into_iter().take(MAX_PAPER_TAGS).collect(),
        language: None,
        stars: None,
    })
}

/// Year of an RFC 3339 (or bare `YYYY-MM-DD`) timestamp
pub fn publication_year(published: &str) -> Option<i32> {
    let published = published.trim();
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(published) {
        return Some(ts.year());
    }
    chrono::NaiveDate::parse_from_str(published.get(..10)?, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// First `MAX_SUMMARY_CHARS` characters followed by an ellipsis
pub fn truncate_summary(summary: &str) -> String {
    let cut = summary
        .char_indices()
        .nth(MAX_SUMMARY_CHARS)
        .map_or(summary.len(), |(i, _)| i);
    format!("{}...", &summary[..cut])
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <id>http://arxiv.org/api/query</id>
  <title type="html">ArXiv Query: search_query=all:vision</title>
  <entry>
    <id>http://arxiv.org/abs/2403.01234v2</id>
    <published>2024-03-02T17:59:59Z</published>
    <title>  Sparse Attention
      for Vision &amp; Language  </title>
    <summary>
      We study sparse attention.
    </summary>
    <arxiv:primary_category term="cs.CV" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CV" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="stat.ML" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2106.00001v1</id>
    <published>2021-06-01T00:00:00Z</published>
    <title>Older Work</title>
    <summary>Short.</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_entries() {
        let entries = parse_feed(FEED).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "http://arxiv.org/abs/2403.01234v2");
        assert_eq!(entries[0].categories, vec!["cs.CV", "cs.LG", "cs.CL", "stat.ML"]);
        assert!(entries[1].categories.is_empty());
    }

    #[test]
    fn test_entry_normalization() {
        let mut entries = parse_feed(FEED).unwrap().into_iter();

        let recent = entry_to_project(entries.next().unwrap()).unwrap();
        assert_eq!(recent.id, "2403.01234v2");
        assert_eq!(recent.title, "Sparse Attention for Vision & Language");
        assert_eq!(recent.description, "We study sparse attention....");
        assert_eq!(recent.url, "http://arxiv.org/abs/2403.01234v2");
        assert_eq!(recent.tags, vec!["cs.CV", "cs.LG", "cs.CL"]);
        assert_eq!(recent.novelty_score, 9.0);
        assert_eq!(recent.level, Level::Advanced);
        assert_eq!(recent.source, Source::Paper);

        let older = entry_to_project(entries.next().unwrap()).unwrap();
        assert_eq!(older.novelty_score, 6.0);
        assert_eq!(older.level, Level::Intermediate);
    }

    #[test]
    fn test_entry_without_id_is_skipped() {
        let entry = FeedEntry {
            title: "Untitled".to_string(),
            ..FeedEntry::default()
        };
        assert!(entry_to_project(entry).is_none());
    }

    #[test]
    fn test_unknown_date_uses_baseline() {
        let entry = FeedEntry {
            id: "http://arxiv.org/abs/x".to_string(),
            title: "T".to_string(),
            published: "someday".to_string(),
            ..FeedEntry::default()
        };
        let project = entry_to_project(entry).unwrap();
        assert_eq!(project.novelty_score, 5.0);
        assert_eq!(project.level, Level::Easy);
    }

    #[test]
    fn test_truncate_summary() {
        let long = "a".repeat(450);
        let cut = truncate_summary(&long);
        assert_eq!(cut.chars().count(), MAX_SUMMARY_CHARS + 3);
        assert!(cut.ends_with("..."));

        let exact = "é".repeat(MAX_SUMMARY_CHARS);
        assert_eq!(truncate_summary(&exact), format!("{}...", exact));

        assert_eq!(truncate_summary("Short abstract."), "Short abstract....");
        assert_eq!(truncate_summary(""), "...");
    }

    #[test]
    fn test_malformed_feed() {
        assert!(parse_feed("<feed><entry><title>x</entry></feed>").is_err());
        assert!(parse_feed(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn test_publication_year() {
        assert_eq!(publication_year("2023-11-30T10:00:00Z"), Some(2023));
        assert_eq!(publication_year("2019-01-05"), Some(2019));
        assert_eq!(publication_year(""), None);
    }

    #[tokio::test]
    async fn test_fetch_against_feed_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("search_query".into(), "all:vision".into()),
                mockito::Matcher::UrlEncoded("max_results".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let client = crate::services::provider::build_http_client(
            std::time::Duration::from_secs(5),
            "project-scout-tests",
        )
        .unwrap();
        let arxiv = ArxivProvider::new(server.url(), client);

        let projects = arxiv.fetch("vision", 1).await.unwrap();
        mock.assert_async().await;
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "2403.01234v2");
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = crate::services::provider::build_http_client(
            std::time::Duration::from_secs(5),
            "project-scout-tests",
        )
        .unwrap();
        let arxiv = ArxivProvider::new(server.url(), client);

        assert!(matches!(
            arxiv.fetch("vision", 8).await,
            Err(ProviderError::ApiError(_))
        ));
    }
}
