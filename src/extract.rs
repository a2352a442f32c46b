//! Article extraction from a decompressed block
//!
//! Parses the synthetically-wrapped block as a forest of `<page>` records
//! and yields [`Article`] values in document order. Redirects and banned
//! namespaces are filtered out; individually malformed records are skipped
//! with a warning rather than failing the block.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::warn;

use crate::cleaner::MarkupCleaner;
use crate::{Article, DumpError, Result};

/// Title prefixes denoting meta-pages rather than articles
const BANNED_NAMESPACES: [&str; 6] =
    ["Category", "Draft", "File", "Help", "Template", "Wikipedia"];

/// Extracts article records from decompressed block XML
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleExtractor {
    cleaner: Option<MarkupCleaner>,
}

impl ArticleExtractor {
    /// Extractor yielding raw markup text
    pub fn new() -> Self {
        Self { cleaner: None }
    }

    /// Extractor running `cleaner` over each article's text
    pub fn with_cleaner(cleaner: MarkupCleaner) -> Self {
        Self {
            cleaner: Some(cleaner),
        }
    }

    /// Parse one block and yield surviving articles in document order
    ///
    /// Skips redirect records, banned-namespace titles, and records with
    /// missing fields (logged, not fatal). Returns [`DumpError::Xml`] only
    /// when the block as a whole fails to parse.
    pub fn extract(&self, block_xml: &str) -> Result<Vec<Article>> {
        let mut reader = Reader::from_str(block_xml);

        let mut articles = Vec::new();

        let mut in_page = false;
        let mut in_title = false;
        let mut in_id = false;
        let mut in_revision = false;
        let mut in_text = false;
        let mut is_redirect = false;

        let mut id: Option<String> = None;
        let mut title: Option<String> = None;
        let mut text: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"page" => {
                        in_page = true;
                        is_redirect = false;
                        id = None;
                        title = None;
                        text = None;
                    }
                    b"title" if in_page => in_title = true,
                    // revisions carry their own <id>; only the page id counts
                    b"id" if in_page && !in_revision && id.is_none() => in_id = true,
                    b"revision" if in_page => in_revision = true,
                    b"text" if in_revision => {
                        in_text = true;
                        text = Some(String::new());
                    }
                    b"redirect" if in_page => is_redirect = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => {
                    if in_page && e.name().as_ref() == b"redirect" {
                        is_redirect = true;
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let value = match e.unescape() {
                        Ok(value) => value,
                        Err(e) => return Err(DumpError::Xml(e.to_string())),
                    };
                    if in_title {
                        title = Some(value.into_owned());
                    } else if in_id {
                        id = Some(value.into_owned());
                    } else if in_text {
                        if let Some(ref mut t) = text {
                            t.push_str(&value);
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if in_text {
                        if let Some(ref mut t) = text {
                            t.push_str(&String::from_utf8_lossy(e));
                        }
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"title" => in_title = false,
                    b"id" => in_id = false,
                    b"revision" => in_revision = false,
                    b"text" => in_text = false,
                    b"page" => {
                        in_page = false;
                        if !is_redirect {
                            if let Some(article) =
                                self.finish_record(id.take(), title.take(), text.take())
                            {
                                articles.push(article);
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(DumpError::Xml(e.to_string())),
                _ => {}
            }
        }

        Ok(articles)
    }

    /// Filter and assemble one parsed record, cleaning its text if a
    /// cleaner is configured. Returns None for banned or malformed records.
    fn finish_record(
        &self,
        id: Option<String>,
        title: Option<String>,
        text: Option<String>,
    ) -> Option<Article> {
        let (id, title) = match (id, title) {
            (Some(id), Some(title)) => (id, title),
            (id, title) => {
                warn!(?id, ?title, "skipping record with missing id or title");
                return None;
            }
        };
        if is_banned_title(&title) {
            return None;
        }
        let text = match text {
            Some(text) => text,
            None => {
                let err = DumpError::InvalidInput("page record has no revision text");
                warn!(%id, %title, error = %err, "skipping record");
                return None;
            }
        };
        let text = match self.cleaner {
            Some(cleaner) => cleaner.clean(&text),
            None => text,
        };
        Some(Article::new(id, title, text))
    }
}

/// True when the text before the title's first colon is a banned namespace
fn is_banned_title(title: &str) -> bool {
    match title.split_once(':') {
        Some((prefix, _)) => BANNED_NAMESPACES.contains(&prefix),
        None => false,
    }
}
