mod content;

pub use content::{ContentScraper, RawSupporter};

use scraper::Html;

use crate::config::SelectorConfig;

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn content<'a>(&'a self, selectors: &'a SelectorConfig) -> ContentScraper<'a> {
        ContentScraper::new(&self.document, selectors)
    }
}
