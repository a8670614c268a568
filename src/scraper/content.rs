use crate::config::SelectorConfig;
use crate::error::{Result, ScraperError};
pub use crate::log_info;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// One supporter entry as it appears in the markup, fields untyped and
/// untrimmed. Normalization happens in the cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSupporter {
    pub name: String,
    pub amount: String,
    pub date: String,
    pub location: String,
    pub message: String,
}

pub struct ContentScraper<'a> {
    document: &'a Html,
    selectors: &'a SelectorConfig,
}

impl<'a> ContentScraper<'a> {
    pub(crate) fn new(document: &'a Html, selectors: &'a SelectorConfig) -> Self {
        Self {
            document,
            selectors,
        }
    }

    pub fn extract_supporters(&self) -> Result<Vec<RawSupporter>> {
        let block = parse_selector(&self.selectors.supporter_block)?;
        let name = parse_selector(&self.selectors.name)?;
        let amount = parse_selector(&self.selectors.amount)?;
        let date = parse_selector(&self.selectors.date)?;
        let location = parse_selector(&self.selectors.location)?;
        let message = parse_selector(&self.selectors.message)?;

        // The first matching block on the page is the totals card, not a
        // supporter entry.
        let supporters: Vec<RawSupporter> = self
            .document
            .select(&block)
            .skip(1)
            .map(|entry| RawSupporter {
                name: select_text(&entry, &name),
                amount: select_text(&entry, &amount),
                date: select_text(&entry, &date),
                location: select_text(&entry, &location),
                message: select_text(&entry, &message),
            })
            .collect();

        log_info!(
            "[scraper] Extracted {} supporter entr(ies) from snapshot",
            supporters.len()
        );
        Ok(supporters)
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw)
        .map_err(|e| ScraperError::SelectorError(format!("'{}': {}", raw, e)).into())
}

fn select_text(block: &ElementRef, selector: &Selector) -> String {
    block
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::Scraper;

    const SNAPSHOT: &str = r#"
        <div class="white-box">
            <div class="total">$1,000,000 raised</div>
        </div>
        <div class="white-box">
            <div class="wrap-anywhere line-clamp-3 font-bold">Alice Carter</div>
            <div class="rounded-sm font-bold text-white">$250</div>
            <div class="text-[10px] font-bold">12 August 2025</div>
            <p class="name">Austin, TX</p>
            <div class="wrap-anywhere text-xs">Keep it up!</div>
        </div>
        <div class="white-box">
            <div class="wrap-anywhere line-clamp-3 font-bold">Bob</div>
            <div class="rounded-sm font-bold text-white">$1,500.50</div>
            <div class="text-[10px] font-bold">1 January 2025</div>
        </div>
    "#;

    #[test]
    fn extracts_supporter_fields() {
        let scraper = Scraper::new(SNAPSHOT);
        let selectors = SelectorConfig::default();
        let supporters = scraper.content(&selectors).extract_supporters().unwrap();

        assert_eq!(supporters.len(), 2);
        assert_eq!(supporters[0].name, "Alice Carter");
        assert_eq!(supporters[0].amount, "$250");
        assert_eq!(supporters[0].date, "12 August 2025");
        assert_eq!(supporters[0].location, "Austin, TX");
        assert_eq!(supporters[0].message, "Keep it up!");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let scraper = Scraper::new(SNAPSHOT);
        let selectors = SelectorConfig::default();
        let supporters = scraper.content(&selectors).extract_supporters().unwrap();

        assert_eq!(supporters[1].name, "Bob");
        assert_eq!(supporters[1].location, "");
        assert_eq!(supporters[1].message, "");
    }

    #[test]
    fn totals_card_is_skipped() {
        let scraper = Scraper::new(SNAPSHOT);
        let selectors = SelectorConfig::default();
        let supporters = scraper.content(&selectors).extract_supporters().unwrap();

        assert!(supporters.iter().all(|s| !s.name.contains("raised")));
    }

    #[test]
    fn snapshot_without_blocks_yields_nothing() {
        let scraper = Scraper::new("<p>No donations found</p>");
        let selectors = SelectorConfig::default();
        let supporters = scraper.content(&selectors).extract_supporters().unwrap();
        assert!(supporters.is_empty());
    }

    #[test]
    fn invalid_selector_is_reported() {
        let scraper = Scraper::new(SNAPSHOT);
        let mut selectors = SelectorConfig::default();
        selectors.supporter_block = ":::".to_string();
        assert!(scraper.content(&selectors).extract_supporters().is_err());
    }
}
