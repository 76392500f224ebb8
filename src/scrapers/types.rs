use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

const FOR_SALE_URL: &str = "https://www.hemnet.se/bostader";
const SOLD_URL: &str = "https://www.hemnet.se/salda/bostader";

/// Which result list a crawl walks through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlMode {
    /// Properties currently for sale
    ForSale,
    /// Completed sales
    Sold,
}

/// Search parameters for the result list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchParams {
    /// Hemnet location identifier
    #[serde(default = "default_location_id")]
    pub location_id: u64,
    /// Radius in meters around the location
    #[serde(default = "default_expand_locations")]
    pub expand_locations: u32,
    /// Recency window for sold listings, e.g. `3m`
    #[serde(default = "default_sold_age")]
    pub sold_age: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            location_id: default_location_id(),
            expand_locations: default_expand_locations(),
            sold_age: default_sold_age(),
        }
    }
}

impl SearchParams {
    /// First page of the result list for `mode`
    pub fn result_url(&self, mode: CrawlMode) -> Result<Url> {
        let base = match mode {
            CrawlMode::ForSale => FOR_SALE_URL,
            CrawlMode::Sold => SOLD_URL,
        };
        let mut url = Url::parse(base)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("location_ids[]", &self.location_id.to_string())
                .append_pair("expand_locations", &self.expand_locations.to_string());
            if mode == CrawlMode::Sold {
                query
                    .append_pair("page", "1")
                    .append_pair("sold_age", &self.sold_age);
            }
        }
        Ok(url)
    }
}

fn default_location_id() -> u64 {
    473_448
}

fn default_expand_locations() -> u32 {
    2000
}

fn default_sold_age() -> String {
    "3m".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_sale_url_has_location_only() {
        let url = SearchParams::default()
            .result_url(CrawlMode::ForSale)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.hemnet.se/bostader?location_ids%5B%5D=473448&expand_locations=2000"
        );
    }

    #[test]
    fn sold_url_carries_recency_window() {
        let params = SearchParams {
            sold_age: "12m".into(),
            ..Default::default()
        };
        let url = params.result_url(CrawlMode::Sold).unwrap();
        assert!(url.as_str().starts_with("https://www.hemnet.se/salda/bostader?"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("page".into(), "1".into())));
        assert!(pairs.contains(&("sold_age".into(), "12m".into())));
        assert!(pairs.contains(&("location_ids[]".into(), "473448".into())));
    }
}
