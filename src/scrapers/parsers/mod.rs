//! Page parsers for sold, for-sale and new-construction pages.
//!
//! Each parser turns a navigated page into an address and a record, or
//! nothing when a required field is missing. Missing optional fields become
//! `null` in the record.

mod listing;
mod new_construction;
mod sold;

use crate::config::types::{CrawlConfig, ProjectUnits, WaitConfig};
use crate::models::ListingRecord;
use crate::scrapers::dating::ListingDateEstimator;
use crate::scrapers::traits::Page;
use crate::scrapers::types::CrawlMode;

pub use listing::coordinates_from_maps_href;
pub use sold::{sale_from_map_data, SaleData};

/// Address and record extracted from one page
pub type Parsed = Option<(String, ListingRecord)>;

pub struct PageParser {
    wait: WaitConfig,
    estimator: Box<dyn ListingDateEstimator>,
    construction_year: i32,
    units: ProjectUnits,
}

impl PageParser {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            wait: config.wait,
            estimator: config.date_policy.estimator(),
            construction_year: config.construction_year,
            units: config.new_construction,
        }
    }

    /// Replaces the listing date policy
    pub fn with_estimator(mut self, estimator: Box<dyn ListingDateEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Everything a result page yields for the given crawl mode.
    ///
    /// A for-sale result that turns out to be a new-construction project
    /// yields its first unit, or all of them when configured so.
    pub fn parse<P: Page>(&self, mode: CrawlMode, page: &P) -> Vec<(String, ListingRecord)> {
        match mode {
            CrawlMode::Sold => self.sold(page).into_iter().collect(),
            CrawlMode::ForSale if self.is_active_listing(page) => {
                self.active_listing(page).into_iter().collect()
            }
            CrawlMode::ForSale => match self.units {
                ProjectUnits::First => self.new_construction(page).into_iter().collect(),
                ProjectUnits::All => self.new_construction_units(page),
            },
        }
    }
}
