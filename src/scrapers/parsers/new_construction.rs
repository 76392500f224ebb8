use tracing::{debug, info};

use super::{PageParser, Parsed};
use crate::models::{ListingKind, ListingRecord};
use crate::scrapers::extract::{node_text, wait_for, Condition};
use crate::scrapers::selectors::*;
use crate::scrapers::traits::{Page, PageNode};

impl PageParser {
    /// First unit of a new-construction project.
    pub fn new_construction<P: Page>(&self, page: &P) -> Parsed {
        self.project_units(page, Some(1)).into_iter().next()
    }

    /// Every unit of a new-construction project, in page order.
    pub fn new_construction_units<P: Page>(&self, page: &P) -> Vec<(String, ListingRecord)> {
        self.project_units(page, None)
    }

    fn project_units<P: Page>(
        &self,
        page: &P,
        limit: Option<usize>,
    ) -> Vec<(String, ListingRecord)> {
        if wait_for(page, PROJECT_UNIT_LIST, Condition::Visible, &self.wait).is_none() {
            info!("No new construction properties found for: {}", page.url());
            return Vec::new();
        }

        // The limit counts units on the page, parsed or not
        page.find_all(PROJECT_UNIT)
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|unit| self.unit(unit))
            .collect()
    }

    fn unit<N: PageNode>(&self, unit: &N) -> Option<(String, ListingRecord)> {
        let field = |selector: &str, name: &str| {
            unit.find(selector).and_then(|n| node_text(&n, name))
        };

        let Some(address) = field(UNIT_ADDRESS, "address") else {
            debug!("Skipping project unit without address");
            return None;
        };

        let mut record = ListingRecord::new(ListingKind::NewConstruction)
            .with("Byggår", self.construction_year);
        record.insert_opt("price", field(UNIT_PRICE, "price"));
        record.insert_opt("Antal rum", field(UNIT_ROOMS, "rooms"));
        record.insert_opt("Boarea", field(UNIT_LIVING_AREA, "living area"));
        record.insert_opt("Avgift", field(UNIT_FEE, "fee"));

        Some((address, record))
    }
}
