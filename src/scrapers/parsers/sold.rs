use serde::Deserialize;
use tracing::{debug, info};

use super::{PageParser, Parsed};
use crate::models::{ListingKind, ListingRecord};
use crate::scrapers::extract::{
    locate, locate_text, paired_attributes, resolve_broker, wait_for, Condition,
};
use crate::scrapers::selectors::*;
use crate::scrapers::traits::{Page, PageNode};

/// Map widget state embedded in a sold page
#[derive(Debug, Deserialize)]
struct MapData {
    listing: MapListing,
}

#[derive(Debug, Deserialize)]
struct MapListing {
    #[serde(default)]
    coordinate: Option<Vec<f64>>,
    #[serde(default)]
    sale_date: Option<String>,
}

/// Geocoded position and sale date of a sold property
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaleData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sold_date: Option<String>,
}

/// Reads the map widget's `data-initial-data` JSON.
///
/// `sale_date` reads like `Såld 2021-06-10`; only the final token is kept.
pub fn sale_from_map_data(json: &str) -> Option<SaleData> {
    let data: MapData = match serde_json::from_str(json) {
        Ok(data) => data,
        Err(e) => {
            debug!("Unreadable map data: {}", e);
            return None;
        }
    };
    let coordinate = data.listing.coordinate.unwrap_or_default();
    Some(SaleData {
        latitude: coordinate.first().copied(),
        longitude: coordinate.get(1).copied(),
        sold_date: data
            .listing
            .sale_date
            .as_deref()
            .and_then(|date| date.split_whitespace().next_back())
            .map(str::to_string),
    })
}

impl PageParser {
    /// Sold property page.
    ///
    /// Requires the attribute table, address, final price, asking price and
    /// broker. Position, sale date and area are optional.
    pub fn sold<P: Page>(&self, page: &P) -> Parsed {
        let Some(table) = wait_for(page, SOLD_ATTRIBUTES, Condition::Visible, &self.wait) else {
            info!("No attribute table found for: {}", page.url());
            return None;
        };

        // The heading may carry a label line above the street address
        let address = locate_text(page, SOLD_ADDRESS, "address")?
            .lines()
            .next_back()?
            .trim()
            .to_string();
        let final_price = locate_text(page, SOLD_FINAL_PRICE, "final_price")?;
        let price = locate_text(page, SOLD_ASKING_PRICE, "price")?;

        let Some(broker) = resolve_broker(page) else {
            info!("No mäklare found for: {}", page.url());
            return None;
        };

        let sale = locate(page, SOLD_MAP, "map")
            .and_then(|map| map.attribute(SOLD_MAP_DATA).ok().flatten())
            .and_then(|json| sale_from_map_data(&json))
            .unwrap_or_default();

        let location_name = locate_text(page, SOLD_METADATA, "location_name")
            .and_then(|meta| meta.split(" - ").nth(1).map(|part| part.trim().to_string()));

        let mut record = ListingRecord::new(ListingKind::Sold)
            .with("final_price", final_price)
            .with("price", price)
            .with("mäklare", broker);
        record.insert_opt("latitude", sale.latitude);
        record.insert_opt("longitude", sale.longitude);
        record.insert_opt("location_name", location_name);
        record.insert_opt("sold_date", sale.sold_date);
        record.merge_attributes(paired_attributes(
            &table,
            SOLD_ATTRIBUTE_LABEL,
            SOLD_ATTRIBUTE_VALUE,
        ));

        Some((address, record))
    }
}
