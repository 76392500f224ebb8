use tracing::{debug, info};
use url::Url;

use super::{PageParser, Parsed};
use crate::models::{ListingKind, ListingRecord};
use crate::scrapers::dating::format_date;
use crate::scrapers::extract::{
    locate, locate_text, resolve_broker, row_attributes, wait_for, Condition,
};
use crate::scrapers::selectors::*;
use crate::scrapers::traits::{Page, PageNode};

/// Latitude and longitude from a Google Maps link.
///
/// The position is the value of the link's first query parameter, e.g.
/// `?q=59.3147,18.0716&z=15`.
pub fn coordinates_from_maps_href(href: &str) -> Option<(f64, f64)> {
    let url = Url::parse(href).ok()?;
    let (_, value) = url.query_pairs().next()?;
    let mut parts = value.split(',');
    let latitude = parts.next()?.trim().parse().ok()?;
    let longitude = parts.next()?.trim().parse().ok()?;
    Some((latitude, longitude))
}

impl PageParser {
    /// For-sale page, falling back to the new-construction parser when the
    /// page has no attribute table.
    pub fn listing<P: Page>(&self, page: &P) -> Parsed {
        if !self.is_active_listing(page) {
            return self.new_construction(page);
        }
        self.active_listing(page)
    }

    /// Regular listings show their attribute table; project pages never do.
    pub(super) fn is_active_listing<P: Page>(&self, page: &P) -> bool {
        let found = wait_for(page, LISTING_MARKER, Condition::Visible, &self.wait).is_some();
        if !found {
            debug!("No attribute table on {}, treating it as a project", page.url());
        }
        found
    }

    pub(super) fn active_listing<P: Page>(&self, page: &P) -> Parsed {
        let address = locate_text(page, LISTING_ADDRESS, "address")?;
        let price = locate_text(page, LISTING_PRICE, "price")?;

        let Some(broker) = resolve_broker(page) else {
            info!("No mäklare found for: {}", page.url());
            return None;
        };

        // The maps link is only rendered once the map section scrolls into view
        if let Some(section) = locate(page, MAP_SECTION, "map section") {
            if let Err(e) = section.scroll_into_view() {
                debug!("Could not scroll to map: {}", e);
            }
        }
        let coordinates = wait_for(page, MAPS_LINK, Condition::Clickable, &self.wait)
            .and_then(|link| link.attribute("href").ok().flatten())
            .and_then(|href| coordinates_from_maps_href(&href));
        if coordinates.is_none() {
            debug!("No coordinates found for: {}", page.url());
        }

        let location_name = locate_text(page, LISTING_AREA, "location_name");
        let sublocation = locate_text(page, BREADCRUMB_SUBLOCATION, "hemnet_sublocation");

        let mut record = ListingRecord::new(ListingKind::Listing)
            .with("price", price)
            .with("sold_date", format_date(self.estimator.estimate()))
            .with("mäklare", broker);
        record.insert_opt("latitude", coordinates.map(|(lat, _)| lat));
        record.insert_opt("longitude", coordinates.map(|(_, lng)| lng));
        record.insert_opt("location_name", location_name);
        record.insert_opt("hemnet_sublocation", sublocation);

        let rows = page.find_all(LISTING_ATTRIBUTE_ROW);
        record.merge_attributes(row_attributes(
            &rows,
            LISTING_ATTRIBUTE_LABEL,
            LISTING_ATTRIBUTE_VALUE,
        ));

        Some((address, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{CrawlConfig, WaitConfig};
    use crate::scrapers::dating::FixedDate;
    use crate::scrapers::snapshot::SnapshotPage;
    use crate::scrapers::types::CrawlMode;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn parser() -> PageParser {
        PageParser::new(&CrawlConfig {
            wait: WaitConfig {
                timeout_millis: 20,
                poll_millis: 5,
            },
            ..Default::default()
        })
    }

    fn listing_page(maps_link: &str) -> String {
        format!(
            r#"<html><body>
            <ul class="breadcrumbs">
                <li><a href="/">Hemnet</a></li>
                <li><a href="/stockholm">Stockholms län</a></li>
                <li><a href="/sodermalm">Södermalm</a></li>
            </ul>
            <div class="property-address">
                <h1>Ringvägen 11A</h1>
                <span class="property-address__area">Södermalm, Stockholms kommun</span>
            </div>
            <p class="property-info__price">7 900 000 kr</p>
            <div class="property-attributes-table">
                <div class="property-attributes-table__row">
                    <dt class="property-attributes-table__label">Antal rum</dt>
                    <dd class="property-attributes-table__value">4 rum</dd>
                </div>
                <div class="property-attributes-table__row">
                    <dt class="property-attributes-table__label">Avgift</dt>
                    <dd class="property-attributes-table__value">3 390 kr/mån</dd>
                </div>
            </div>
            <div class="broker-card__info"><p>Erik Olsson Södermalm</p><p>Lena Ek</p></div>
            <section id="karta">{maps_link}</section>
            </body></html>"#
        )
    }

    const MAPS: &str = r#"<a title="Öppna detta område i Google Maps (i ett nytt fönster)" href="https://maps.google.com/maps?q=59.3147,18.0716&amp;hl=sv">Karta</a>"#;

    #[test]
    fn parses_full_listing_page() {
        let page = SnapshotPage::from_html("https://www.hemnet.se/bostad/1", &listing_page(MAPS));
        let (address, record) = parser().listing(&page).unwrap();
        assert_eq!(address, "Ringvägen 11A");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "type": "listing",
                "price": "7 900 000 kr",
                "latitude": 59.3147,
                "longitude": 18.0716,
                "location_name": "Södermalm, Stockholms kommun",
                "hemnet_sublocation": "Södermalm",
                "sold_date": "2021-06-15",
                "mäklare": "Lena Ek",
                "Antal rum": "4 rum",
                "Avgift": "3 390 kr/mån"
            })
        );
    }

    #[test]
    fn hidden_maps_link_leaves_coordinates_null() {
        let hidden = MAPS.replace("<a ", r#"<a style="display:none" "#);
        let page =
            SnapshotPage::from_html("https://www.hemnet.se/bostad/1", &listing_page(&hidden));
        let (_, record) = parser().listing(&page).unwrap();
        assert_eq!(record.get("latitude"), Some(&Value::Null));
        assert_eq!(record.get("longitude"), Some(&Value::Null));
        assert_eq!(record.get_str("price"), Some("7 900 000 kr"));
    }

    #[test]
    fn listing_date_comes_from_estimator() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let parser = parser().with_estimator(Box::new(FixedDate(date)));
        let page = SnapshotPage::from_html("https://www.hemnet.se/bostad/1", &listing_page(MAPS));
        let (_, record) = parser.listing(&page).unwrap();
        assert_eq!(record.get_str("sold_date"), Some("2024-03-01"));
    }

    #[test]
    fn missing_price_discards_record() {
        let html = listing_page(MAPS).replace("property-info__price", "other");
        let page = SnapshotPage::from_html("https://www.hemnet.se/bostad/1", &html);
        assert!(parser().listing(&page).is_none());
    }

    #[test]
    fn missing_address_discards_record() {
        let html = listing_page(MAPS).replace("<h1>Ringvägen 11A</h1>", "");
        let page = SnapshotPage::from_html("https://www.hemnet.se/bostad/1", &html);
        assert!(parser().listing(&page).is_none());
    }

    #[test]
    fn missing_broker_discards_record() {
        let html = listing_page(MAPS).replace("broker-card__info", "contact");
        let page = SnapshotPage::from_html("https://www.hemnet.se/bostad/1", &html);
        assert!(parser().listing(&page).is_none());
        assert!(parser().parse(CrawlMode::ForSale, &page).is_empty());
    }

    #[test]
    fn maps_href_parsing() {
        assert_eq!(
            coordinates_from_maps_href("https://maps.google.com/maps?q=59.3147,18.0716&hl=sv"),
            Some((59.3147, 18.0716))
        );
        assert_eq!(coordinates_from_maps_href("https://maps.google.com/maps?q=abc"), None);
        assert_eq!(coordinates_from_maps_href("https://maps.google.com/maps"), None);
        assert_eq!(coordinates_from_maps_href("not a url"), None);
    }
}
