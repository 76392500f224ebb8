//! CSS selectors for Hemnet's markup, grouped by page.

// Result lists
pub const CONSENT_BUTTON: &str = "div.consent__buttons > div:nth-of-type(2) > button";
pub const FOR_SALE_HIT: &str = ".normal-results__hit.js-normal-list-item";
pub const SOLD_HIT: &str = ".sold-results__normal-hit";
pub const NEXT_PAGE: &str = ".next_page.hcl-button.hcl-button--primary.hcl-button--full-width";
pub const HIT_LINK: &str = "a[href]";

// Broker card, shared by sold and for-sale pages
pub const BROKER_LINK: &str = "div.broker-card__info > a";
pub const BROKER_BLOCK: &str = "div.broker-card__info";

// Sold property page
pub const SOLD_ATTRIBUTES: &str = ".sold-property__attributes";
pub const SOLD_ADDRESS: &str = ".sold-property__details h1";
pub const SOLD_FINAL_PRICE: &str = "span.sold-property__price-value";
pub const SOLD_ASKING_PRICE: &str = "dl.sold-property__price-stats > dd:nth-of-type(2)";
pub const SOLD_MAP: &str = "div.sold-property__map.js-listing-map-sold";
pub const SOLD_MAP_DATA: &str = "data-initial-data";
pub const SOLD_METADATA: &str = ".sold-property__metadata.qa-sold-property-metadata";
pub const SOLD_ATTRIBUTE_LABEL: &str = ".sold-property__attribute";
pub const SOLD_ATTRIBUTE_VALUE: &str = ".sold-property__attribute-value";

// For-sale listing page
pub const LISTING_MARKER: &str = ".property-attributes-table__value";
pub const LISTING_ADDRESS: &str = "div.property-address > h1";
pub const LISTING_PRICE: &str = ".property-info__price";
pub const MAP_SECTION: &str = "#karta";
pub const MAPS_LINK: &str = "a[title='Öppna detta område i Google Maps (i ett nytt fönster)']";
pub const LISTING_AREA: &str = ".property-address__area";
pub const BREADCRUMB_SUBLOCATION: &str = "ul.breadcrumbs > li:nth-of-type(3) > a";
pub const LISTING_ATTRIBUTE_ROW: &str = ".property-attributes-table__row";
pub const LISTING_ATTRIBUTE_LABEL: &str = ".property-attributes-table__label";
pub const LISTING_ATTRIBUTE_VALUE: &str = ".property-attributes-table__value";

// New-construction project page
pub const PROJECT_UNIT_LIST: &str = ".new-construction-project__property-list";
pub const PROJECT_UNIT: &str = ".new-construction-project__property";
pub const UNIT_ADDRESS: &str = "a > div:nth-of-type(1) > span:nth-of-type(1)";
pub const UNIT_ROOMS: &str = ".attributes.rooms.first";
pub const UNIT_LIVING_AREA: &str = ".living-area";
pub const UNIT_PRICE: &str = ".price";
pub const UNIT_FEE: &str = ".fee";
