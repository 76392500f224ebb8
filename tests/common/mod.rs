#![allow(dead_code)]

use hemnet_scout::config::types::{CrawlConfig, WaitConfig};

pub const BASE: &str = "https://www.hemnet.se";

pub fn fast_config() -> CrawlConfig {
    CrawlConfig {
        wait: WaitConfig {
            timeout_millis: 20,
            poll_millis: 2,
        },
        ..Default::default()
    }
}

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

const CONSENT: &str = r#"<div class="consent__buttons">
    <div><button>Anpassa</button></div>
    <div><button>Godkänn alla</button></div>
</div>"#;

const NEXT_CLASS: &str = "next_page hcl-button hcl-button--primary hcl-button--full-width";

/// Result list linking to `hits`, optionally to a next page
pub fn sold_list(hits: &[&str], next: Option<&str>) -> String {
    list("sold-results__normal-hit", hits, &next_link(next), true)
}

/// Result list whose next control is a button without `href`; `target` is
/// where clicking it leads, if anywhere
pub fn sold_list_with_button(hits: &[&str], target: Option<&str>) -> String {
    let data = target
        .map(|href| format!(r#" data-href="{href}""#))
        .unwrap_or_default();
    let next = format!(r#"<button class="{NEXT_CLASS}"{data}>Nästa</button>"#);
    list("sold-results__normal-hit", hits, &next, true)
}

pub fn for_sale_list(hits: &[&str], next: Option<&str>) -> String {
    list("normal-results__hit js-normal-list-item", hits, &next_link(next), true)
}

pub fn list_without_consent(hits: &[&str]) -> String {
    list("sold-results__normal-hit", hits, "", false)
}

fn next_link(next: Option<&str>) -> String {
    next.map(|href| format!(r#"<a class="{NEXT_CLASS}" href="{href}">Nästa</a>"#))
        .unwrap_or_default()
}

fn list(class: &str, hits: &[&str], next: &str, consent: bool) -> String {
    let items: String = hits
        .iter()
        .map(|href| format!(r#"<li class="{class}"><a href="{href}">Bostad</a></li>"#))
        .collect();
    let consent = if consent { CONSENT } else { "" };
    format!("<html><body>{consent}<ul>{items}</ul>{next}</body></html>")
}

/// Sold property page; `broker` empty drops the broker card
pub fn sold_page(address: &str, final_price: &str, broker: &str) -> String {
    let broker = if broker.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="broker-card__info"><p>Notar</p><p>{broker}</p></div>"#)
    };
    format!(
        r#"<html><body>
        <div class="sold-property__details">
            <h1>{address}</h1>
            <p class="sold-property__metadata qa-sold-property-metadata">Lägenhet - Vasastan, Stockholm - 2021</p>
        </div>
        <span class="sold-property__price-value">{final_price}</span>
        <dl class="sold-property__price-stats"><dt>Kvm</dt><dd>80 000 kr/m²</dd><dt>Begärt</dt><dd>3 000 000 kr</dd></dl>
        <div class="sold-property__map js-listing-map-sold" data-initial-data='{{"listing":{{"coordinate":[59.33,18.06],"sale_date":"Såld 2021-06-10"}}}}'></div>
        <dl class="sold-property__attributes">
            <dt class="sold-property__attribute">Antal rum</dt><dd class="sold-property__attribute-value">3 rum</dd>
        </dl>
        {broker}
        </body></html>"#
    )
}

pub fn listing_page(address: &str, price: &str) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumbs"><li><a>Hemnet</a></li><li><a>Län</a></li><li><a>Vasastan</a></li></ul>
        <div class="property-address"><h1>{address}</h1><span class="property-address__area">Vasastan</span></div>
        <p class="property-info__price">{price}</p>
        <div class="property-attributes-table__row">
            <dt class="property-attributes-table__label">Boarea</dt>
            <dd class="property-attributes-table__value">61 m²</dd>
        </div>
        <div class="broker-card__info"><a href="/m">Per Lind</a></div>
        <section id="karta">
            <a title="Öppna detta område i Google Maps (i ett nytt fönster)" href="https://maps.google.com/?q=59.34,18.05">Karta</a>
        </section>
        </body></html>"#
    )
}

/// New-construction project with one unit per address
pub fn project_page(addresses: &[&str]) -> String {
    let units: String = addresses
        .iter()
        .map(|address| {
            format!(
                r#"<li class="new-construction-project__property"><a href="/bostad/x">
                    <div><span>{address}</span></div>
                    <div><span class="attributes rooms first">2 rum</span><span class="price">3 100 000 kr</span></div>
                </a></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><ul class="new-construction-project__property-list">{units}</ul></body></html>"#
    )
}
