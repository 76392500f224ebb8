use tracing::{debug, info, warn};
use url::Url;

use crate::config::types::CrawlConfig;
use crate::error::{Result, ScrapeError};
use crate::models::{ListingRecord, RecordStore};
use crate::scrapers::extract::{node_text, wait_for, wait_for_all, wait_until, Condition};
use crate::scrapers::parsers::PageParser;
use crate::scrapers::selectors::{CONSENT_BUTTON, FOR_SALE_HIT, HIT_LINK, NEXT_PAGE, SOLD_HIT};
use crate::scrapers::traits::{BrowserSession, Page, PageNode};
use crate::scrapers::types::CrawlMode;

/// Outcome of a crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub store: RecordStore,
    /// Records newly added to the store
    pub added: usize,
    /// Results opened, whether or not they produced a record
    pub looked_at: usize,
    pub pages: usize,
}

/// Walks a paginated result list and scrapes every result into a store
pub struct Crawler<B: BrowserSession> {
    session: B,
    config: CrawlConfig,
    parser: PageParser,
}

impl<B: BrowserSession> Crawler<B> {
    pub fn new(session: B, config: CrawlConfig) -> Self {
        let parser = PageParser::new(&config);
        Self {
            session,
            config,
            parser,
        }
    }

    /// Crawls the result list at `start_url`, extending `seed`.
    ///
    /// Stops when the list has no next page or `max_new` records were added.
    /// Only a missing consent dialog is an error; anything going wrong with a
    /// single result skips that result.
    pub fn crawl(
        &self,
        mode: CrawlMode,
        start_url: &str,
        seed: RecordStore,
    ) -> Result<CrawlReport> {
        info!("Starting {:?} crawl from {}", mode, start_url);
        let mut list = self.session.open(start_url)?;
        self.accept_consent(&list)?;

        let hit_selector = match mode {
            CrawlMode::ForSale => FOR_SALE_HIT,
            CrawlMode::Sold => SOLD_HIT,
        };

        let mut report = CrawlReport {
            store: seed,
            ..Default::default()
        };

        'pages: while !self.cap_reached(report.added) {
            let targets = self.result_targets(&list, hit_selector);
            if targets.is_empty() {
                info!("No results on {}", list.url());
                break;
            }
            report.pages += 1;

            for target in targets {
                report.looked_at += 1;
                info!("page {}, property #{}", report.pages, report.looked_at);

                let Some(url) = target else {
                    warn!("Result without a link on page {}", report.pages);
                    continue;
                };

                for (key, record) in self.scrape_result(mode, &url) {
                    if self.store(&mut report.store, &key, record) {
                        report.added += 1;
                    }
                }

                if self.cap_reached(report.added) {
                    break 'pages;
                }
            }

            if !self.next_page(&mut list, hit_selector) {
                break;
            }
        }

        if let Err(e) = list.close() {
            debug!("Could not close result list: {}", e);
        }

        info!(
            "Added {} of {} observed properties across {} pages",
            report.added, report.looked_at, report.pages
        );
        Ok(report)
    }

    /// Scrapes a single for-sale page behind the consent dialog.
    pub fn scrape_listing(&self, url: &str) -> Result<RecordStore> {
        let page = self.session.open(url)?;
        self.accept_consent(&page)?;
        let store = self.collect(self.parser.parse(CrawlMode::ForSale, &page));
        if let Err(e) = page.close() {
            debug!("Could not close {}: {}", url, e);
        }
        Ok(store)
    }

    /// Parses an already reachable page, e.g. a saved snapshot.
    pub fn parse_page(&self, mode: CrawlMode, url: &str) -> Result<RecordStore> {
        let page = self.session.open(url)?;
        let store = self.collect(self.parser.parse(mode, &page));
        page.close()?;
        Ok(store)
    }

    fn collect(&self, found: Vec<(String, ListingRecord)>) -> RecordStore {
        let mut store = RecordStore::new();
        for (key, record) in found {
            self.store(&mut store, &key, record);
        }
        store
    }

    fn store(&self, store: &mut RecordStore, key: &str, record: ListingRecord) -> bool {
        match store.merge(key, record, self.config.max_suffix) {
            Ok(outcome) => outcome.is_inserted(),
            Err(e) => {
                warn!("Skipping {}: {}", key, e);
                false
            }
        }
    }

    fn accept_consent(&self, page: &B::Page) -> Result<()> {
        let Some(button) = wait_for(page, CONSENT_BUTTON, Condition::Clickable, &self.config.wait)
        else {
            return Err(ScrapeError::ConsentNotFound { url: page.url() });
        };
        button.click()?;
        debug!("Accepted consent dialog");
        Ok(())
    }

    fn cap_reached(&self, added: usize) -> bool {
        self.config.max_new.is_some_and(|max| added >= max)
    }

    /// Absolute link of every result on the list page, `None` for results
    /// without one.
    fn result_targets(&self, list: &B::Page, hit_selector: &str) -> Vec<Option<String>> {
        let base = list.url();
        wait_for_all(list, hit_selector, &self.config.wait)
            .iter()
            .map(|hit| hit_target(&base, hit))
            .collect()
    }

    /// Opens one result in its own context and parses it.
    fn scrape_result(&self, mode: CrawlMode, url: &str) -> Vec<(String, ListingRecord)> {
        let page = match self.session.open(url) {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not open {}: {}", url, e);
                return Vec::new();
            }
        };

        let found = self.parser.parse(mode, &page);
        if found.is_empty() {
            info!("No property extracted from {}", url);
        }
        if let Err(e) = page.close() {
            debug!("Could not close {}: {}", url, e);
        }
        found
    }

    /// Moves the list to the next result page. `false` when there is none.
    ///
    /// A next control with a link is followed in the list context; one
    /// without is clicked and the list must then change within the wait.
    fn next_page(&self, list: &mut B::Page, hit_selector: &str) -> bool {
        let current = list.url();
        let target = {
            let Some(next) = wait_for(&*list, NEXT_PAGE, Condition::Clickable, &self.config.wait)
            else {
                debug!("No next page after {}", current);
                return false;
            };
            match next.attribute("href") {
                Ok(Some(href)) => match resolve(&current, &href) {
                    Some(target) => Some(target),
                    None => return false,
                },
                _ => {
                    let label = node_text(&next, "next page").unwrap_or_default();
                    debug!("Next page control '{}' has no link, clicking it", label);
                    None
                }
            }
        };

        match target {
            Some(target) => self.follow_link(list, &current, &target),
            None => self.click_next(list, hit_selector, &current),
        }
    }

    fn follow_link(&self, list: &mut B::Page, current: &str, target: &str) -> bool {
        if target == current {
            warn!("Next page points back to {}", current);
            return false;
        }
        match list.navigate(target) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not load next page {}: {}", target, e);
                false
            }
        }
    }

    fn click_next(&self, list: &mut B::Page, hit_selector: &str, current: &str) -> bool {
        let before = hit_targets(&*list, hit_selector);
        let clicked = match list.find(NEXT_PAGE) {
            Some(next) => next.click(),
            None => return false,
        };
        if let Err(e) = clicked.and_then(|()| list.wait_until_navigated()) {
            warn!("Could not click next page on {}: {}", current, e);
            return false;
        }

        let list = &*list;
        let changed = wait_until(&self.config.wait, || {
            list.url() != current || hit_targets(list, hit_selector) != before
        });
        if !changed {
            warn!("Clicking next page left {} unchanged", current);
        }
        changed
    }
}

/// Result links currently on the list page, without waiting
fn hit_targets<P: Page>(list: &P, hit_selector: &str) -> Vec<Option<String>> {
    let base = list.url();
    list.find_all(hit_selector)
        .iter()
        .map(|hit| hit_target(&base, hit))
        .collect()
}

fn hit_target<N: PageNode>(base: &str, hit: &N) -> Option<String> {
    let href = match hit.attribute("href") {
        Ok(Some(href)) => Some(href),
        _ => hit
            .find(HIT_LINK)
            .and_then(|link| link.attribute("href").ok().flatten()),
    };
    href.and_then(|href| resolve(base, &href))
}

fn resolve(base: &str, href: &str) -> Option<String> {
    let joined = match Url::parse(base) {
        Ok(base) => base.join(href),
        Err(_) => Url::parse(href),
    };
    match joined {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Bad link {}: {}", href, e);
            None
        }
    }
}
