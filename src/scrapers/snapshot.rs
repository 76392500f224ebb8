//! Static HTML pages behind the browser traits.
//!
//! Used to re-parse pages saved from a browser session and to drive the
//! parsers and the crawl without launching Chrome. Every element counts as
//! visible unless it is `hidden` or styled `display: none`. Clicking follows
//! the `href` or `data-href` of the element or its closest ancestor carrying
//! one, once the page is told to settle; any other click does nothing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::{BrowserSession, Page, PageNode};

/// A fixed set of pages keyed by URL
#[derive(Debug, Clone, Default)]
pub struct SnapshotSite {
    pages: Arc<HashMap<String, String>>,
}

impl SnapshotSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(normalize(url), html.into());
        self
    }

    /// Adds a saved HTML file under its `file://` URL and returns that URL.
    pub fn add_file(&mut self, path: &Path) -> Result<String> {
        let html = std::fs::read_to_string(path)?;
        let absolute = std::fs::canonicalize(path)?;
        let url = Url::from_file_path(&absolute)
            .map_err(|()| ScrapeError::Config(format!("not a file path: {}", path.display())))?
            .to_string();
        Arc::make_mut(&mut self.pages).insert(normalize(&url), html);
        Ok(url)
    }

    fn load(&self, url: &str) -> Result<SnapshotPage> {
        let key = normalize(url);
        let html = self
            .pages
            .get(&key)
            .ok_or_else(|| ScrapeError::PageNotFound { url: key.clone() })?;
        Ok(SnapshotPage {
            url: key,
            document: Html::parse_document(html),
            site: self.clone(),
            clicked: RefCell::new(None),
        })
    }
}

impl BrowserSession for SnapshotSite {
    type Page = SnapshotPage;

    fn open(&self, url: &str) -> Result<SnapshotPage> {
        self.load(url)
    }
}

pub struct SnapshotPage {
    url: String,
    document: Html,
    site: SnapshotSite,
    /// Link of the last clicked element, followed on settle
    clicked: RefCell<Option<String>>,
}

impl SnapshotPage {
    /// A standalone page that cannot navigate anywhere else
    pub fn from_html(url: &str, html: &str) -> Self {
        Self {
            url: normalize(url),
            document: Html::parse_document(html),
            site: SnapshotSite::new(),
            clicked: RefCell::new(None),
        }
    }

    fn node<'a>(&'a self, element: ElementRef<'a>) -> SnapshotNode<'a> {
        SnapshotNode {
            element,
            clicked: &self.clicked,
        }
    }
}

impl Page for SnapshotPage {
    type Node<'a> = SnapshotNode<'a>;

    fn url(&self) -> String {
        self.url.clone()
    }

    fn find(&self, selector: &str) -> Option<SnapshotNode<'_>> {
        let selector = parse_selector(selector)?;
        self.document.select(&selector).next().map(|el| self.node(el))
    }

    fn find_all(&self, selector: &str) -> Vec<SnapshotNode<'_>> {
        match parse_selector(selector) {
            Some(selector) => self
                .document
                .select(&selector)
                .map(|el| self.node(el))
                .collect(),
            None => Vec::new(),
        }
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        *self = self.site.load(url)?;
        Ok(())
    }

    fn wait_until_navigated(&mut self) -> Result<()> {
        let Some(href) = self.clicked.get_mut().take() else {
            return Ok(());
        };
        let target = Url::parse(&self.url)?.join(&href)?;
        self.navigate(target.as_str())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SnapshotNode<'a> {
    element: ElementRef<'a>,
    clicked: &'a RefCell<Option<String>>,
}

impl<'a> SnapshotNode<'a> {
    fn wrap(&self, element: ElementRef<'a>) -> Self {
        Self {
            element,
            clicked: self.clicked,
        }
    }

    fn link(&self) -> Option<String> {
        std::iter::once(self.element)
            .chain(self.element.ancestors().filter_map(ElementRef::wrap))
            .find_map(|el| {
                let element = el.value();
                element.attr("href").or_else(|| element.attr("data-href"))
            })
            .map(str::to_string)
    }
}

impl<'a> PageNode for SnapshotNode<'a> {
    fn text(&self) -> Result<String> {
        let lines: Vec<String> = self
            .element
            .text()
            .map(|chunk| chunk.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect();
        Ok(lines.join("\n"))
    }

    fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.value().attr(name).map(str::to_string))
    }

    fn find(&self, selector: &str) -> Option<Self> {
        let selector = parse_selector(selector)?;
        self.element.select(&selector).next().map(|el| self.wrap(el))
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        match parse_selector(selector) {
            Some(selector) => self.element.select(&selector).map(|el| self.wrap(el)).collect(),
            None => Vec::new(),
        }
    }

    fn is_visible(&self) -> bool {
        // An element is hidden when it or any ancestor is
        std::iter::once(self.element)
            .chain(self.element.ancestors().filter_map(ElementRef::wrap))
            .all(|el| {
                let element = el.value();
                let display_none = element.attr("style").is_some_and(|style| {
                    style
                        .replace(' ', "")
                        .to_ascii_lowercase()
                        .contains("display:none")
                });
                element.attr("hidden").is_none() && !display_none
            })
    }

    fn is_clickable(&self) -> bool {
        self.is_visible() && self.element.value().attr("disabled").is_none()
    }

    fn click(&self) -> Result<()> {
        if let Some(link) = self.link() {
            *self.clicked.borrow_mut() = Some(link);
        }
        Ok(())
    }

    fn scroll_into_view(&self) -> Result<()> {
        Ok(())
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector {}: {:?}", css, e);
            None
        }
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |u| u.to_string())
}
