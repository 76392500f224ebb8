use crate::error::Result;

/// An element located on a page.
///
/// Lookups never fail on absence: a missing element is `None` (or an empty
/// `Vec`), and callers decide whether that sinks the record.
pub trait PageNode: Sized {
    /// Rendered text, lines separated by `\n`
    fn text(&self) -> Result<String>;

    fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// First descendant matching a CSS selector
    fn find(&self, selector: &str) -> Option<Self>;

    fn find_all(&self, selector: &str) -> Vec<Self>;

    fn is_visible(&self) -> bool;

    fn is_clickable(&self) -> bool;

    fn click(&self) -> Result<()>;

    fn scroll_into_view(&self) -> Result<()>;
}

/// One browser context (tab) holding a navigated document.
pub trait Page {
    type Node<'a>: PageNode
    where
        Self: 'a;

    fn url(&self) -> String;

    fn find(&self, selector: &str) -> Option<Self::Node<'_>>;

    fn find_all(&self, selector: &str) -> Vec<Self::Node<'_>>;

    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Settles after a click that may have started a navigation
    fn wait_until_navigated(&mut self) -> Result<()>;

    fn close(self) -> Result<()>;
}

/// Opens pages, each in its own context.
///
/// The crawl keeps the result list in one context and opens every result in
/// a second one, so no window focus has to be tracked.
pub trait BrowserSession {
    type Page: Page;

    fn open(&self, url: &str) -> Result<Self::Page>;
}
