use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::error::Result;
use crate::scrapers::traits::{BrowserSession, Page, PageNode};

const VISIBLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}"#;

const CLICKABLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none'
        && style.pointerEvents !== 'none' && !this.disabled;
}"#;

/// Headless Chrome driving one tab per opened page
pub struct ChromeSession {
    browser: Browser,
}

impl ChromeSession {
    /// Launch Chrome
    pub fn launch(headless: bool) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", headless);

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .idle_browser_timeout(Duration::from_secs(600))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }
}

impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    fn open(&self, url: &str) -> Result<ChromePage> {
        debug!("Opening {} in a new tab", url);
        let tab = self.browser.new_tab().context("Failed to open tab")?;
        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        tab.wait_until_navigated()
            .with_context(|| format!("Navigation to {url} never finished"))?;
        Ok(ChromePage { tab })
    }
}

pub struct ChromePage {
    tab: Arc<Tab>,
}

impl Page for ChromePage {
    type Node<'a> = ChromeNode<'a>;

    fn url(&self) -> String {
        self.tab.get_url()
    }

    fn find(&self, selector: &str) -> Option<ChromeNode<'_>> {
        self.tab.find_element(selector).ok().map(ChromeNode)
    }

    fn find_all(&self, selector: &str) -> Vec<ChromeNode<'_>> {
        self.tab
            .find_elements(selector)
            .map(|elements| elements.into_iter().map(ChromeNode).collect())
            .unwrap_or_default()
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn wait_until_navigated(&mut self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .context("Navigation after click never finished")?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.tab.close(true).context("Failed to close tab")?;
        Ok(())
    }
}

pub struct ChromeNode<'a>(Element<'a>);

impl ChromeNode<'_> {
    fn check(&self, function: &str) -> bool {
        match self.0.call_js_fn(function, vec![], false) {
            Ok(result) => result
                .value
                .and_then(|value| value.as_bool())
                .unwrap_or(false),
            Err(e) => {
                debug!("Element check failed: {}", e);
                false
            }
        }
    }
}

impl PageNode for ChromeNode<'_> {
    fn text(&self) -> Result<String> {
        Ok(self.0.get_inner_text()?)
    }

    fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.get_attribute_value(name)?)
    }

    fn find(&self, selector: &str) -> Option<Self> {
        self.0.find_element(selector).ok().map(ChromeNode)
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        self.0
            .find_elements(selector)
            .map(|elements| elements.into_iter().map(ChromeNode).collect())
            .unwrap_or_default()
    }

    fn is_visible(&self) -> bool {
        self.check(VISIBLE_JS)
    }

    fn is_clickable(&self) -> bool {
        self.check(CLICKABLE_JS)
    }

    fn click(&self) -> Result<()> {
        self.0.scroll_into_view()?;
        self.0.click()?;
        Ok(())
    }

    fn scroll_into_view(&self) -> Result<()> {
        self.0.scroll_into_view()?;
        Ok(())
    }
}
