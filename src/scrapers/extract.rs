use headless_chrome::util::Wait;
use tracing::debug;

use crate::config::types::WaitConfig;
use crate::scrapers::selectors::{BROKER_BLOCK, BROKER_LINK};
use crate::scrapers::traits::{Page, PageNode};

/// What a bounded wait polls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Present,
    Visible,
    Clickable,
}

impl Condition {
    fn holds<N: PageNode>(self, node: &N) -> bool {
        match self {
            Condition::Present => true,
            Condition::Visible => node.is_visible(),
            Condition::Clickable => node.is_clickable(),
        }
    }
}

/// Finds `selector` on the page; absence is logged under `name`.
pub fn locate<'p, P: Page>(page: &'p P, selector: &str, name: &str) -> Option<P::Node<'p>> {
    let node = page.find(selector);
    if node.is_none() {
        debug!("No {} found for: {}", name, page.url());
    }
    node
}

/// Trimmed text of `selector`, or `None` when it is missing or empty.
pub fn locate_text<P: Page>(page: &P, selector: &str, name: &str) -> Option<String> {
    let node = locate(page, selector, name)?;
    node_text(&node, name)
}

pub fn node_text<N: PageNode>(node: &N, name: &str) -> Option<String> {
    match node.text() {
        Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => {
            debug!("Empty {}", name);
            None
        }
        Err(e) => {
            debug!("Could not read {}: {}", name, e);
            None
        }
    }
}

/// Polls until `selector` meets `condition` or the wait times out.
pub fn wait_for<'p, P: Page>(
    page: &'p P,
    selector: &str,
    condition: Condition,
    wait: &WaitConfig,
) -> Option<P::Node<'p>> {
    Wait::new(wait.timeout(), wait.poll())
        .until(|| page.find(selector).filter(|node| condition.holds(node)))
        .ok()
}

/// Polls `check` until it holds. `false` once the wait times out.
pub fn wait_until(wait: &WaitConfig, mut check: impl FnMut() -> bool) -> bool {
    Wait::new(wait.timeout(), wait.poll())
        .until(|| check().then_some(()))
        .is_ok()
}

/// Polls until at least one element matches `selector`.
pub fn wait_for_all<'p, P: Page>(
    page: &'p P,
    selector: &str,
    wait: &WaitConfig,
) -> Vec<P::Node<'p>> {
    Wait::new(wait.timeout(), wait.poll())
        .until(|| {
            let nodes = page.find_all(selector);
            (!nodes.is_empty()).then_some(nodes)
        })
        .unwrap_or_default()
}

/// Broker name: the broker link's text, else the last line of the broker card.
pub fn resolve_broker<P: Page>(page: &P) -> Option<String> {
    if let Some(name) = page
        .find(BROKER_LINK)
        .and_then(|link| node_text(&link, "mäklare link"))
    {
        return Some(name);
    }

    let card = locate_text(page, BROKER_BLOCK, "mäklare")?;
    card.lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(str::to_string)
}

/// Pairs label and value elements under `container` by position.
pub fn paired_attributes<N: PageNode>(
    container: &N,
    label_selector: &str,
    value_selector: &str,
) -> Vec<(String, String)> {
    let labels = container.find_all(label_selector);
    let values = container.find_all(value_selector);
    labels
        .iter()
        .zip(values.iter())
        .filter_map(|(label, value)| {
            let label = node_text(label, "attribute label")?;
            let value = value.text().map(|v| v.trim().to_string()).unwrap_or_default();
            Some((label, value))
        })
        .collect()
}

/// Label and value taken from inside each row.
pub fn row_attributes<N: PageNode>(
    rows: &[N],
    label_selector: &str,
    value_selector: &str,
) -> Vec<(String, String)> {
    rows.iter()
        .filter_map(|row| {
            let label = node_text(&row.find(label_selector)?, "attribute label")?;
            let value = row
                .find(value_selector)
                .and_then(|value| value.text().ok())
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            Some((label, value))
        })
        .collect()
}
