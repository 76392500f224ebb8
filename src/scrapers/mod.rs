pub mod browser;
pub mod crawl;
pub mod dating;
pub mod extract;
pub mod parsers;
pub mod selectors;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use browser::ChromeSession;
pub use crawl::{CrawlReport, Crawler};
pub use parsers::PageParser;
pub use snapshot::{SnapshotPage, SnapshotSite};
pub use traits::{BrowserSession, Page, PageNode};
pub use types::{CrawlMode, SearchParams};
