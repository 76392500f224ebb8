use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scrapers::dating::{DaysAhead, FixedDate, ListingDateEstimator};
use crate::scrapers::types::SearchParams;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    /// Stop once this many new records have been added
    #[serde(default)]
    pub max_new: Option<usize>,
    /// Highest numeric suffix tried when disambiguating an address key
    #[serde(default = "default_max_suffix")]
    pub max_suffix: u32,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default)]
    pub new_construction: ProjectUnits,
    #[serde(default = "default_construction_year")]
    pub construction_year: i32,
    /// Overrides the result-list URL built from the search parameters
    #[serde(default)]
    pub start_url: Option<String>,
    #[serde(default)]
    pub wait: WaitConfig,
    /// `fixed: <date>` or `days_ahead: <days>`
    #[serde(default, with = "serde_yml::with::singleton_map")]
    pub date_policy: DatePolicy,
}

/// Which units of a new-construction project become records.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectUnits {
    #[default]
    First,
    All,
}

/// Bounded polling used for every wait against the page.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct WaitConfig {
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,
    #[serde(default = "default_poll_millis")]
    pub poll_millis: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    Fixed(NaiveDate),
    DaysAhead(i64),
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_millis.max(1))
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_millis: default_timeout_millis(),
            poll_millis: default_poll_millis(),
        }
    }
}

impl DatePolicy {
    pub fn estimator(&self) -> Box<dyn ListingDateEstimator> {
        match *self {
            DatePolicy::Fixed(date) => Box::new(FixedDate(date)),
            DatePolicy::DaysAhead(days) => Box::new(DaysAhead { days }),
        }
    }
}

impl Default for DatePolicy {
    fn default() -> Self {
        DatePolicy::Fixed(FixedDate::default().0)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_new: None,
            max_suffix: default_max_suffix(),
            headless: true,
            new_construction: ProjectUnits::First,
            construction_year: default_construction_year(),
            start_url: None,
            wait: WaitConfig::default(),
            date_policy: DatePolicy::default(),
        }
    }
}

fn default_max_suffix() -> u32 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_construction_year() -> i32 {
    2022
}

fn default_timeout_millis() -> u64 {
    20_000
}

fn default_poll_millis() -> u64 {
    250
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wait_is_twenty_seconds() {
        let wait = WaitConfig::default();
        assert_eq!(wait.timeout(), Duration::from_secs(20));
        assert_eq!(wait.poll(), Duration::from_millis(250));
    }

    #[test]
    fn zero_poll_is_clamped() {
        let wait = WaitConfig {
            timeout_millis: 10,
            poll_millis: 0,
        };
        assert_eq!(wait.poll(), Duration::from_millis(1));
    }

    #[test]
    fn date_policy_yaml_forms() {
        let fixed: CrawlConfig =
            serde_yml::from_str("date_policy:\n  fixed: 2021-06-15\n").unwrap();
        assert_eq!(
            fixed.date_policy,
            DatePolicy::Fixed(NaiveDate::from_ymd_opt(2021, 6, 15).unwrap())
        );
        let ahead: CrawlConfig =
            serde_yml::from_str("date_policy:\n  days_ahead: 8\n").unwrap();
        assert_eq!(ahead.date_policy, DatePolicy::DaysAhead(8));
    }

    #[test]
    fn date_policy_defaults_when_absent() {
        let config: CrawlConfig = serde_yml::from_str("max_new: 3\n").unwrap();
        assert_eq!(config.date_policy, DatePolicy::default());
    }

    #[test]
    fn crawl_section_defaults_fill_gaps() {
        let config: Config =
            serde_yml::from_str("crawl:\n  max_new: 5\n  wait:\n    timeout_millis: 50\n")
                .unwrap();
        assert_eq!(config.crawl.max_new, Some(5));
        assert_eq!(config.crawl.wait.timeout_millis, 50);
        assert_eq!(config.crawl.wait.poll_millis, 250);
        assert_eq!(config.crawl.max_suffix, 1000);
        assert_eq!(config.crawl.new_construction, ProjectUnits::First);
    }
}
