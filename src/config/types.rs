use crate::filter::FilterConfig;
use crate::schema::SiteSchema;
use crate::url::ScopeKind;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Hard upper bound on recursion depth; larger values are clamped
pub const MAX_RECURSION_DEPTH: u32 = 5;

/// Main configuration structure for pdf-trawler
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    /// Site schemas declared as `[[schema]]` tables, in declaration order
    #[serde(default, rename = "schema")]
    pub schemas: Vec<SiteSchema>,
}

impl Config {
    /// Recursion depth after clamping to [`MAX_RECURSION_DEPTH`]
    pub fn effective_depth(&self) -> u32 {
        self.crawler.recursion_depth.min(MAX_RECURSION_DEPTH)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerConfig {
    /// How many link hops to follow from the seed page
    pub recursion_depth: u32,

    /// Pause between page fetches (milliseconds)
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Honor robots.txt for pages and PDF links
    pub respect_robots: bool,

    /// Drop repeated PDF links
    pub deduplicate: bool,

    /// Maximum number of PDF downloads in flight
    pub concurrency: usize,

    /// Which hosts may be crawled for further pages
    pub scope: ScopeKind,

    /// Hosts used when `scope = "allow-list"`
    pub allowed_domains: Vec<String>,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            recursion_depth: 1,
            request_delay_ms: 500,
            timeout_secs: 30,
            respect_robots: false,
            deduplicate: true,
            concurrency: 1,
            scope: ScopeKind::default(),
            allowed_domains: Vec::new(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Renders the `User-Agent` header value
    ///
    /// Format: `Name/Version` or `Name/Version (+ContactUrl)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Whether harvested PDFs stay separate or are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    #[default]
    Separate,
    Merge,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Separate => write!(f, "separate"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Order in which candidates are downloaded (and merged)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Discovery order
    #[default]
    None,
    /// By the numbers embedded in the filename
    Numeric,
    /// Alphabetical by filename
    Alpha,
    /// Reverse alphabetical by filename
    AlphaDesc,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory that receives the PDFs (created if missing)
    pub write_dir: PathBuf,

    pub mode: OutputMode,

    /// File name of the merged PDF in merge mode
    pub output_name: String,

    pub sort_by: SortBy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_dir: PathBuf::from("output"),
            mode: OutputMode::default(),
            output_name: "merged.pdf".to_string(),
            sort_by: SortBy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.recursion_depth, 1);
        assert_eq!(config.crawler.request_delay(), Duration::from_millis(500));
        assert_eq!(config.crawler.concurrency, 1);
        assert!(config.crawler.deduplicate);
        assert!(!config.crawler.respect_robots);
        assert_eq!(config.crawler.scope, ScopeKind::SeedDomain);
        assert_eq!(config.output.mode, OutputMode::Separate);
        assert_eq!(config.output.output_name, "merged.pdf");
        assert_eq!(config.output.sort_by, SortBy::None);
        assert_eq!(config.filter, FilterConfig::accept_all());
    }

    #[test]
    fn test_effective_depth_is_clamped() {
        let mut config = Config::default();
        config.crawler.recursion_depth = 3;
        assert_eq!(config.effective_depth(), 3);

        config.crawler.recursion_depth = 50;
        assert_eq!(config.effective_depth(), MAX_RECURSION_DEPTH);
    }

    #[test]
    fn test_user_agent_header() {
        let mut ua = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "2.1".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "TestBot/2.1");

        ua.contact_url = Some("https://example.com/bot".to_string());
        assert_eq!(ua.header_value(), "TestBot/2.1 (+https://example.com/bot)");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[crawler]
recursion-depth = 2

[output]
mode = "merge"
sort-by = "alpha-desc"
"#,
        )
        .unwrap();

        assert_eq!(config.crawler.recursion_depth, 2);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.output.mode, OutputMode::Merge);
        assert_eq!(config.output.sort_by, SortBy::AlphaDesc);
        assert_eq!(config.output.write_dir, PathBuf::from("output"));
        assert!(config.schemas.is_empty());
    }

    #[test]
    fn test_schema_tables_keep_order() {
        let config: Config = toml::from_str(
            r#"
[[schema]]
name = "springer_book"
url-pattern = 'https://link\.springer\.com/book/.*'
sort-by = "numeric"

[[schema]]
name = "generic"
url-pattern = ".*"
"#,
        )
        .unwrap();

        let names: Vec<_> = config.schemas.iter().map(SiteSchema::name).collect();
        assert_eq!(names, vec!["springer_book", "generic"]);
        assert_eq!(config.schemas[0].sort_by, Some(SortBy::Numeric));
    }
}
