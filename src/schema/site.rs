use crate::config::{Config, SortBy};
use crate::schema::SchemaError;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Site-specific harvest settings, selected by matching the seed URL
///
/// A schema bundles what works best for one site: which files to keep, how
/// to order them, how deep to crawl and how politely.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "SchemaSpec")]
pub struct SiteSchema {
    name: String,
    url_pattern: String,
    /// `url_pattern` anchored at the start; `None` when the pattern is empty
    compiled: Option<Regex>,
    pub description: Option<String>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub url_include_patterns: Vec<String>,
    pub url_exclude_patterns: Vec<String>,
    pub sort_by: Option<SortBy>,
    pub default_output_name: Option<String>,
    pub recommended_depth: u32,
    pub request_delay_ms: u64,
    pub version: String,
}

impl SiteSchema {
    /// Creates a schema with default settings
    ///
    /// # Errors
    ///
    /// [`SchemaError::EmptyName`] or [`SchemaError::InvalidRegex`].
    pub fn new(name: impl Into<String>, url_pattern: impl Into<String>) -> Result<Self, SchemaError> {
        Self::try_from(SchemaSpec {
            name: name.into(),
            url_pattern: url_pattern.into(),
            ..SchemaSpec::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The URL regex as written
    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    /// True when `url` matches the URL regex at its start
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_trawler::schema::SiteSchema;
    ///
    /// let schema = SiteSchema::new("docs", r"https?://example\.com/docs/.*").unwrap();
    /// assert!(schema.matches("https://example.com/docs/guide"));
    /// assert!(!schema.matches("see https://example.com/docs/guide"));
    /// ```
    pub fn matches(&self, url: &str) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(url))
    }

    /// True when the schema sets any filename or URL pattern
    pub fn has_filters(&self) -> bool {
        !(self.include_patterns.is_empty()
            && self.exclude_patterns.is_empty()
            && self.url_include_patterns.is_empty()
            && self.url_exclude_patterns.is_empty())
    }

    /// Folds the schema into `config`
    ///
    /// Depth and request delay always come from the schema. Pattern lists
    /// replace the configured ones when the schema has any; size limits are
    /// kept. Sort order and output name are replaced only when set.
    pub fn apply_to(&self, config: &mut Config) -> Result<(), crate::ConfigError> {
        config.crawler.recursion_depth = self.recommended_depth;
        config.crawler.request_delay_ms = self.request_delay_ms;

        if self.has_filters() {
            let mut spec = config.filter.to_spec();
            spec.filename_include = self.include_patterns.clone();
            spec.filename_exclude = self.exclude_patterns.clone();
            spec.url_include = self.url_include_patterns.clone();
            spec.url_exclude = self.url_exclude_patterns.clone();
            config.filter = spec.try_into()?;
        }
        if let Some(sort_by) = self.sort_by {
            config.output.sort_by = sort_by;
        }
        if let Some(name) = &self.default_output_name {
            config.output.output_name = name.clone();
        }
        Ok(())
    }
}

impl fmt::Display for SiteSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name,
            self.description.as_deref().unwrap_or("No description")
        )
    }
}

/// Raw schema settings as they appear in a `[[schema]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SchemaSpec {
    pub name: String,
    pub url_pattern: String,
    pub description: Option<String>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub url_include_patterns: Vec<String>,
    pub url_exclude_patterns: Vec<String>,
    pub sort_by: Option<SortBy>,
    pub default_output_name: Option<String>,
    pub recommended_depth: u32,
    pub request_delay_ms: u64,
    pub version: String,
}

impl Default for SchemaSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            url_pattern: String::new(),
            description: None,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            url_include_patterns: Vec::new(),
            url_exclude_patterns: Vec::new(),
            sort_by: None,
            default_output_name: None,
            recommended_depth: 1,
            request_delay_ms: 500,
            version: "1.0.0".to_string(),
        }
    }
}

impl TryFrom<SchemaSpec> for SiteSchema {
    type Error = SchemaError;

    fn try_from(spec: SchemaSpec) -> Result<Self, Self::Error> {
        if spec.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let compiled = if spec.url_pattern.is_empty() {
            None
        } else {
            let anchored = format!("^(?:{})", spec.url_pattern);
            let re = Regex::new(&anchored).map_err(|source| SchemaError::InvalidRegex {
                name: spec.name.clone(),
                source,
            })?;
            Some(re)
        };

        Ok(Self {
            name: spec.name,
            url_pattern: spec.url_pattern,
            compiled,
            description: spec.description,
            include_patterns: spec.include_patterns,
            exclude_patterns: spec.exclude_patterns,
            url_include_patterns: spec.url_include_patterns,
            url_exclude_patterns: spec.url_exclude_patterns,
            sort_by: spec.sort_by,
            default_output_name: spec.default_output_name,
            recommended_depth: spec.recommended_depth,
            request_delay_ms: spec.request_delay_ms,
            version: spec.version,
        })
    }
}
