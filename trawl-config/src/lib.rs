//! Loader for trawl configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (every field is optional),
//! 2. YAML files and inline YAML snippets, in the order they were added,
//! 3. `TRAWL__`-prefixed environment variables, `__` separating path
//!    segments (`TRAWL__SCRAPE__MAX_SCROLL_ATTEMPTS=50`).
//!
//! String values may reference `${VAR}` placeholders, expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrawlConfig {
    pub browser: BrowserConfig,
    pub scrape: ScrapeConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// WebDriver session settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub lang: String,
    /// Extra Chrome command-line switches appended verbatim.
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            window_size: (1440, 900),
            lang: "pt-BR".into(),
            args: Vec::new(),
        }
    }
}

/// Timing and budget knobs for the load/expand/extract pipeline.
///
/// All durations are in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub max_scroll_attempts: u32,
    pub no_change_threshold: u32,
    pub settle_ms: u64,
    pub container_timeout_ms: u64,
    pub expand_discovery_timeout_ms: u64,
    pub clickable_timeout_ms: u64,
    pub click_delay_ms: u64,
    pub items_timeout_ms: u64,
    pub page_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_scroll_attempts: 1000,
            no_change_threshold: 4,
            settle_ms: 2000,
            container_timeout_ms: 10_000,
            expand_discovery_timeout_ms: 5000,
            clickable_timeout_ms: 2000,
            click_delay_ms: 300,
            items_timeout_ms: 10_000,
            page_timeout_ms: 10_000,
            poll_interval_ms: 250,
        }
    }
}

/// CSS selectors for the place page. Defaults match the current
/// Google Maps review panel markup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub page_ready: String,
    pub scroll_panel: String,
    pub expand_button: String,
    pub review_block: String,
    pub author: String,
    pub rating: String,
    pub rating_attribute: String,
    pub date: String,
    pub text: String,
    pub extras: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            page_ready: "body".into(),
            scroll_panel: "div.m6QErb.DxyBCb".into(),
            expand_button: "button[aria-label='Ver mais']".into(),
            review_block: "div.jJc9Ad".into(),
            author: "div.d4r55".into(),
            rating: "span.kvMYJc[role='img']".into(),
            rating_attribute: "aria-label".into(),
            date: "span.rsqaWe".into(),
            text: "span.wiI7pd".into(),
            extras: "div.PBK6be".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Target file. When unset a timestamped name is generated.
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    /// `text` or `json`.
    pub format: String,
    /// Filter used when `RUST_LOG` is unset.
    pub filter: String,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: "text".into(),
            filter: "info".into(),
            stderr: true,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct TrawlConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for TrawlConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrawlConfigLoader {
    /// Start with defaults; `TRAWL__` env overrides are applied last.
    ///
    /// ```
    /// use trawl_config::TrawlConfigLoader;
    ///
    /// let config = TrawlConfigLoader::new()
    ///     .with_yaml_str("scrape:\n  max_scroll_attempts: 12")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.scrape.max_scroll_attempts, 12);
    /// assert_eq!(config.scrape.no_change_threshold, 4);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "TRAWL".into(),
        }
    }

    /// Use a different environment prefix. Mostly useful in tests.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped silently when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use trawl_config::{OutputFormat, TrawlConfigLoader};
    ///
    /// let cfg = TrawlConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// output:
    ///   format: tsv
    /// selectors:
    ///   review_block: "div.review"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.output.format, OutputFormat::Tsv);
    /// assert_eq!(cfg.selectors.review_block, "div.review");
    /// assert_eq!(cfg.selectors.author, "div.d4r55");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use trawl_config::TrawlConfigLoader;
    ///
    /// unsafe { std::env::set_var("TRAWL_DOC_DRIVER", "http://grid:4444"); }
    ///
    /// let config = TrawlConfigLoader::new()
    ///     .with_yaml_str("browser:\n  webdriver_url: \"${TRAWL_DOC_DRIVER}\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.browser.webdriver_url, "http://grid:4444");
    ///
    /// unsafe { std::env::remove_var("TRAWL_DOC_DRIVER"); }
    /// ```
    pub fn load(self) -> Result<TrawlConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_values() {
        temp_env::with_vars([("HOST", Some("grid")), ("PORT", Some("4444"))], || {
            let mut v = json!({ "browser": { "webdriver_url": "http://${HOST}:${PORT}", "args": ["--x=$HOST"] } });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({ "browser": { "webdriver_url": "http://grid:4444", "args": ["--x=grid"] } })
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST_TRAWL}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST_TRAWL}"));
    }

    #[test]
    fn empty_sources_yield_defaults() {
        let cfg = TrawlConfigLoader::new()
            .with_env_prefix("TRAWL_UNIT_EMPTY")
            .load()
            .unwrap();
        assert_eq!(cfg.scrape.max_scroll_attempts, 1000);
        assert_eq!(cfg.scrape.settle_ms, 2000);
        assert_eq!(cfg.browser.webdriver_url, "http://localhost:9515");
        assert_eq!(cfg.selectors.scroll_panel, "div.m6QErb.DxyBCb");
        assert_eq!(cfg.output.format, OutputFormat::Csv);
        assert!(cfg.output.path.is_none());
    }
}
