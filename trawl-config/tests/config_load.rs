use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use trawl_config::{OutputFormat, TrawlConfigLoader};

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_values_and_env_overrides_merge() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
browser:
  webdriver_url: "http://${TRAWL_TEST_GRID_HOST}:4444"
  headless: true
  window_size: [1280, 800]
scrape:
  max_scroll_attempts: 200
  settle_ms: 1500
output:
  path: "/tmp/out.csv"
  format: tsv
"#;
    let p = write_yaml(&tmp, "trawl.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("TRAWL_TEST_GRID_HOST", Some("selenium")),
            ("TRAWL__SCRAPE__MAX_SCROLL_ATTEMPTS", Some("25")),
        ],
        || {
            let config = TrawlConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.browser.webdriver_url, "http://selenium:4444");
            assert!(config.browser.headless);
            assert_eq!(config.browser.window_size, (1280, 800));
            // env wins over the file
            assert_eq!(config.scrape.max_scroll_attempts, 25);
            assert_eq!(config.scrape.settle_ms, 1500);
            // untouched fields keep their defaults
            assert_eq!(config.scrape.no_change_threshold, 4);
            assert_eq!(config.output.format, OutputFormat::Tsv);
            assert_eq!(config.output.path, Some(PathBuf::from("/tmp/out.csv")));
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let config = TrawlConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("optional file may be missing");

    assert_eq!(config.scrape.max_scroll_attempts, 1000);
    assert_eq!(config.selectors.expand_button, "button[aria-label='Ver mais']");
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = TrawlConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();

    assert!(result.is_err());
}
