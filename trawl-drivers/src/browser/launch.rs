use serde_json::json;
use webdriver::capabilities::Capabilities;

/// How to reach and start the browser behind a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub lang: String,
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            window_size: (1440, 900),
            lang: "pt-BR".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Construct Chrome command-line arguments for the given options.
pub fn build_chrome_arguments(options: &LaunchOptions) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
        format!(
            "--window-size={},{}",
            options.window_size.0, options.window_size.1
        ),
        format!("--lang={}", options.lang),
    ];
    if options.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(options.extra_args.iter().cloned());
    args
}

/// WebDriver capabilities carrying the Chrome arguments.
pub fn build_capabilities(options: &LaunchOptions) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": build_chrome_arguments(options) }),
    );
    caps
}
