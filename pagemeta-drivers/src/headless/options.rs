use pagemeta_config::RenderConfig;
use serde_json::json;
use webdriver::capabilities::Capabilities;

/// Chrome command-line arguments for a render session.
pub fn build_chrome_arguments(config: &RenderConfig, user_agent: &str) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
        "--disable-background-networking".to_string(),
        "--no-first-run".to_string(),
        "--mute-audio".to_string(),
        format!("--user-agent={user_agent}"),
        format!(
            "--window-size={},{}",
            config.window_size.0, config.window_size.1
        ),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    if !config.sandbox {
        args.push("--no-sandbox".to_string());
    }
    args
}

/// WebDriver capabilities requesting a Chrome session with [`build_chrome_arguments`].
pub fn chrome_capabilities(config: &RenderConfig, user_agent: &str) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": build_chrome_arguments(config, user_agent) }),
    );
    caps
}
