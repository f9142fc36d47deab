#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::anyhow;
use pagemeta_common::observability::{LogConfig, LogFormat};
use pagemeta_drivers::headless::session::{BrowserLauncher, BrowserSession};
use pagemeta_web::browser::PageRenderer;
use url::Url;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "pagemeta-tests",
            emit_stderr: true,
            format: LogFormat::from_name(
                &std::env::var("PAGEMETA_LOG_FORMAT").unwrap_or_default(),
            ),
            default_filter: "debug",
            ..LogConfig::default()
        };

        pagemeta_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Renderer double that records how often it was asked to render.
pub struct CountingRenderer {
    calls: AtomicUsize,
    outcome: Result<String, String>,
}

impl CountingRenderer {
    pub fn returning(html: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(html.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PageRenderer for CountingRenderer {
    async fn render(&self, _url: &Url) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(|m| anyhow!(m))
    }
}

#[derive(Clone)]
pub enum Navigation {
    Loads(String),
    Fails(String),
    Hangs,
}

/// Which browser step never completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stall {
    Nothing,
    Launch,
    Content,
    Close,
}

/// Launcher double tracking live sessions, like a process table would.
pub struct FakeLauncher {
    pub open: Arc<AtomicUsize>,
    pub launched: AtomicUsize,
    pub refuse_launch: bool,
    stall: Stall,
    navigation: Navigation,
}

impl FakeLauncher {
    pub fn new(navigation: Navigation) -> Arc<Self> {
        Self::build(navigation, Stall::Nothing, false)
    }

    pub fn refusing() -> Arc<Self> {
        Self::build(Navigation::Hangs, Stall::Nothing, true)
    }

    pub fn stalling(navigation: Navigation, stall: Stall) -> Arc<Self> {
        Self::build(navigation, stall, false)
    }

    fn build(navigation: Navigation, stall: Stall, refuse_launch: bool) -> Arc<Self> {
        Arc::new(Self {
            open: Arc::new(AtomicUsize::new(0)),
            launched: AtomicUsize::new(0),
            refuse_launch,
            stall,
            navigation,
        })
    }

    pub fn open_sessions(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> anyhow::Result<Box<dyn BrowserSession>> {
        if self.refuse_launch {
            return Err(anyhow!("failed to open WebDriver session: connection refused"));
        }
        if self.stall == Stall::Launch {
            stall_forever().await;
        }
        self.launched.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            open: Arc::clone(&self.open),
            navigation: self.navigation.clone(),
            stall: self.stall,
            loaded: None,
            closed: false,
        }))
    }
}

async fn stall_forever() {
    tokio::time::sleep(Duration::from_secs(3600)).await;
}

struct FakeSession {
    open: Arc<AtomicUsize>,
    navigation: Navigation,
    stall: Stall,
    loaded: Option<String>,
    closed: bool,
}

#[async_trait::async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
        match &self.navigation {
            Navigation::Loads(html) => {
                self.loaded = Some(html.clone());
                Ok(())
            }
            Navigation::Fails(message) => Err(anyhow!("navigation to {url} failed: {message}")),
            Navigation::Hangs => {
                stall_forever().await;
                Ok(())
            }
        }
    }

    async fn content(&self) -> anyhow::Result<String> {
        if self.stall == Stall::Content {
            stall_forever().await;
        }
        self.loaded
            .clone()
            .ok_or_else(|| anyhow!("no page loaded in browser session"))
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if self.stall == Stall::Close {
            stall_forever().await;
        }
        if !self.closed {
            self.closed = true;
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
