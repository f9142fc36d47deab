//! Headless browser layer used when a page needs client-side rendering.
//!
//! - [`headless::session::BrowserLauncher`] / [`headless::session::BrowserSession`]:
//!   the seam the renderer depends on
//! - [`headless::driver::WebDriverLauncher`]: launches Chrome sessions through a
//!   WebDriver endpoint (chromedriver) with `fantoccini`
//! - [`headless::page::RenderPage`]: navigation, network-idle wait, DOM capture
//! - [`headless::options`]: Chrome arguments and capabilities
//! - [`headless::idle`]: the network-idle heuristic
pub mod headless;
