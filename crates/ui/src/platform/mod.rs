use std::sync::Arc;

mod desktop;

pub trait UiLinkOpener: Send + Sync {
    /// Hand `url` to the system browser. Failures are logged, not returned.
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;
