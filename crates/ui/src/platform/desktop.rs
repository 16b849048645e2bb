use std::io;
use std::process::{Child, Command};

use tracing::{debug, warn};

use super::UiLinkOpener;

/// Opens links with the platform's default handler.
pub struct DesktopLinkOpener;

impl DesktopLinkOpener {
    fn spawn(url: &str) -> io::Result<Child> {
        #[cfg(target_os = "macos")]
        {
            Command::new("open").arg(url).spawn()
        }
        #[cfg(target_os = "windows")]
        {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Command::new("xdg-open").arg(url).spawn()
        }
    }
}

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        match Self::spawn(url) {
            Ok(_) => debug!("opened browser for sign-in"),
            Err(err) => warn!(error = %err, "failed to open browser"),
        }
    }
}
