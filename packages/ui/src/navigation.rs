use crate::sign_up::Navigator;

/// Navigates by assigning `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate_by_url(&self, url: &str) {
        redirect_to(url);
    }
}

/// Send the browser to `url`.
pub fn redirect_to(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                tracing::error!("Failed to navigate to {}: {:?}", url, e);
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::debug!("Navigation to {} requested outside the browser", url);
    }
}
