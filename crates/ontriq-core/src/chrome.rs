//! Route chrome selection
//!
//! Admin-space routes render bare content: no preloader, no navigation,
//! no footer. Everything else mounts the full site chrome in a fixed
//! order.

/// Reserved admin route prefix
pub const ADMIN_PREFIX: &str = "/admin";

/// The sole public route inside the admin space
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// True for the admin prefix itself and anything nested under it.
///
/// `/administrator` is not admin space.
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX || path.starts_with("/admin/")
}

/// Pieces of site chrome, in mount order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeSlot {
    Preloader,
    Navigation,
    Content,
    Footer,
}

/// Chrome layout for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeLayout {
    /// Admin space: inner content only
    Bare,
    /// Marketing pages: preloader, navigation, content, footer
    Full,
}

impl ChromeLayout {
    /// Select the layout for the current path
    pub fn for_path(path: &str) -> Self {
        if is_admin_path(path) {
            ChromeLayout::Bare
        } else {
            ChromeLayout::Full
        }
    }

    /// Slots to mount, in order
    pub fn slots(&self) -> &'static [ChromeSlot] {
        match self {
            ChromeLayout::Bare => &[ChromeSlot::Content],
            ChromeLayout::Full => &[
                ChromeSlot::Preloader,
                ChromeSlot::Navigation,
                ChromeSlot::Content,
                ChromeSlot::Footer,
            ],
        }
    }
}
