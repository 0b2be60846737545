use serde::{Deserialize, Serialize};

/// Per-category cookie consent flags.
///
/// `necessary` is always granted; the other categories start out denied
/// until the user makes an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePreferences {
    /// Cookies the application cannot function without.
    pub necessary: bool,
    /// Analytics/measurement cookies.
    pub analytics: bool,
    /// Marketing cookies.
    pub marketing: bool,
}

impl Default for CookiePreferences {
    fn default() -> Self {
        Self {
            necessary: true,
            analytics: false,
            marketing: false,
        }
    }
}

impl CookiePreferences {
    /// All three categories granted.
    pub fn all_accepted() -> Self {
        Self {
            necessary: true,
            analytics: true,
            marketing: true,
        }
    }

    /// Only the necessary category granted.
    pub fn necessary_only() -> Self {
        Self::default()
    }
}
