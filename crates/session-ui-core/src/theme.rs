use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{KeyValueStore, StoreChange};

pub const DEFAULT_THEME_KEY: &str = "theme-preference";
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Stored colour scheme. `System` leaves the choice to the host's
/// `prefers-color-scheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "light" => Self::Light,
            "dark" => Self::Dark,
            _ => Self::System,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Value for the root `data-theme` attribute, `None` to remove it.
    #[must_use]
    pub fn attribute_value(self) -> Option<&'static str> {
        match self {
            Self::Light => Some("light"),
            Self::Dark => Some("dark"),
            Self::System => None,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::System => Self::Light,
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
        }
    }
}

/// Document root carrying the theme attribute.
pub trait ThemeRoot {
    fn set_theme_attribute(&mut self, value: Option<&str>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryThemeRoot {
    pub attribute: Option<String>,
}

impl ThemeRoot for MemoryThemeRoot {
    fn set_theme_attribute(&mut self, value: Option<&str>) {
        self.attribute = value.map(str::to_string);
    }
}

pub fn stored_theme<S>(store: &S, key: &str) -> ThemePreference
where
    S: KeyValueStore + ?Sized,
{
    store
        .get(key)
        .map_or(ThemePreference::System, |raw| ThemePreference::parse(&raw))
}

pub fn apply_theme<R>(preference: ThemePreference, root: &mut R)
where
    R: ThemeRoot + ?Sized,
{
    root.set_theme_attribute(preference.attribute_value());
}

/// Reads the stored preference and applies it.
pub fn apply_stored_theme<S, R>(store: &S, key: &str, root: &mut R) -> ThemePreference
where
    S: KeyValueStore + ?Sized,
    R: ThemeRoot + ?Sized,
{
    let preference = stored_theme(store, key);
    apply_theme(preference, root);
    preference
}

pub fn set_theme<S, R>(store: &S, key: &str, root: &mut R, preference: ThemePreference)
where
    S: KeyValueStore + ?Sized,
    R: ThemeRoot + ?Sized,
{
    match preference {
        ThemePreference::System => store.remove(key),
        ThemePreference::Light | ThemePreference::Dark => store.set(key, preference.as_str()),
    }
    apply_theme(preference, root);
    debug!(theme = preference.as_str(), "theme preference updated");
}

/// Persists and applies the next preference in the cycle.
pub fn toggle_theme<S, R>(store: &S, key: &str, root: &mut R) -> ThemePreference
where
    S: KeyValueStore + ?Sized,
    R: ThemeRoot + ?Sized,
{
    let next = stored_theme(store, key).next();
    set_theme(store, key, root, next);
    next
}

/// Re-applies the stored theme when `change` touches `key` or clears the
/// store. Returns whether it did.
pub fn handle_store_change<S, R>(store: &S, key: &str, change: &StoreChange, root: &mut R) -> bool
where
    S: KeyValueStore + ?Sized,
    R: ThemeRoot + ?Sized,
{
    if !change.touches_key(key) {
        return false;
    }
    let preference = apply_stored_theme(store, key, root);
    debug!(theme = preference.as_str(), "theme changed in another view");
    true
}
