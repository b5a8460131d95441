use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keys::{IdentityKey, StorageKeys};
use crate::presentation::ModeratorBadgeStyle;
use crate::theme::DEFAULT_THEME_KEY;
use crate::view::SlotId;

pub const DEFAULT_LOGIN_PATH: &str = "login.html";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("session ui config is not valid JSON: {0}")]
    Parse(String),
    #[error("storage key for `{field}` must not be empty")]
    EmptyStorageKey { field: &'static str },
    #[error("key for `{field}` must not have surrounding whitespace")]
    PaddedKey { field: &'static str },
    #[error("storage key `{key}` is mapped to more than one identity field")]
    DuplicateStorageKey { key: String },
    #[error("theme key `{key}` collides with an identity storage key")]
    ThemeKeyCollision { key: String },
    #[error("theme key must not be empty")]
    EmptyThemeKey,
    #[error("element id for slot `{slot}` must not be empty")]
    EmptySlotId { slot: &'static str },
    #[error("login path must not be empty")]
    EmptyLoginPath,
}

/// Element ids the page exposes for each slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotIds {
    pub desktop_container: String,
    pub desktop_name: String,
    pub desktop_badge: String,
    pub desktop_avatar: String,
    pub desktop_login_link: String,
    pub mobile_container: String,
    pub mobile_name: String,
    pub mobile_badge: String,
    pub mobile_avatar: String,
    pub sidebar_login_link: String,
}

impl Default for SlotIds {
    fn default() -> Self {
        Self {
            desktop_container: "userbar".to_string(),
            desktop_name: "userName".to_string(),
            desktop_badge: "userBadge".to_string(),
            desktop_avatar: "userAvatar".to_string(),
            desktop_login_link: "loginLink".to_string(),
            mobile_container: "mobileUserInfo".to_string(),
            mobile_name: "mobileUserName".to_string(),
            mobile_badge: "mobileUserBadge".to_string(),
            mobile_avatar: "mobileUserAvatar".to_string(),
            sidebar_login_link: "sidebarLoginLink".to_string(),
        }
    }
}

impl SlotIds {
    #[must_use]
    pub fn id(&self, slot: SlotId) -> &str {
        match slot {
            SlotId::DesktopContainer => &self.desktop_container,
            SlotId::DesktopName => &self.desktop_name,
            SlotId::DesktopBadge => &self.desktop_badge,
            SlotId::DesktopAvatar => &self.desktop_avatar,
            SlotId::DesktopLoginLink => &self.desktop_login_link,
            SlotId::MobileContainer => &self.mobile_container,
            SlotId::MobileName => &self.mobile_name,
            SlotId::MobileBadge => &self.mobile_badge,
            SlotId::MobileAvatar => &self.mobile_avatar,
            SlotId::SidebarLoginLink => &self.sidebar_login_link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

/// Page-level configuration. Every field has a default matching the legacy
/// markup, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionUiConfig {
    pub storage_keys: StorageKeys,
    pub theme_key: String,
    pub slot_ids: SlotIds,
    pub moderator_badge: ModeratorBadgeStyle,
    /// Page loaded after logout.
    pub login_path: String,
    pub log_level: LogLevel,
}

impl Default for SessionUiConfig {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::default(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
            slot_ids: SlotIds::default(),
            moderator_badge: ModeratorBadgeStyle::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl SessionUiConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for field in IdentityKey::ALL {
            let raw = self.storage_keys.key(field);
            let key = raw.trim();
            if key.is_empty() {
                return Err(ConfigError::EmptyStorageKey {
                    field: field.as_str(),
                });
            }
            if key != raw {
                return Err(ConfigError::PaddedKey {
                    field: field.as_str(),
                });
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateStorageKey {
                    key: key.to_string(),
                });
            }
        }

        let theme_key = self.theme_key.trim();
        if theme_key.is_empty() {
            return Err(ConfigError::EmptyThemeKey);
        }
        if theme_key != self.theme_key {
            return Err(ConfigError::PaddedKey { field: "theme_key" });
        }
        if seen.contains(theme_key) {
            return Err(ConfigError::ThemeKeyCollision {
                key: theme_key.to_string(),
            });
        }

        for slot in SlotId::ALL {
            if self.slot_ids.id(slot).trim().is_empty() {
                return Err(ConfigError::EmptySlotId {
                    slot: slot.as_str(),
                });
            }
        }

        if self.login_path.trim().is_empty() {
            return Err(ConfigError::EmptyLoginPath);
        }
        Ok(())
    }
}
