//! Session/UI state synchronization for the browser shell.
//!
//! Identity strings already present in the origin's key-value store are
//! resolved into one [`UserSession`], mapped to display fields and pushed into
//! whichever userbar slots the page exposes. Hosts plug in through
//! [`KeyValueStore`], [`SlotHost`], [`Navigator`] and [`ThemeRoot`].

pub mod config;
pub mod keys;
pub mod pipeline;
pub mod presentation;
pub mod session;
pub mod sidebar;
pub mod store;
pub mod theme;
pub mod view;

pub use config::{ConfigError, LogLevel, SessionUiConfig, SlotIds};
pub use keys::{IdentityKey, StorageKeys};
pub use pipeline::{Navigator, SessionSnapshot, SessionUiState, subscribe_to_changes};
pub use presentation::{ModeratorBadgeStyle, Presentation, badge_class, badge_text, initial};
pub use session::{Role, UserSession, logout, record_login, resolve_session};
pub use sidebar::{
    NavEntry, NavGroup, NavLink, NavMenu, SidebarEffect, SidebarEvent, SidebarState, current_page,
};
pub use store::{ChangeListener, KeyValueStore, MemoryStore, StoreChange};
pub use theme::{ThemePreference, ThemeRoot, apply_stored_theme, toggle_theme};
pub use view::{
    Display, MemorySlots, PlannedPatch, RenderReport, SlotHost, SlotId, SlotPatch, ViewPlan,
    render,
};
