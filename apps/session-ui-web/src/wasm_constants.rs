pub(crate) const CONFIG_GLOBAL: &str = "__SESSION_UI_CONFIG__";
pub(crate) const DOM_CONTENT_LOADED_EVENT: &str = "DOMContentLoaded";
pub(crate) const STORAGE_EVENT: &str = "storage";
pub(crate) const CLICK_EVENT: &str = "click";
pub(crate) const KEYDOWN_EVENT: &str = "keydown";
pub(crate) const ESCAPE_KEY: &str = "Escape";
pub(crate) const ACTIVE_CLASS: &str = "active";
pub(crate) const SIDEBAR_SELECTOR: &str = ".sidebar";
pub(crate) const SIDEBAR_TOGGLE_ID: &str = "sidebarToggle";
pub(crate) const SIDEBAR_CLOSE_SELECTOR: &str = ".sidebar-close";
pub(crate) const SIDEBAR_MENU_LINK_SELECTOR: &str = ".sidebar-menu a";
pub(crate) const SIDEBAR_DROPDOWN_SELECTOR: &str = ".sidebar-dropdown";
pub(crate) const SIDEBAR_DROPDOWN_TOGGLE_SELECTOR: &str = ".sidebar-dropdown-toggle";
pub(crate) const SIDEBAR_DROPDOWN_MENU_SELECTOR: &str = ".sidebar-dropdown-menu";
pub(crate) const SIDEBAR_DROPDOWN_LINK_SELECTOR: &str = ".sidebar-dropdown-menu a";
pub(crate) const LOGOUT_BUTTON_SELECTOR: &str = ".logout-btn";
pub(crate) const THEME_TOGGLE_SELECTOR: &str = "[data-theme-toggle]";
