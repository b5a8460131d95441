#[cfg(any(target_arch = "wasm32", test))]
mod page_config;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use session_ui_core::theme::handle_store_change as handle_theme_change;
    use session_ui_core::{
        KeyValueStore, Role, SessionUiConfig, SessionUiState, StoreChange, apply_stored_theme,
        toggle_theme as toggle_stored_theme,
    };
    use tracing::{debug, error, info, warn};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use crate::page_config::{PageConfigSource, WebShellError, config_from_page};
    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod logging;
    mod sidebar;
    mod storage;

    use dom::{BrowserNavigator, DocumentThemeRoot, DomSlots};
    use lifecycle::*;
    use storage::BrowserStorage;

    type WebSessionUi = SessionUiState<BrowserStorage, DomSlots>;

    type EventHandler = Closure<dyn FnMut(web_sys::Event)>;
    type StorageEventHandler = Closure<dyn FnMut(web_sys::StorageEvent)>;

    thread_local! {
        static SESSION_UI: RefCell<Option<WebSessionUi>> = const { RefCell::new(None) };
        static DOM_READY_HANDLER: RefCell<Option<EventHandler>> = const { RefCell::new(None) };
        static STORAGE_EVENT_HANDLERS: RefCell<Vec<StorageEventHandler>> =
            const { RefCell::new(Vec::new()) };
        static ACTION_CLICK_HANDLERS: RefCell<Vec<EventHandler>> =
            const { RefCell::new(Vec::new()) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let (config, config_error) = match load_page_config() {
            Ok(config) => (config, None),
            Err(error) => (SessionUiConfig::default(), Some(error)),
        };
        logging::install(config.log_level);
        if let Some(error) = config_error {
            warn!(%error, "invalid page config, using defaults");
        }
        run_when_dom_ready(move || {
            if let Err(error) = boot(config) {
                error!(%error, "session ui boot failed");
            }
        });
    }

    #[wasm_bindgen]
    pub fn refresh_session_ui() {
        with_session_ui(|ui| {
            ui.refresh();
        });
    }

    #[wasm_bindgen]
    pub fn logout() {
        with_session_ui(|ui| ui.logout(&BrowserNavigator));
    }

    #[wasm_bindgen]
    pub fn login_succeeded(identity: String, display_name: Option<String>, role: Option<String>) {
        with_session_ui(|ui| {
            ui.login_succeeded(
                &identity,
                display_name.as_deref(),
                role.as_deref().map(Role::parse),
            );
        });
    }

    #[wasm_bindgen]
    pub fn toggle_theme() -> String {
        with_session_ui(|ui| {
            toggle_stored_theme(
                ui.store(),
                &ui.config().theme_key,
                &mut DocumentThemeRoot::new(),
            )
        })
        .unwrap_or_default()
        .as_str()
        .to_string()
    }

    #[wasm_bindgen]
    pub fn session_state_json() -> String {
        with_session_ui(|ui| {
            serde_json::to_string(&ui.snapshot()).unwrap_or_else(|_| "{}".to_string())
        })
        .unwrap_or_else(|| "{\"session\":null}".to_string())
    }

    fn boot(config: SessionUiConfig) -> Result<(), WebShellError> {
        let store = match BrowserStorage::open() {
            Ok(store) => store,
            Err(error) => {
                warn!(%error, "rendering without local storage");
                BrowserStorage::detached()
            }
        };

        let theme = apply_stored_theme(&store, &config.theme_key, &mut DocumentThemeRoot::new());
        debug!(theme = theme.as_str(), "applied stored theme");

        let slots = DomSlots::new(config.slot_ids.clone());
        let mut ui = SessionUiState::new(store.clone(), slots, config);
        let report = ui.refresh();
        info!(
            authenticated = ui.session().is_authenticated(),
            applied = report.applied,
            skipped = report.skipped,
            "session ui ready"
        );
        SESSION_UI.with(|slot| *slot.borrow_mut() = Some(ui));

        store.subscribe(Rc::new(on_store_change));
        sidebar::install_sidebar()?;
        install_action_handlers()?;
        Ok(())
    }

    fn on_store_change(change: &StoreChange) {
        with_session_ui(|ui| {
            ui.handle_store_change(change);
            handle_theme_change(
                ui.store(),
                &ui.config().theme_key,
                change,
                &mut DocumentThemeRoot::new(),
            );
        });
    }

    fn with_session_ui<R>(f: impl FnOnce(&mut WebSessionUi) -> R) -> Option<R> {
        SESSION_UI.with(|slot| {
            let Ok(mut slot) = slot.try_borrow_mut() else {
                warn!("session ui is busy");
                return None;
            };
            slot.as_mut().map(f)
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::session_state_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn session_state_json() -> String {
    "{\"session\":null,\"detail\":\"session ui state only available on wasm\"}".to_string()
}
