use super::*;

pub(super) fn document() -> Result<web_sys::Document, WebShellError> {
    let window = web_sys::window().ok_or(WebShellError::WindowUnavailable)?;
    window.document().ok_or(WebShellError::DocumentUnavailable)
}

pub(super) fn current_pathname() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let Ok(pathname) = window.location().pathname() else {
        return "/".to_string();
    };
    if pathname.trim().is_empty() {
        "/".to_string()
    } else {
        pathname
    }
}

pub(super) fn load_page_config() -> Result<SessionUiConfig, WebShellError> {
    let window = web_sys::window().ok_or(WebShellError::WindowUnavailable)?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .unwrap_or(JsValue::UNDEFINED);
    let source = if value.is_undefined() || value.is_null() {
        PageConfigSource::Missing
    } else if let Some(raw) = value.as_string() {
        PageConfigSource::Json(raw)
    } else if value.is_object() {
        match js_sys::JSON::stringify(&value) {
            Ok(raw) => PageConfigSource::Json(String::from(raw)),
            Err(_) => PageConfigSource::Unsupported,
        }
    } else {
        PageConfigSource::Unsupported
    };
    config_from_page(source, CONFIG_GLOBAL)
}

pub(super) fn run_when_dom_ready(boot: impl FnOnce() + 'static) {
    let document = match document() {
        Ok(document) => document,
        Err(error) => {
            error!(%error, "cannot start session ui");
            return;
        }
    };
    if document.ready_state() != "loading" {
        boot();
        return;
    }

    let mut pending = Some(boot);
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
        if let Some(boot) = pending.take() {
            boot();
        }
    }));
    if document
        .add_event_listener_with_callback(
            DOM_CONTENT_LOADED_EVENT,
            callback.as_ref().unchecked_ref(),
        )
        .is_err()
    {
        error!("failed to wait for DOMContentLoaded");
        return;
    }
    DOM_READY_HANDLER.with(|slot| *slot.borrow_mut() = Some(callback));
}

pub(super) fn install_action_handlers() -> Result<(), WebShellError> {
    let document = document()?;
    let logout_buttons = bind_click_all(&document, LOGOUT_BUTTON_SELECTOR, |_event| logout());
    let theme_toggles = bind_click_all(&document, THEME_TOGGLE_SELECTOR, |_event| {
        let theme = toggle_theme();
        debug!(theme = %theme, "theme toggled");
    });
    debug!(logout_buttons, theme_toggles, "bound page actions");
    Ok(())
}

/// Attaches one shared click handler to every element matching `selector`.
pub(super) fn bind_click_all(
    document: &web_sys::Document,
    selector: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> u32 {
    let Ok(targets) = document.query_selector_all(selector) else {
        warn!(selector, "invalid action selector");
        return 0;
    };
    if targets.length() == 0 {
        return 0;
    }

    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
    let mut bound = 0;
    for index in 0..targets.length() {
        let Some(target) = targets.get(index) else {
            continue;
        };
        if target
            .add_event_listener_with_callback(CLICK_EVENT, callback.as_ref().unchecked_ref())
            .is_ok()
        {
            bound += 1;
        }
    }
    ACTION_CLICK_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
    bound
}
