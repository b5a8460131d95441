use super::*;
use session_ui_core::theme::THEME_ATTRIBUTE;
use session_ui_core::{Navigator, SlotHost, SlotId, SlotIds, SlotPatch, ThemeRoot};

/// Userbar slots looked up by element id on every write.
pub(super) struct DomSlots {
    document: Option<web_sys::Document>,
    ids: SlotIds,
}

impl DomSlots {
    pub(super) fn new(ids: SlotIds) -> Self {
        Self {
            document: document().ok(),
            ids,
        }
    }

    fn element(&self, slot: SlotId) -> Option<web_sys::HtmlElement> {
        self.document
            .as_ref()?
            .get_element_by_id(self.ids.id(slot))?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()
    }
}

impl SlotHost for DomSlots {
    fn apply(&mut self, slot: SlotId, patch: &SlotPatch) -> bool {
        let Some(element) = self.element(slot) else {
            return false;
        };
        match patch {
            SlotPatch::Display(display) => {
                if element
                    .style()
                    .set_property("display", display.as_css())
                    .is_err()
                {
                    warn!(slot = slot.as_str(), "failed to set slot display");
                }
            }
            SlotPatch::Text(text) => element.set_inner_text(text),
            SlotPatch::ClassName(class_name) => element.set_class_name(class_name),
        }
        true
    }
}

pub(super) struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            warn!(path, "window unavailable, cannot navigate");
            return;
        };
        if window.location().set_href(path).is_err() {
            warn!(path, "navigation failed");
        }
    }
}

pub(super) struct DocumentThemeRoot {
    root: Option<web_sys::Element>,
}

impl DocumentThemeRoot {
    pub(super) fn new() -> Self {
        Self {
            root: document()
                .ok()
                .and_then(|document| document.document_element()),
        }
    }
}

impl ThemeRoot for DocumentThemeRoot {
    fn set_theme_attribute(&mut self, value: Option<&str>) {
        let Some(root) = &self.root else {
            return;
        };
        let result = match value {
            Some(value) => root.set_attribute(THEME_ATTRIBUTE, value),
            None => root.remove_attribute(THEME_ATTRIBUTE),
        };
        if result.is_err() {
            warn!("failed to update theme attribute");
        }
    }
}
