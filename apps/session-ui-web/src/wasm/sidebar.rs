use super::*;
use session_ui_core::{
    NavEntry, NavGroup, NavLink, NavMenu, SidebarEvent, SidebarState, current_page,
};

thread_local! {
    static SIDEBAR: RefCell<Option<SidebarBinding>> = const { RefCell::new(None) };
    static SIDEBAR_HANDLERS: RefCell<Vec<EventHandler>> = const { RefCell::new(Vec::new()) };
}

enum EntryBinding {
    Link(web_sys::Element),
    Group(GroupBinding),
}

struct GroupBinding {
    toggle: Option<web_sys::Element>,
    menu: Option<web_sys::Element>,
    links: Vec<web_sys::Element>,
}

/// Mobile sidebar panel plus the menu elements mirrored from [`NavMenu`].
struct SidebarBinding {
    panel: web_sys::Element,
    toggle: Option<web_sys::Element>,
    state: SidebarState,
    menu: NavMenu,
    entries: Vec<EntryBinding>,
}

impl SidebarBinding {
    fn apply(&mut self, event: SidebarEvent) {
        let effect = self.state.handle(event);
        if !effect.changed {
            return;
        }
        set_class(&self.panel, self.state.is_open());
        set_body_scroll_lock(effect.lock_body_scroll);
        debug!(open = self.state.is_open(), "sidebar toggled");
    }

    fn sync_menu(&self) {
        for (entry, binding) in self.menu.entries().iter().zip(&self.entries) {
            match (entry, binding) {
                (NavEntry::Link(link), EntryBinding::Link(element)) => {
                    set_class(element, link.active);
                }
                (NavEntry::Group(group), EntryBinding::Group(bound)) => {
                    for (link, element) in group.links.iter().zip(&bound.links) {
                        set_class(element, link.active);
                    }
                    if let Some(menu) = &bound.menu {
                        set_class(menu, group.expanded);
                    }
                    if let Some(toggle) = &bound.toggle {
                        set_class(toggle, group.expanded);
                    }
                }
                _ => {}
            }
        }
    }

    fn group_toggles(&self) -> Vec<(usize, web_sys::Element)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                EntryBinding::Group(group) => Some(group.toggle.clone()),
                EntryBinding::Link(_) => None,
            })
            .enumerate()
            .filter_map(|(index, toggle)| toggle.map(|toggle| (index, toggle)))
            .collect()
    }
}

pub(super) fn install_sidebar() -> Result<(), WebShellError> {
    let document = document()?;
    let Some(panel) = document.query_selector(SIDEBAR_SELECTOR).ok().flatten() else {
        debug!("page has no sidebar");
        return Ok(());
    };
    let toggle = document.get_element_by_id(SIDEBAR_TOGGLE_ID);

    let (mut menu, entries) = collect_menu(&document);
    let page = current_page(&current_pathname());
    let active = menu.highlight_active(&page);
    debug!(page = %page, active, "highlighted sidebar links");

    let binding = SidebarBinding {
        panel,
        toggle: toggle.clone(),
        state: SidebarState::default(),
        menu,
        entries,
    };
    binding.sync_menu();
    let group_toggles = binding.group_toggles();
    SIDEBAR.with(|slot| *slot.borrow_mut() = Some(binding));

    if let Some(toggle) = &toggle {
        listen(toggle, CLICK_EVENT, |event| {
            event.stop_propagation();
            dispatch(SidebarEvent::OpenRequested);
        });
    }
    if let Some(close) = document
        .query_selector(SIDEBAR_CLOSE_SELECTOR)
        .ok()
        .flatten()
    {
        dispatch_on_click(&close, SidebarEvent::CloseRequested);
    }
    for link in elements(document.query_selector_all(SIDEBAR_MENU_LINK_SELECTOR).ok()) {
        if link
            .matches(SIDEBAR_DROPDOWN_TOGGLE_SELECTOR)
            .unwrap_or(false)
        {
            continue;
        }
        dispatch_on_click(&link, SidebarEvent::LinkSelected);
    }
    for (index, toggle) in group_toggles {
        listen(&toggle, CLICK_EVENT, move |event| {
            event.prevent_default();
            event.stop_propagation();
            with_sidebar(|binding| {
                binding.menu.toggle_group(index);
                binding.sync_menu();
            });
        });
    }
    listen(&document, CLICK_EVENT, on_document_click);
    listen(&document, KEYDOWN_EVENT, |event| {
        let escape = event
            .dyn_ref::<web_sys::KeyboardEvent>()
            .is_some_and(|event| event.key() == ESCAPE_KEY);
        if escape {
            dispatch(SidebarEvent::EscapePressed);
        }
    });
    Ok(())
}

fn collect_menu(document: &web_sys::Document) -> (NavMenu, Vec<EntryBinding>) {
    let mut entries = Vec::new();
    let mut bindings = Vec::new();

    for element in elements(document.query_selector_all(SIDEBAR_MENU_LINK_SELECTOR).ok()) {
        if is_within(&element, SIDEBAR_DROPDOWN_SELECTOR) {
            continue;
        }
        entries.push(NavEntry::Link(NavLink::new(href_of(&element))));
        bindings.push(EntryBinding::Link(element));
    }

    for dropdown in elements(document.query_selector_all(SIDEBAR_DROPDOWN_SELECTOR).ok()) {
        let links = elements(
            dropdown
                .query_selector_all(SIDEBAR_DROPDOWN_LINK_SELECTOR)
                .ok(),
        );
        entries.push(NavEntry::Group(NavGroup::new(
            links.iter().map(|link| NavLink::new(href_of(link))),
        )));
        bindings.push(EntryBinding::Group(GroupBinding {
            toggle: dropdown
                .query_selector(SIDEBAR_DROPDOWN_TOGGLE_SELECTOR)
                .ok()
                .flatten(),
            menu: dropdown
                .query_selector(SIDEBAR_DROPDOWN_MENU_SELECTOR)
                .ok()
                .flatten(),
            links,
        }));
    }

    (NavMenu::new(entries), bindings)
}

fn on_document_click(event: web_sys::Event) {
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Node>().ok());
    with_sidebar(|binding| {
        let inside = |element: &web_sys::Element| {
            target
                .as_ref()
                .is_some_and(|node| element.contains(Some(node)))
        };
        let inside_toggle = binding.toggle.as_ref().is_some_and(|toggle| inside(toggle));
        if binding.state.is_open() && !inside(&binding.panel) && !inside_toggle {
            binding.apply(SidebarEvent::ClickOutside);
        }

        let inside_group = target
            .as_ref()
            .and_then(|node| node.dyn_ref::<web_sys::Element>())
            .is_some_and(|element| is_within(element, SIDEBAR_DROPDOWN_SELECTOR));
        if !inside_group {
            binding.menu.collapse_groups();
            binding.sync_menu();
        }
    });
}

fn dispatch(event: SidebarEvent) {
    with_sidebar(|binding| binding.apply(event));
}

fn dispatch_on_click(target: &web_sys::EventTarget, event: SidebarEvent) {
    listen(target, CLICK_EVENT, move |_event| dispatch(event));
}

fn with_sidebar(f: impl FnOnce(&mut SidebarBinding)) {
    SIDEBAR.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            return;
        };
        if let Some(binding) = slot.as_mut() {
            f(binding);
        }
    });
}

fn listen(
    target: &web_sys::EventTarget,
    event_type: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) {
    let callback = EventHandler::wrap(Box::new(handler));
    if target
        .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
        .is_err()
    {
        warn!(event_type, "failed to bind sidebar handler");
        return;
    }
    SIDEBAR_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
}

fn elements(list: Option<web_sys::NodeList>) -> Vec<web_sys::Element> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}

fn href_of(element: &web_sys::Element) -> String {
    element.get_attribute("href").unwrap_or_default()
}

fn is_within(element: &web_sys::Element, selector: &str) -> bool {
    element.closest(selector).ok().flatten().is_some()
}

fn set_class(element: &web_sys::Element, active: bool) {
    if element
        .class_list()
        .toggle_with_force(ACTIVE_CLASS, active)
        .is_err()
    {
        warn!("failed to update active class");
    }
}

fn set_body_scroll_lock(locked: bool) {
    let Some(body) = document().ok().and_then(|document| document.body()) else {
        return;
    };
    let style = body.style();
    let result = if locked {
        style.set_property("overflow", "hidden")
    } else {
        style.remove_property("overflow").map(|_| ())
    };
    if result.is_err() {
        warn!("failed to update body scroll lock");
    }
}
