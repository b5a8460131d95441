use std::cell::RefCell;
use std::rc::Rc;

use quickcheck::quickcheck;
use session_ui_core::{
    Display, KeyValueStore, MemorySlots, MemoryStore, ModeratorBadgeStyle, Role, SessionUiConfig,
    SessionUiState, SlotHost, SlotId, StorageKeys, UserSession, badge_class, badge_text, initial,
    logout, render, resolve_session, subscribe_to_changes,
};

const IDENTITY_KEYS: [&str; 6] = [
    "identity",
    "displayNamePrimary",
    "displayNameAlt1",
    "displayNameAlt2",
    "rolePrimary",
    "roleAlt",
];

fn logical_config() -> SessionUiConfig {
    SessionUiConfig {
        storage_keys: StorageKeys::logical(),
        ..SessionUiConfig::default()
    }
}

fn store_from(values: &[Option<String>]) -> MemoryStore {
    let store = MemoryStore::new();
    for (key, value) in IDENTITY_KEYS.iter().zip(values) {
        if let Some(value) = value {
            store.set(key, value);
        }
    }
    store
}

fn slot_subset(mask: u16) -> MemorySlots {
    MemorySlots::with_slots(
        SlotId::ALL
            .into_iter()
            .enumerate()
            .filter(|(index, _)| mask & (1 << index) != 0)
            .map(|(_, slot)| slot),
    )
}

#[test]
fn admin_scenario_renders_desktop_badge() {
    let store = MemoryStore::with_entries([("identity", "a@b.com"), ("rolePrimary", "admin")]);
    let mut ui = SessionUiState::new(store, MemorySlots::full(), logical_config());
    ui.refresh();

    let slots = ui.host();
    assert_eq!(slots.text(SlotId::DesktopBadge), Some("Admin"));
    let class_name = slots.class_name(SlotId::DesktopBadge).unwrap_or_default();
    assert!(class_name.split(' ').any(|token| token == "badge-admin"));
    assert!(class_name.split(' ').any(|token| token == "user-badge"));
    assert_eq!(slots.text(SlotId::DesktopAvatar), Some("A"));
}

#[test]
fn identity_fallback_scenario() {
    let store = MemoryStore::with_entries([("identity", "jdoe@example.com")]);
    let session = resolve_session(&store, &StorageKeys::logical());
    assert_eq!(session.display_name, "jdoe");
    assert_eq!(initial(&session), "J");
}

#[test]
fn legacy_page_keys_resolve_with_default_config() {
    let store = MemoryStore::with_entries([
        ("utente", "rossi@example.it"),
        ("utente_ruolo", "moderator"),
    ]);
    let config = SessionUiConfig::from_json(r#"{"moderator_badge":"alias_admin"}"#)
        .unwrap_or_default();
    let mut ui = SessionUiState::new(store, MemorySlots::full(), config);
    ui.refresh();

    assert_eq!(ui.session().display_name, "rossi");
    assert_eq!(ui.host().text(SlotId::MobileBadge), Some("Mod"));
    assert_eq!(
        ui.host().class_name(SlotId::MobileBadge),
        Some("mobile-user-badge badge-admin")
    );
}

#[test]
fn logout_leaves_unrelated_keys() {
    let store = MemoryStore::with_entries(
        IDENTITY_KEYS
            .iter()
            .map(|key| (*key, "value@example.com"))
            .chain([("theme-preference", "dark"), ("cart", "3")]),
    );

    logout(&store, &StorageKeys::logical());

    let remaining = store.snapshot();
    assert!(
        IDENTITY_KEYS
            .iter()
            .all(|key| !remaining.contains_key(*key))
    );
    assert_eq!(remaining.len(), 2);
    assert_eq!(
        resolve_session(&store, &StorageKeys::logical()),
        UserSession::anonymous()
    );
}

#[test]
fn other_tab_rerenders_on_identity_change() {
    let first_tab = MemoryStore::new();
    let second_tab = first_tab.open_tab();

    let first = Rc::new(RefCell::new(SessionUiState::new(
        first_tab,
        MemorySlots::full(),
        logical_config(),
    )));
    let second = Rc::new(RefCell::new(SessionUiState::new(
        second_tab,
        MemorySlots::full(),
        logical_config(),
    )));
    subscribe_to_changes(&first);
    subscribe_to_changes(&second);
    first.borrow_mut().refresh();
    second.borrow_mut().refresh();

    first
        .borrow_mut()
        .login_succeeded("ana@example.com", Some("Ana"), Some(Role::Premium));

    let second = second.borrow();
    assert_eq!(second.session().display_name, "Ana");
    assert_eq!(
        second.host().display(SlotId::DesktopContainer),
        Some(Display::Flex)
    );
    assert_eq!(second.host().text(SlotId::DesktopBadge), Some("Premium"));
}

#[test]
fn other_tab_ignores_unrelated_keys() {
    let first_tab = MemoryStore::new();
    let second_tab = first_tab.open_tab();
    let second = Rc::new(RefCell::new(SessionUiState::new(
        second_tab,
        MemorySlots::full(),
        logical_config(),
    )));
    subscribe_to_changes(&second);

    first_tab.set("theme-preference", "dark");

    assert_eq!(
        second.borrow().host().display(SlotId::DesktopLoginLink),
        None
    );
}

#[test]
fn other_tab_sees_logout() {
    let first_tab = MemoryStore::with_entries([("identity", "a@b.com")]);
    let second_tab = first_tab.open_tab();
    let second = Rc::new(RefCell::new(SessionUiState::new(
        second_tab,
        MemorySlots::full(),
        logical_config(),
    )));
    subscribe_to_changes(&second);
    second.borrow_mut().refresh();
    assert!(second.borrow().session().is_authenticated());

    logout(&first_tab, &StorageKeys::logical());

    let second = second.borrow();
    assert!(!second.session().is_authenticated());
    assert_eq!(
        second.host().display(SlotId::SidebarLoginLink),
        Some(Display::Block)
    );
}

struct CountingHost {
    inner: MemorySlots,
    writes: usize,
}

impl SlotHost for CountingHost {
    fn apply(&mut self, slot: SlotId, patch: &session_ui_core::SlotPatch) -> bool {
        self.writes += 1;
        self.inner.apply(slot, patch)
    }
}

#[test]
fn custom_hosts_plug_into_the_pipeline() {
    let host = CountingHost {
        inner: MemorySlots::with_slots([SlotId::DesktopLoginLink]),
        writes: 0,
    };
    let mut ui = SessionUiState::new(MemoryStore::new(), host, logical_config());
    let report = ui.refresh();

    assert_eq!(ui.host().writes, report.applied + report.skipped);
    assert_eq!(report.applied, 1);
}

quickcheck! {
    fn anonymous_stores_show_only_login_prompts(values: Vec<Option<String>>, mask: u16) -> bool {
        let mut values = values;
        values.truncate(IDENTITY_KEYS.len());
        if let Some(identity) = values.first_mut() {
            *identity = None;
        }
        let store = store_from(&values);
        let session = resolve_session(&store, &StorageKeys::logical());
        let mut slots = slot_subset(mask);
        render(&session, &mut slots, ModeratorBadgeStyle::Distinct);

        let shows = |slot: SlotId, display: Display| {
            slots.get(slot).is_none() || slots.display(slot) == Some(display)
        };
        session == UserSession::anonymous()
            && SlotId::CONTAINERS.iter().all(|slot| shows(*slot, Display::Hidden))
            && SlotId::LOGIN_PROMPTS.iter().all(|slot| shows(*slot, Display::Block))
    }

    fn unknown_roles_map_to_user(raw: String) -> bool {
        let normalized = raw.trim().to_ascii_lowercase();
        if ["admin", "moderator", "premium"].contains(&normalized.as_str()) {
            return true;
        }
        let role = Role::parse(&raw);
        badge_text(role) == "User"
            && badge_class(role, ModeratorBadgeStyle::Distinct) == "badge-user"
            && badge_class(role, ModeratorBadgeStyle::AliasAdmin) == "badge-user"
    }

    fn render_is_idempotent(values: Vec<Option<String>>, mask: u16, alias: bool) -> bool {
        let store = store_from(&values);
        let session = resolve_session(&store, &StorageKeys::logical());
        let style = if alias {
            ModeratorBadgeStyle::AliasAdmin
        } else {
            ModeratorBadgeStyle::Distinct
        };
        let mut once = slot_subset(mask);
        render(&session, &mut once, style);
        let mut twice = once.clone();
        render(&session, &mut twice, style);
        once == twice
    }

    fn resolve_after_logout_is_anonymous(values: Vec<Option<String>>) -> bool {
        let store = store_from(&values);
        logout(&store, &StorageKeys::logical());
        resolve_session(&store, &StorageKeys::logical()) == UserSession::anonymous()
    }

    fn authenticated_sessions_always_have_a_display_name(
        identity: String,
        names: Vec<Option<String>>
    ) -> bool {
        if identity.trim().is_empty() {
            return true;
        }
        let mut values = vec![Some(identity)];
        values.extend(names.into_iter().take(3));
        let store = store_from(&values);
        let session = resolve_session(&store, &StorageKeys::logical());
        session.is_authenticated()
            && !session.display_name.is_empty()
            && !initial(&session).is_empty()
    }
}
