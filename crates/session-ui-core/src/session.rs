use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::keys::{IdentityKey, StorageKeys};
use crate::store::KeyValueStore;

/// Display name used when neither the store nor the identity provides one.
pub const FALLBACK_DISPLAY_NAME: &str = "Utente";

/// Placeholders older pages persisted instead of leaving the key empty.
const SENTINEL_DISPLAY_NAMES: [&str; 3] = [FALLBACK_DISPLAY_NAME, "null", "undefined"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
    Premium,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Moderator, Self::Premium, Self::User];

    /// Unrecognized values normalize to [`Role::User`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "moderator" => Self::Moderator,
            "premium" => Self::Premium,
            _ => Self::User,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Premium => "premium",
            Self::User => "user",
        }
    }
}

/// Normalized view of whoever is logged in. Derived on every pipeline run and
/// never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSession {
    pub identity: Option<String>,
    pub display_name: String,
    pub role: Role,
}

impl Default for UserSession {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl UserSession {
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            display_name: String::new(),
            role: Role::User,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Reads the redundant identity keys and collapses them into one session.
///
/// Never fails: missing or malformed values fall back to defaults.
pub fn resolve_session<S>(store: &S, keys: &StorageKeys) -> UserSession
where
    S: KeyValueStore + ?Sized,
{
    let Some(identity) = read_non_empty(store, keys.key(IdentityKey::Identity)) else {
        debug!("no identity in store, resolved anonymous session");
        return UserSession::anonymous();
    };

    let stored_name = IdentityKey::DISPLAY_NAME_PRIORITY.iter().find_map(|key| {
        read_non_empty(store, keys.key(*key))
            .filter(|value| !is_sentinel_display_name(value))
            .map(|value| (*key, value))
    });
    let display_name = match stored_name {
        Some((source, value)) => {
            debug!(source = source.as_str(), "display name resolved from store");
            value
        }
        None => fallback_display_name(&identity),
    };

    let role = IdentityKey::ROLE_PRIORITY
        .iter()
        .find_map(|key| read_non_empty(store, keys.key(*key)))
        .map_or(Role::User, |raw| Role::parse(&raw));

    debug!(role = role.as_str(), "resolved authenticated session");
    UserSession {
        identity: Some(identity),
        display_name,
        role,
    }
}

/// Removes every identity key. Absent keys are fine.
pub fn logout<S>(store: &S, keys: &StorageKeys)
where
    S: KeyValueStore + ?Sized,
{
    for key in keys.all() {
        store.remove(key);
    }
}

/// Persists the outcome of a successful login and clears the alias keys so a
/// stale value from an earlier login cannot win resolution.
///
/// Returns `false` without writing anything when `identity` is blank.
pub fn record_login<S>(
    store: &S,
    keys: &StorageKeys,
    identity: &str,
    display_name: Option<&str>,
    role: Option<Role>,
) -> bool
where
    S: KeyValueStore + ?Sized,
{
    let identity = identity.trim();
    if identity.is_empty() {
        return false;
    }

    for alias in [
        IdentityKey::DisplayNameAlt1,
        IdentityKey::DisplayNameAlt2,
        IdentityKey::RoleAlt,
    ] {
        store.remove(keys.key(alias));
    }
    match display_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => store.set(keys.key(IdentityKey::DisplayNamePrimary), name),
        None => store.remove(keys.key(IdentityKey::DisplayNamePrimary)),
    }
    match role {
        Some(role) => store.set(keys.key(IdentityKey::RolePrimary), role.as_str()),
        None => store.remove(keys.key(IdentityKey::RolePrimary)),
    }
    // Identity goes last so other views never resolve a half-written login.
    store.set(keys.key(IdentityKey::Identity), identity);
    true
}

fn read_non_empty<S>(store: &S, key: &str) -> Option<String>
where
    S: KeyValueStore + ?Sized,
{
    store
        .get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_sentinel_display_name(value: &str) -> bool {
    SENTINEL_DISPLAY_NAMES
        .iter()
        .any(|sentinel| sentinel.eq_ignore_ascii_case(value))
}

fn fallback_display_name(identity: &str) -> String {
    match identity.split_once('@') {
        Some((local, _)) if !local.trim().is_empty() => local.trim().to_string(),
        _ => FALLBACK_DISPLAY_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn keys() -> StorageKeys {
        StorageKeys::logical()
    }

    #[test]
    fn missing_identity_is_anonymous() {
        let store =
            MemoryStore::with_entries([("displayNamePrimary", "Ana"), ("rolePrimary", "admin")]);
        assert_eq!(resolve_session(&store, &keys()), UserSession::anonymous());
    }

    #[test]
    fn blank_identity_is_anonymous() {
        let store = MemoryStore::with_entries([("identity", "   ")]);
        assert!(!resolve_session(&store, &keys()).is_authenticated());
    }

    #[test]
    fn display_name_follows_priority_order() {
        let store = MemoryStore::with_entries([
            ("identity", "ana@example.com"),
            ("displayNamePrimary", "Ana"),
            ("displayNameAlt1", "Bee"),
        ]);
        assert_eq!(resolve_session(&store, &keys()).display_name, "Ana");

        store.remove("displayNamePrimary");
        assert_eq!(resolve_session(&store, &keys()).display_name, "Bee");
    }

    #[test]
    fn sentinel_display_names_are_skipped() {
        let store = MemoryStore::with_entries([
            ("identity", "ana@example.com"),
            ("displayNamePrimary", "Utente"),
            ("displayNameAlt1", "undefined"),
            ("displayNameAlt2", "Cleo"),
        ]);
        assert_eq!(resolve_session(&store, &keys()).display_name, "Cleo");
    }

    #[test]
    fn display_name_falls_back_to_local_part() {
        let store = MemoryStore::with_entries([("identity", "jdoe@example.com")]);
        let session = resolve_session(&store, &keys());
        assert_eq!(session.display_name, "jdoe");
        assert_eq!(session.identity.as_deref(), Some("jdoe@example.com"));
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        for identity in ["operator", "@example.com"] {
            let store = MemoryStore::with_entries([("identity", identity)]);
            assert_eq!(
                resolve_session(&store, &keys()).display_name,
                FALLBACK_DISPLAY_NAME
            );
        }
    }

    #[test]
    fn role_prefers_primary_and_defaults_to_user() {
        let store = MemoryStore::with_entries([
            ("identity", "a@b.com"),
            ("rolePrimary", " Premium "),
            ("roleAlt", "admin"),
        ]);
        assert_eq!(resolve_session(&store, &keys()).role, Role::Premium);

        store.remove("rolePrimary");
        assert_eq!(resolve_session(&store, &keys()).role, Role::Admin);

        store.set("roleAlt", "superuser");
        assert_eq!(resolve_session(&store, &keys()).role, Role::User);
    }

    #[test]
    fn unrecognized_primary_role_still_wins_over_alias() {
        let store = MemoryStore::with_entries([
            ("identity", "a@b.com"),
            ("rolePrimary", "owner"),
            ("roleAlt", "admin"),
        ]);
        assert_eq!(resolve_session(&store, &keys()).role, Role::User);
    }

    #[test]
    fn logout_removes_only_identity_keys() {
        let store = MemoryStore::with_entries([
            ("identity", "a@b.com"),
            ("displayNamePrimary", "Ana"),
            ("displayNameAlt1", "Bee"),
            ("displayNameAlt2", "Cleo"),
            ("rolePrimary", "admin"),
            ("roleAlt", "moderator"),
            ("theme-preference", "dark"),
        ]);

        logout(&store, &keys());

        let remaining = store.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining.get("theme-preference").map(String::as_str),
            Some("dark")
        );
        assert_eq!(resolve_session(&store, &keys()), UserSession::anonymous());
    }

    #[test]
    fn logout_on_empty_store_is_a_no_op() {
        let store = MemoryStore::new();
        logout(&store, &keys());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn record_login_replaces_stale_aliases() {
        let store = MemoryStore::with_entries([
            ("displayNameAlt1", "Old Name"),
            ("roleAlt", "admin"),
        ]);

        assert!(record_login(
            &store,
            &keys(),
            " new@example.com ",
            None,
            Some(Role::Premium)
        ));

        let session = resolve_session(&store, &keys());
        assert_eq!(session.identity.as_deref(), Some("new@example.com"));
        assert_eq!(session.display_name, "new");
        assert_eq!(session.role, Role::Premium);
    }

    #[test]
    fn record_login_ignores_blank_identity() {
        let store = MemoryStore::new();
        assert!(!record_login(&store, &keys(), "  ", Some("Ana"), None));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("Moderator"), Role::Moderator);
        assert_eq!(Role::parse(""), Role::User);
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), role);
        }
    }
}
