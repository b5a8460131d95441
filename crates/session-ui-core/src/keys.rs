use serde::{Deserialize, Serialize};

/// Logical identity fields kept in the key-value store.
///
/// Several keys encode the same field for backward compatibility with pages
/// that wrote different names over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Identity,
    DisplayNamePrimary,
    DisplayNameAlt1,
    DisplayNameAlt2,
    RolePrimary,
    RoleAlt,
}

impl IdentityKey {
    pub const ALL: [Self; 6] = [
        Self::Identity,
        Self::DisplayNamePrimary,
        Self::DisplayNameAlt1,
        Self::DisplayNameAlt2,
        Self::RolePrimary,
        Self::RoleAlt,
    ];

    /// First non-empty, non-sentinel value wins.
    pub const DISPLAY_NAME_PRIORITY: [Self; 3] = [
        Self::DisplayNamePrimary,
        Self::DisplayNameAlt1,
        Self::DisplayNameAlt2,
    ];

    /// First non-empty value wins.
    pub const ROLE_PRIORITY: [Self; 2] = [Self::RolePrimary, Self::RoleAlt];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::DisplayNamePrimary => "displayNamePrimary",
            Self::DisplayNameAlt1 => "displayNameAlt1",
            Self::DisplayNameAlt2 => "displayNameAlt2",
            Self::RolePrimary => "rolePrimary",
            Self::RoleAlt => "roleAlt",
        }
    }
}

/// Concrete storage key for every [`IdentityKey`].
///
/// Defaults keep the names the legacy pages wrote (`utente`,
/// `utente_ruolo`) so existing sessions survive the migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub identity: String,
    pub display_name_primary: String,
    pub display_name_alt1: String,
    pub display_name_alt2: String,
    pub role_primary: String,
    pub role_alt: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            identity: "utente".to_string(),
            display_name_primary: "utente_nome".to_string(),
            display_name_alt1: "nome_utente".to_string(),
            display_name_alt2: "username".to_string(),
            role_primary: "utente_ruolo".to_string(),
            role_alt: "ruolo".to_string(),
        }
    }
}

impl StorageKeys {
    /// Keys named exactly after their logical field.
    #[must_use]
    pub fn logical() -> Self {
        Self {
            identity: IdentityKey::Identity.as_str().to_string(),
            display_name_primary: IdentityKey::DisplayNamePrimary.as_str().to_string(),
            display_name_alt1: IdentityKey::DisplayNameAlt1.as_str().to_string(),
            display_name_alt2: IdentityKey::DisplayNameAlt2.as_str().to_string(),
            role_primary: IdentityKey::RolePrimary.as_str().to_string(),
            role_alt: IdentityKey::RoleAlt.as_str().to_string(),
        }
    }

    #[must_use]
    pub fn key(&self, key: IdentityKey) -> &str {
        match key {
            IdentityKey::Identity => &self.identity,
            IdentityKey::DisplayNamePrimary => &self.display_name_primary,
            IdentityKey::DisplayNameAlt1 => &self.display_name_alt1,
            IdentityKey::DisplayNameAlt2 => &self.display_name_alt2,
            IdentityKey::RolePrimary => &self.role_primary,
            IdentityKey::RoleAlt => &self.role_alt,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        IdentityKey::ALL.into_iter().map(|key| self.key(key))
    }

    #[must_use]
    pub fn contains(&self, raw_key: &str) -> bool {
        self.all().any(|key| key == raw_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_keep_legacy_names() {
        let keys = StorageKeys::default();
        assert_eq!(keys.key(IdentityKey::Identity), "utente");
        assert_eq!(keys.key(IdentityKey::RolePrimary), "utente_ruolo");
    }

    #[test]
    fn logical_keys_match_field_names() {
        let keys = StorageKeys::logical();
        for key in IdentityKey::ALL {
            assert_eq!(keys.key(key), key.as_str());
        }
    }

    #[test]
    fn contains_only_identity_keys() {
        let keys = StorageKeys::logical();
        assert!(keys.contains("roleAlt"));
        assert!(!keys.contains("theme-preference"));
        assert_eq!(keys.all().count(), 6);
    }
}
