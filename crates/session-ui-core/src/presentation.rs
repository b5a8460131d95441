use serde::{Deserialize, Serialize};

use crate::session::{Role, UserSession};

pub const DEFAULT_INITIAL: &str = "U";

/// Styling used for the moderator badge. Older pages aliased moderators to
/// the admin badge; newer ones gave them their own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeratorBadgeStyle {
    #[default]
    Distinct,
    AliasAdmin,
}

/// Uppercased first character of the display name, `"U"` when there is none.
#[must_use]
pub fn initial(session: &UserSession) -> String {
    session
        .display_name
        .chars()
        .next()
        .map_or_else(
            || DEFAULT_INITIAL.to_string(),
            |ch| ch.to_uppercase().collect(),
        )
}

#[must_use]
pub fn badge_text(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Moderator => "Mod",
        Role::Premium => "Premium",
        Role::User => "User",
    }
}

#[must_use]
pub fn badge_class(role: Role, moderator_style: ModeratorBadgeStyle) -> &'static str {
    match (role, moderator_style) {
        (Role::Admin, _) | (Role::Moderator, ModeratorBadgeStyle::AliasAdmin) => "badge-admin",
        (Role::Moderator, ModeratorBadgeStyle::Distinct) => "badge-moderator",
        (Role::Premium, _) => "badge-premium",
        (Role::User, _) => "badge-user",
    }
}

/// Display fields derived from a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub display_name: String,
    pub initial: String,
    pub badge_text: &'static str,
    pub badge_class: &'static str,
}

impl Presentation {
    #[must_use]
    pub fn from_session(session: &UserSession, moderator_style: ModeratorBadgeStyle) -> Self {
        Self {
            display_name: session.display_name.clone(),
            initial: initial(session),
            badge_text: badge_text(session.role),
            badge_class: badge_class(session.role, moderator_style),
        }
    }
}
