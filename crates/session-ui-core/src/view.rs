use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::presentation::{ModeratorBadgeStyle, Presentation};
use crate::session::UserSession;

pub const DESKTOP_BADGE_BASE_CLASS: &str = "user-badge";
pub const MOBILE_BADGE_BASE_CLASS: &str = "mobile-user-badge";

/// Named UI targets the page may expose. Any of them may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotId {
    DesktopContainer,
    DesktopName,
    DesktopBadge,
    DesktopAvatar,
    DesktopLoginLink,
    MobileContainer,
    MobileName,
    MobileBadge,
    MobileAvatar,
    SidebarLoginLink,
}

impl SlotId {
    pub const ALL: [Self; 10] = [
        Self::DesktopContainer,
        Self::DesktopName,
        Self::DesktopBadge,
        Self::DesktopAvatar,
        Self::DesktopLoginLink,
        Self::MobileContainer,
        Self::MobileName,
        Self::MobileBadge,
        Self::MobileAvatar,
        Self::SidebarLoginLink,
    ];

    pub const LOGIN_PROMPTS: [Self; 2] = [Self::DesktopLoginLink, Self::SidebarLoginLink];

    pub const CONTAINERS: [Self; 2] = [Self::DesktopContainer, Self::MobileContainer];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DesktopContainer => "desktop_container",
            Self::DesktopName => "desktop_name",
            Self::DesktopBadge => "desktop_badge",
            Self::DesktopAvatar => "desktop_avatar",
            Self::DesktopLoginLink => "desktop_login_link",
            Self::MobileContainer => "mobile_container",
            Self::MobileName => "mobile_name",
            Self::MobileBadge => "mobile_badge",
            Self::MobileAvatar => "mobile_avatar",
            Self::SidebarLoginLink => "sidebar_login_link",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Flex,
    Block,
    Hidden,
}

impl Display {
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Flex => "flex",
            Self::Block => "block",
            Self::Hidden => "none",
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// A single write against one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPatch {
    Display(Display),
    Text(String),
    ClassName(String),
}

struct SlotFamily {
    container: SlotId,
    container_display: Display,
    name: SlotId,
    badge: SlotId,
    avatar: SlotId,
    badge_base_class: &'static str,
    /// Child slots are only written when the container exists.
    children_need_container: bool,
}

const DESKTOP: SlotFamily = SlotFamily {
    container: SlotId::DesktopContainer,
    container_display: Display::Flex,
    name: SlotId::DesktopName,
    badge: SlotId::DesktopBadge,
    avatar: SlotId::DesktopAvatar,
    badge_base_class: DESKTOP_BADGE_BASE_CLASS,
    children_need_container: false,
};

const MOBILE: SlotFamily = SlotFamily {
    container: SlotId::MobileContainer,
    container_display: Display::Block,
    name: SlotId::MobileName,
    badge: SlotId::MobileBadge,
    avatar: SlotId::MobileAvatar,
    badge_base_class: MOBILE_BADGE_BASE_CLASS,
    children_need_container: true,
};

const LOGIN_PROMPT_DISPLAY: Display = Display::Block;

/// One planned write. `requires` names a slot that must exist on the page
/// for this write to happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPatch {
    pub slot: SlotId,
    pub patch: SlotPatch,
    pub requires: Option<SlotId>,
}

/// Ordered slot writes that bring the page in line with a session.
///
/// Building a plan is pure; applying it is the host's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPlan {
    patches: Vec<PlannedPatch>,
}

impl ViewPlan {
    #[must_use]
    pub fn for_session(session: &UserSession, moderator_style: ModeratorBadgeStyle) -> Self {
        let mut plan = Self::default();
        if !session.is_authenticated() {
            for container in SlotId::CONTAINERS {
                plan.push(container, SlotPatch::Display(Display::Hidden));
            }
            for prompt in SlotId::LOGIN_PROMPTS {
                plan.push(prompt, SlotPatch::Display(LOGIN_PROMPT_DISPLAY));
            }
            return plan;
        }

        for prompt in SlotId::LOGIN_PROMPTS {
            plan.push(prompt, SlotPatch::Display(Display::Hidden));
        }
        let presentation = Presentation::from_session(session, moderator_style);
        for family in [&DESKTOP, &MOBILE] {
            plan.push_family(family, &presentation);
        }
        plan
    }

    #[must_use]
    pub fn patches(&self) -> &[PlannedPatch] {
        &self.patches
    }

    pub fn patches_for(&self, slot: SlotId) -> impl Iterator<Item = &SlotPatch> {
        self.patches
            .iter()
            .filter(move |planned| planned.slot == slot)
            .map(|planned| &planned.patch)
    }

    fn push(&mut self, slot: SlotId, patch: SlotPatch) {
        self.push_requiring(slot, patch, None);
    }

    fn push_requiring(&mut self, slot: SlotId, patch: SlotPatch, requires: Option<SlotId>) {
        self.patches.push(PlannedPatch {
            slot,
            patch,
            requires,
        });
    }

    fn push_family(&mut self, family: &SlotFamily, presentation: &Presentation) {
        let requires = family.children_need_container.then_some(family.container);
        self.push(
            family.container,
            SlotPatch::Display(family.container_display),
        );
        self.push_requiring(
            family.name,
            SlotPatch::Text(presentation.display_name.clone()),
            requires,
        );
        self.push_requiring(
            family.badge,
            SlotPatch::Text(presentation.badge_text.to_string()),
            requires,
        );
        self.push_requiring(
            family.badge,
            SlotPatch::ClassName(format!(
                "{} {}",
                family.badge_base_class, presentation.badge_class
            )),
            requires,
        );
        self.push_requiring(
            family.avatar,
            SlotPatch::Text(presentation.initial.clone()),
            requires,
        );
    }
}

/// Binding between slot ids and whatever actually displays them.
pub trait SlotHost {
    /// Applies `patch` when `slot` exists on the page. Returns `false` for an
    /// absent slot.
    fn apply(&mut self, slot: SlotId, patch: &SlotPatch) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub applied: usize,
    pub skipped: usize,
}

/// Pushes a session into the slot host. Idempotent: every patch overwrites
/// rather than accumulates.
///
/// A write whose required slot turned out to be absent is skipped without
/// reaching the host.
pub fn render<H>(
    session: &UserSession,
    host: &mut H,
    moderator_style: ModeratorBadgeStyle,
) -> RenderReport
where
    H: SlotHost + ?Sized,
{
    let plan = ViewPlan::for_session(session, moderator_style);
    let mut report = RenderReport::default();
    let mut absent = BTreeSet::new();
    for planned in plan.patches() {
        let blocked = planned
            .requires
            .is_some_and(|required| absent.contains(&required));
        if !blocked && host.apply(planned.slot, &planned.patch) {
            report.applied += 1;
        } else {
            report.skipped += 1;
            absent.insert(planned.slot);
        }
    }
    debug!(
        authenticated = session.is_authenticated(),
        applied = report.applied,
        skipped = report.skipped,
        "rendered session slots"
    );
    report
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    pub display: Option<Display>,
    pub text: Option<String>,
    pub class_name: Option<String>,
}

/// Slot host backed by plain values; only the slots it was built with exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySlots {
    slots: BTreeMap<SlotId, SlotState>,
}

impl MemorySlots {
    pub fn with_slots(slots: impl IntoIterator<Item = SlotId>) -> Self {
        Self {
            slots: slots
                .into_iter()
                .map(|slot| (slot, SlotState::default()))
                .collect(),
        }
    }

    #[must_use]
    pub fn full() -> Self {
        Self::with_slots(SlotId::ALL)
    }

    #[must_use]
    pub fn present(&self) -> BTreeSet<SlotId> {
        self.slots.keys().copied().collect()
    }

    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&SlotState> {
        self.slots.get(&slot)
    }

    #[must_use]
    pub fn display(&self, slot: SlotId) -> Option<Display> {
        self.get(slot).and_then(|state| state.display)
    }

    #[must_use]
    pub fn text(&self, slot: SlotId) -> Option<&str> {
        self.get(slot).and_then(|state| state.text.as_deref())
    }

    #[must_use]
    pub fn class_name(&self, slot: SlotId) -> Option<&str> {
        self.get(slot).and_then(|state| state.class_name.as_deref())
    }
}

impl SlotHost for MemorySlots {
    fn apply(&mut self, slot: SlotId, patch: &SlotPatch) -> bool {
        let Some(state) = self.slots.get_mut(&slot) else {
            return false;
        };
        match patch {
            SlotPatch::Display(display) => state.display = Some(*display),
            SlotPatch::Text(text) => state.text = Some(text.clone()),
            SlotPatch::ClassName(class_name) => state.class_name = Some(class_name.clone()),
        }
        true
    }
}
