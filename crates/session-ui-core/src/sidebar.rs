//! Sidebar navigation state: open/close transitions, active-link highlighting
//! and one level of collapsible link groups. Recomputed on every page view.

pub const DEFAULT_PAGE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    OpenRequested,
    CloseRequested,
    /// Pointer interaction outside both the panel and its toggle.
    ClickOutside,
    EscapePressed,
    LinkSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarEffect {
    pub changed: bool,
    /// Body scrolling is locked while the panel is open.
    pub lock_body_scroll: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidebarState {
    open: bool,
}

impl SidebarState {
    #[must_use]
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn handle(&mut self, event: SidebarEvent) -> SidebarEffect {
        let next = matches!(event, SidebarEvent::OpenRequested);
        let changed = self.open != next;
        self.open = next;
        SidebarEffect {
            changed,
            lock_body_scroll: next,
        }
    }
}

/// Last path segment of `pathname`, or [`DEFAULT_PAGE`] for a directory path.
#[must_use]
pub fn current_page(pathname: &str) -> String {
    let last = pathname.rsplit('/').next().unwrap_or_default().trim();
    if last.is_empty() {
        DEFAULT_PAGE.to_string()
    } else {
        last.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub active: bool,
}

impl NavLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            active: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavGroup {
    pub links: Vec<NavLink>,
    pub expanded: bool,
}

impl NavGroup {
    pub fn new(links: impl IntoIterator<Item = NavLink>) -> Self {
        Self {
            links: links.into_iter().collect(),
            expanded: false,
        }
    }

    #[must_use]
    pub fn has_active_link(&self) -> bool {
        self.links.iter().any(|link| link.active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Link(NavLink),
    Group(NavGroup),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavMenu {
    entries: Vec<NavEntry>,
}

impl NavMenu {
    pub fn new(entries: impl IntoIterator<Item = NavEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn groups(&self) -> impl Iterator<Item = &NavGroup> {
        self.entries.iter().filter_map(|entry| match entry {
            NavEntry::Group(group) => Some(group),
            NavEntry::Link(_) => None,
        })
    }

    fn groups_mut(&mut self) -> impl Iterator<Item = &mut NavGroup> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            NavEntry::Group(group) => Some(group),
            NavEntry::Link(_) => None,
        })
    }

    /// Marks links whose `href` equals `page` and expands the groups holding
    /// them. Returns the number of active links.
    pub fn highlight_active(&mut self, page: &str) -> usize {
        let mut matched = 0;
        for entry in &mut self.entries {
            match entry {
                NavEntry::Link(link) => {
                    link.active = link.href == page;
                    matched += usize::from(link.active);
                }
                NavEntry::Group(group) => {
                    for link in &mut group.links {
                        link.active = link.href == page;
                        matched += usize::from(link.active);
                    }
                    if group.has_active_link() {
                        group.expanded = true;
                    }
                }
            }
        }
        matched
    }

    /// Toggles the group at `group_index` (counting groups only) and collapses
    /// every sibling. Returns the new expanded state; an out-of-range index
    /// returns `None` and changes nothing.
    pub fn toggle_group(&mut self, group_index: usize) -> Option<bool> {
        if group_index >= self.groups().count() {
            return None;
        }
        let mut toggled = None;
        for (index, group) in self.groups_mut().enumerate() {
            if index == group_index {
                group.expanded = !group.expanded;
                toggled = Some(group.expanded);
            } else {
                group.expanded = false;
            }
        }
        toggled
    }

    pub fn collapse_groups(&mut self) {
        for group in self.groups_mut() {
            group.expanded = false;
        }
    }
}
