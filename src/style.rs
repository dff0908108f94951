//! Shared presentation mapping consulted by every add-on.
//!
//! Role, priority, and status rendering lives here once instead of being
//! re-branched in each output format.

use crate::model::{ActionStatus, Folder, Priority};

/// Human-readable label for a folder's role.
pub fn role_label(folder: &Folder) -> &'static str {
    let role = &folder.role;
    if role.project {
        "Project"
    } else if role.inbox {
        "Inbox"
    } else if role.next_queue {
        "Next actions"
    } else if role.reference {
        "Reference"
    } else if role.someday {
        "Someday / maybe"
    } else if role.action_list {
        "Action list"
    } else {
        "List"
    }
}

/// Star string for a priority; absent priority renders as no stars.
pub fn priority_stars(priority: Option<Priority>) -> &'static str {
    match priority {
        None => "",
        Some(Priority::Low) => "*",
        Some(Priority::Medium) => "**",
        Some(Priority::High) => "***",
    }
}

/// Status rendering: a text symbol plus the CSS class styled HTML uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: &'static str,
    pub css_class: &'static str,
}

pub fn status_glyph(status: ActionStatus) -> Glyph {
    match status {
        ActionStatus::Open => Glyph {
            symbol: "\u{25CB}", // ○
            css_class: "open",
        },
        ActionStatus::Resolved => Glyph {
            symbol: "\u{2713}", // ✓
            css_class: "resolved",
        },
        ActionStatus::Deleted => Glyph {
            symbol: "\u{2717}", // ✗
            css_class: "deleted",
        },
        ActionStatus::Stalled => Glyph {
            symbol: "\u{2016}", // ‖
            css_class: "stalled",
        },
    }
}
