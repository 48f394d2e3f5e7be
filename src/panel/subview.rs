use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::links::LinkKind;

/// Sub-views the panel can mount in place of itself. Link kinds without an
/// entry here have no destination and activate as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubViewKind {
    Information,
    Password,
    Communication,
    HistoryPermissions,
    ApiKeys,
    ToolboxFilters,
}

/// Maps a navigation link to the sub-view it mounts.
pub fn subview_for(kind: LinkKind) -> Option<SubViewKind> {
    match kind {
        LinkKind::Information => Some(SubViewKind::Information),
        LinkKind::Password => Some(SubViewKind::Password),
        LinkKind::Communication => Some(SubViewKind::Communication),
        LinkKind::HistoryPermissions => Some(SubViewKind::HistoryPermissions),
        LinkKind::ApiKeys => Some(SubViewKind::ApiKeys),
        LinkKind::ToolboxFilters => Some(SubViewKind::ToolboxFilters),
        LinkKind::OpenId | LinkKind::EmailAlerts => None,
    }
}

/// Shared visibility flag for the panel region. The panel hides itself when
/// a sub-view mounts; the sub-view's reveal handle restores it.
#[derive(Debug, Clone)]
pub struct Visibility {
    visible: Arc<AtomicBool>,
}

impl Visibility {
    pub fn new() -> Self {
        Self {
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    pub fn reveal(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new()
    }
}

/// Side channel handed to a mounted sub-view. Closing the sub-view reveals
/// the panel; dropping the handle without an explicit close reveals it too,
/// so a discarded sub-view can never strand the panel hidden.
#[derive(Debug)]
pub struct RevealHandle {
    visibility: Visibility,
}

impl RevealHandle {
    pub fn new(visibility: Visibility) -> Self {
        Self { visibility }
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.visibility.reveal();
    }
}

/// A mounted sub-view: the server payload it was initialized with plus the
/// reveal side channel its close action invokes.
#[derive(Debug)]
pub struct SubView {
    kind: SubViewKind,
    payload: serde_json::Value,
    _reveal: RevealHandle,
}

impl SubView {
    pub fn mount(kind: SubViewKind, payload: serde_json::Value, reveal: RevealHandle) -> Self {
        debug!(?kind, "mounting sub-view");
        Self {
            kind,
            payload,
            _reveal: reveal,
        }
    }

    pub fn kind(&self) -> SubViewKind {
        self.kind
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn close(self) {
        debug!(kind = ?self.kind, "closing sub-view");
        // reveal happens when the handle drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_kinds_have_no_subview() {
        assert!(subview_for(LinkKind::OpenId).is_none());
        assert!(subview_for(LinkKind::EmailAlerts).is_none());
        assert_eq!(
            subview_for(LinkKind::Password),
            Some(SubViewKind::Password)
        );
    }

    #[test]
    fn closing_a_subview_reveals_the_panel() {
        let visibility = Visibility::new();
        visibility.hide();

        let subview = SubView::mount(
            SubViewKind::ApiKeys,
            serde_json::json!({"keys": []}),
            RevealHandle::new(visibility.clone()),
        );
        assert!(!visibility.is_visible());

        subview.close();
        assert!(visibility.is_visible());
    }

    #[test]
    fn dropping_a_subview_also_reveals() {
        let visibility = Visibility::new();
        visibility.hide();
        {
            let _subview = SubView::mount(
                SubViewKind::Information,
                serde_json::Value::Null,
                RevealHandle::new(visibility.clone()),
            );
        }
        assert!(visibility.is_visible());
    }
}
