use tracing::{debug, info, warn};

use crate::client::{AccountClient, AccountSummary};
use crate::error::PanelError;

use super::links::{links_for, NavLink};
use super::subview::{subview_for, RevealHandle, SubView, Visibility};

/// Disk-usage summary line appended for galaxy-type webapps. The quota
/// figure is only present when the server enables quotas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageLine {
    pub disk_usage: String,
    pub quota: Option<String>,
}

/// View state derived from one `AccountSummary` fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    LoggedIn {
        email: String,
        links: Vec<NavLink>,
        usage: Option<UsageLine>,
    },
    /// Anonymous sessions always get the notice plus login/register links;
    /// `message` carries an optional server-provided notice.
    LoggedOut { message: Option<String> },
}

impl PanelState {
    pub fn from_summary(summary: &AccountSummary) -> Self {
        if summary.is_logged_in() {
            let usage = summary.is_galaxy().then(|| UsageLine {
                disk_usage: summary.disk_usage.clone(),
                quota: summary.enable_quotas.then(|| summary.quota.clone()),
            });
            PanelState::LoggedIn {
                email: summary.email.clone(),
                links: links_for(summary),
                usage,
            }
        } else {
            PanelState::LoggedOut {
                message: summary.message.clone(),
            }
        }
    }
}

/// Outcome of activating a navigation link.
#[derive(Debug, PartialEq, Eq)]
pub enum ActivateOutcome {
    /// The link's sub-view was mounted; the panel is hidden until it closes.
    Mounted,
    /// The link has no destination; nothing was fetched and the panel stays
    /// visible.
    NoDestination,
}

/// The preferences panel. Opening it performs exactly one fetch against the
/// account API; the resulting state is immutable for the panel's lifetime.
#[derive(Debug)]
pub struct PreferencesPanel {
    client: AccountClient,
    state: PanelState,
    visibility: Visibility,
    subviews: Vec<SubView>,
}

impl PreferencesPanel {
    pub async fn open(client: AccountClient) -> Result<Self, PanelError> {
        let summary = client.fetch_preferences().await?;
        let state = PanelState::from_summary(&summary);
        info!(
            logged_in = summary.is_logged_in(),
            webapp = %summary.webapp,
            "opened preferences panel"
        );
        Ok(Self {
            client,
            state,
            visibility: Visibility::new(),
            subviews: Vec::new(),
        })
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn subviews(&self) -> &[SubView] {
        &self.subviews
    }

    /// Hides the panel, fetches the link target, and mounts the mapped
    /// sub-view with the response payload. On fetch failure the panel is
    /// revealed again before the error propagates.
    pub async fn activate(&mut self, link: &NavLink) -> Result<ActivateOutcome, PanelError> {
        let Some(kind) = subview_for(link.kind) else {
            debug!(kind = link.kind.as_str(), "link has no destination");
            return Ok(ActivateOutcome::NoDestination);
        };
        let Some(target) = link.target.as_deref() else {
            debug!(kind = link.kind.as_str(), "link has no target path");
            return Ok(ActivateOutcome::NoDestination);
        };

        self.visibility.hide();
        match self.client.fetch_page(target).await {
            Ok(payload) => {
                let reveal = RevealHandle::new(self.visibility.clone());
                self.subviews.push(SubView::mount(kind, payload, reveal));
                Ok(ActivateOutcome::Mounted)
            }
            Err(err) => {
                self.visibility.reveal();
                warn!(kind = link.kind.as_str(), error = %err, "sub-page fetch failed");
                Err(err)
            }
        }
    }

    /// Closes the most recently mounted sub-view, revealing the panel.
    /// Returns false when no sub-view is mounted.
    pub fn close_subview(&mut self) -> bool {
        match self.subviews.pop() {
            Some(subview) => {
                subview.close();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::links::LinkKind;

    fn summary(value: serde_json::Value) -> AccountSummary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn logged_out_state_keeps_the_server_message() {
        let state = PanelState::from_summary(&summary(serde_json::json!({
            "id": null,
            "message": "Session expired"
        })));
        assert_eq!(
            state,
            PanelState::LoggedOut {
                message: Some("Session expired".to_string())
            }
        );
    }

    #[test]
    fn galaxy_account_with_quotas_gets_usage_line_with_quota() {
        let state = PanelState::from_summary(&summary(serde_json::json!({
            "id": "42",
            "email": "jo@example.org",
            "webapp": "galaxy",
            "disk_usage": "5.2 GB",
            "quota": "250.0 GB",
            "enable_quotas": true
        })));
        match state {
            PanelState::LoggedIn { usage, .. } => {
                let usage = usage.expect("galaxy accounts carry a usage line");
                assert_eq!(usage.disk_usage, "5.2 GB");
                assert_eq!(usage.quota.as_deref(), Some("250.0 GB"));
            }
            other => panic!("expected logged-in state, got {other:?}"),
        }
    }

    #[test]
    fn usage_line_omits_quota_when_quotas_are_disabled() {
        let state = PanelState::from_summary(&summary(serde_json::json!({
            "id": "42",
            "webapp": "galaxy",
            "disk_usage": "5.2 GB",
            "quota": "250.0 GB",
            "enable_quotas": false
        })));
        match state {
            PanelState::LoggedIn { usage, .. } => {
                assert_eq!(usage.unwrap().quota, None);
            }
            other => panic!("expected logged-in state, got {other:?}"),
        }
    }

    #[test]
    fn non_galaxy_webapp_has_no_usage_line() {
        let state = PanelState::from_summary(&summary(serde_json::json!({
            "id": "42",
            "webapp": "reports",
            "disk_usage": "5.2 GB"
        })));
        match state {
            PanelState::LoggedIn { usage, links, .. } => {
                assert!(usage.is_none());
                assert_eq!(links[0].kind, LinkKind::ApiKeys);
            }
            other => panic!("expected logged-in state, got {other:?}"),
        }
    }
}
