use crate::client::AccountSummary;

/// The navigation entries the preferences panel can offer. Which ones show
/// up depends on server-reported account flags, never on client state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Information,
    Password,
    Communication,
    HistoryPermissions,
    ApiKeys,
    ToolboxFilters,
    OpenId,
    EmailAlerts,
}

impl LinkKind {
    pub fn title(self) -> &'static str {
        match self {
            LinkKind::Information => "Manage your information (email, address, etc.)",
            LinkKind::Password => "Change your password",
            LinkKind::Communication => "Change your communication settings",
            LinkKind::HistoryPermissions => "Change default permissions for new histories",
            LinkKind::ApiKeys => "Manage your API keys",
            LinkKind::ToolboxFilters => "Manage your ToolBox filters",
            LinkKind::OpenId => "Manage OpenIDs linked to your account",
            LinkKind::EmailAlerts => "Manage your email alerts",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Information => "information",
            LinkKind::Password => "password",
            LinkKind::Communication => "communication",
            LinkKind::HistoryPermissions => "history-permissions",
            LinkKind::ApiKeys => "api-keys",
            LinkKind::ToolboxFilters => "toolbox-filters",
            LinkKind::OpenId => "openid",
            LinkKind::EmailAlerts => "email-alerts",
        }
    }
}

/// A rendered navigation entry. `target` is the API path fetched on
/// activation; entries without one activate as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub kind: LinkKind,
    pub target: Option<String>,
}

impl NavLink {
    fn with_target(kind: LinkKind, target: String) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }

    fn without_target(kind: LinkKind) -> Self {
        Self { kind, target: None }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Derives the link set for a logged-in account. Returns an empty list for
/// anonymous sessions; the panel renders login/register affordances instead.
pub fn links_for(summary: &AccountSummary) -> Vec<NavLink> {
    let Some(id) = summary.id.as_deref() else {
        return Vec::new();
    };

    let mut links = Vec::new();

    // local credentials are managed here for every webapp; remote-user
    // deployments manage them externally
    if !summary.remote_user {
        links.push(NavLink::with_target(
            LinkKind::Information,
            format!("user_preferences/{id}/information"),
        ));
        links.push(NavLink::with_target(
            LinkKind::Password,
            format!("user_preferences/{id}/password"),
        ));
    }

    if summary.is_galaxy() {
        links.push(NavLink::with_target(
            LinkKind::Communication,
            format!("user_preferences/{id}/communication"),
        ));
        links.push(NavLink::with_target(
            LinkKind::HistoryPermissions,
            "user_preferences/change-permissions".to_string(),
        ));
        links.push(NavLink::with_target(
            LinkKind::ApiKeys,
            format!("user_preferences/{id}/api_key"),
        ));
        links.push(NavLink::with_target(
            LinkKind::ToolboxFilters,
            "user_preferences/change_toolbox_filters".to_string(),
        ));
        if summary.openid && !summary.remote_user {
            links.push(NavLink::without_target(LinkKind::OpenId));
        }
    } else {
        links.push(NavLink::with_target(
            LinkKind::ApiKeys,
            format!("user_preferences/{id}/api_key"),
        ));
        links.push(NavLink::without_target(LinkKind::EmailAlerts));
    }

    links
}
