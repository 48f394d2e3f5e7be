pub mod links;
pub mod preferences;
pub mod subview;

pub use links::{links_for, LinkKind, NavLink};
pub use preferences::{ActivateOutcome, PanelState, PreferencesPanel, UsageLine};
pub use subview::{subview_for, RevealHandle, SubView, SubViewKind, Visibility};
