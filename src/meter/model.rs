use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::client::AccountClient;
use crate::error::PanelError;

/// Quota-related user state observed by the meter.
///
/// `quota_percent` is `None` when quotas are disabled for the account;
/// values at or above the error threshold mean the user is over quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserQuotaState {
    pub id: String,
    pub quota_percent: Option<f64>,
    pub total_disk_usage: u64,
    pub nice_total_disk_usage: Option<String>,
}

impl UserQuotaState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quota_percent: None,
            total_disk_usage: 0,
            nice_total_disk_usage: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaField {
    Id,
    QuotaPercent,
    TotalDiskUsage,
    NiceTotalDiskUsage,
}

/// Shared handle to the quota state. Setters notify subscribers only when
/// the stored value actually changed, so observers can rely on one
/// notification per effective write.
#[derive(Clone)]
pub struct QuotaModel {
    state: Arc<RwLock<UserQuotaState>>,
    changes: broadcast::Sender<QuotaField>,
}

impl QuotaModel {
    pub fn new(state: UserQuotaState) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(state)),
            changes,
        }
    }

    pub fn snapshot(&self) -> UserQuotaState {
        self.state.read().expect("quota state lock poisoned").clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuotaField> {
        self.changes.subscribe()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        let id = id.into();
        self.write_field(QuotaField::Id, |state| {
            if state.id == id {
                return false;
            }
            state.id = id.clone();
            true
        });
    }

    pub fn set_quota_percent(&self, percent: Option<f64>) {
        self.write_field(QuotaField::QuotaPercent, |state| {
            if state.quota_percent == percent {
                return false;
            }
            state.quota_percent = percent;
            true
        });
    }

    pub fn set_total_disk_usage(&self, bytes: u64) {
        self.write_field(QuotaField::TotalDiskUsage, |state| {
            if state.total_disk_usage == bytes {
                return false;
            }
            state.total_disk_usage = bytes;
            true
        });
    }

    pub fn set_nice_total_disk_usage(&self, text: Option<String>) {
        self.write_field(QuotaField::NiceTotalDiskUsage, |state| {
            if state.nice_total_disk_usage == text {
                return false;
            }
            state.nice_total_disk_usage = text.clone();
            true
        });
    }

    /// Refetches the bound user and applies the returned quota fields.
    /// Observers learn about the result through change notifications, not
    /// through a return value.
    pub async fn load_from_api(
        &self,
        client: &AccountClient,
        extra: &[(String, String)],
    ) -> Result<(), PanelError> {
        let id = {
            let state = self.state.read().expect("quota state lock poisoned");
            state.id.clone()
        };
        if id.is_empty() {
            return Err(PanelError::NoBoundUser);
        }

        let fields = client.fetch_user(&id, extra).await?;
        debug!(user_id = %id, "applying refreshed quota fields");

        if let Some(percent) = fields.quota_percent {
            self.set_quota_percent(percent);
        }
        if let Some(bytes) = fields.total_disk_usage {
            self.set_total_disk_usage(bytes);
        }
        if fields.nice_total_disk_usage.is_some() {
            self.set_nice_total_disk_usage(fields.nice_total_disk_usage);
        }
        Ok(())
    }

    fn write_field(&self, field: QuotaField, apply: impl FnOnce(&mut UserQuotaState) -> bool) {
        let changed = {
            let mut state = self.state.write().expect("quota state lock poisoned");
            apply(&mut state)
        };
        if changed {
            let _ = self.changes.send(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_notify_only_on_change() {
        let model = QuotaModel::new(UserQuotaState::new("42"));
        let mut changes = model.subscribe();

        model.set_quota_percent(Some(50.0));
        model.set_quota_percent(Some(50.0));
        model.set_total_disk_usage(1024);

        assert_eq!(changes.try_recv().unwrap(), QuotaField::QuotaPercent);
        assert_eq!(changes.try_recv().unwrap(), QuotaField::TotalDiskUsage);
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn snapshot_reflects_writes() {
        let model = QuotaModel::new(UserQuotaState::new("42"));
        model.set_quota_percent(Some(99.5));
        model.set_nice_total_disk_usage(Some("2.1 GB".to_string()));

        let snapshot = model.snapshot();
        assert_eq!(snapshot.id, "42");
        assert_eq!(snapshot.quota_percent, Some(99.5));
        assert_eq!(snapshot.nice_total_disk_usage.as_deref(), Some("2.1 GB"));
    }

    #[tokio::test]
    async fn load_without_bound_user_is_rejected() {
        let model = QuotaModel::new(UserQuotaState::new(""));
        let client =
            AccountClient::new("http://127.0.0.1:1", std::time::Duration::from_secs(1)).unwrap();
        let err = model
            .load_from_api(&client, &[])
            .await
            .expect_err("empty id must not trigger a fetch");
        assert!(matches!(err, PanelError::NoBoundUser));
    }
}
