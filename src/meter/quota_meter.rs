use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::AccountClient;
use crate::error::PanelError;

use super::model::{QuotaField, QuotaModel, UserQuotaState};

/// Percentage thresholds for the meter's severity classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterThresholds {
    pub warn_at_percent: f64,
    pub error_at_percent: f64,
}

impl Default for MeterThresholds {
    fn default() -> Self {
        Self {
            warn_at_percent: 85.0,
            error_at_percent: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ok,
    Approaching,
    Over,
}

impl MeterThresholds {
    /// Pure classification: the same `(percent, warn, error)` triple always
    /// yields the same severity.
    pub fn classify(&self, percent: f64) -> Severity {
        if percent >= self.error_at_percent {
            Severity::Over
        } else if percent >= self.warn_at_percent {
            Severity::Approaching
        } else {
            Severity::Ok
        }
    }
}

/// One of the two mutually exclusive meter templates, chosen solely on
/// whether a quota percentage is known.
#[derive(Debug, Clone, PartialEq)]
pub enum MeterView {
    /// Quota disabled or unknown: plain usage text, no severity.
    UsageOnly { usage: Option<String> },
    /// Quota known: progress bar plus severity styling. `bar_percent` is
    /// clamped to 100 for display; `percent` carries the raw value.
    Meter {
        percent: f64,
        bar_percent: f64,
        severity: Severity,
        usage: Option<String>,
    },
}

/// Severity notification emitted on every meter render, carrying the model
/// snapshot the classification was computed from.
#[derive(Debug, Clone)]
pub struct QuotaEvent {
    pub severity: Severity,
    pub snapshot: UserQuotaState,
}

#[derive(Clone)]
pub struct QuotaMeter {
    model: QuotaModel,
    thresholds: MeterThresholds,
    events: broadcast::Sender<QuotaEvent>,
}

impl QuotaMeter {
    pub fn new(model: QuotaModel, thresholds: MeterThresholds) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            model,
            thresholds,
            events,
        }
    }

    pub fn model(&self) -> &QuotaModel {
        &self.model
    }

    pub fn thresholds(&self) -> MeterThresholds {
        self.thresholds
    }

    pub fn events(&self) -> broadcast::Receiver<QuotaEvent> {
        self.events.subscribe()
    }

    pub fn is_over_quota(&self) -> bool {
        self.model
            .snapshot()
            .quota_percent
            .is_some_and(|percent| percent >= self.thresholds.error_at_percent)
    }

    /// Delegates to the model's refetch; rendering follows from the change
    /// notifications the refetch produces, never synchronously from here.
    pub async fn update(
        &self,
        client: &AccountClient,
        extra: &[(String, String)],
    ) -> Result<(), PanelError> {
        self.model.load_from_api(client, extra).await
    }

    /// Builds the current view and, when a quota is known, emits the
    /// severity event for it. The usage-only template emits nothing.
    pub fn render(&self) -> MeterView {
        let snapshot = self.model.snapshot();
        match snapshot.quota_percent {
            None => MeterView::UsageOnly {
                usage: snapshot.nice_total_disk_usage,
            },
            Some(percent) => {
                let severity = self.thresholds.classify(percent);
                let _ = self.events.send(QuotaEvent {
                    severity,
                    snapshot: snapshot.clone(),
                });
                MeterView::Meter {
                    percent,
                    bar_percent: percent.min(100.0),
                    severity,
                    usage: snapshot.nice_total_disk_usage,
                }
            }
        }
    }

    /// Only these two fields drive a re-render; writes to any other model
    /// field are ignored by the meter.
    pub fn observes(field: QuotaField) -> bool {
        matches!(field, QuotaField::QuotaPercent | QuotaField::TotalDiskUsage)
    }

    /// Re-renders whenever an observed field changes, for as long as the
    /// model handle is alive.
    pub fn start_render_task(&self) -> JoinHandle<()> {
        let meter = self.clone();
        let mut changes = meter.model.subscribe();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(field) if Self::observes(field) => {
                        let view = meter.render();
                        debug!(?field, ?view, "quota meter re-rendered");
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "quota meter missed change notifications");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
