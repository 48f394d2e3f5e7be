pub mod model;
pub mod quota_meter;

pub use model::{QuotaField, QuotaModel, UserQuotaState};
pub use quota_meter::{MeterThresholds, MeterView, QuotaEvent, QuotaMeter, Severity};
