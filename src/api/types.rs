use serde::{Deserialize, Serialize};

use crate::meter::{Severity, UserQuotaState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshQuotaRequest {
    /// Extra query parameters forwarded to the user fetch.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotaStateResponse {
    pub state: UserQuotaState,
    pub severity: Option<Severity>,
    pub over_quota: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
