pub mod handlers;
pub mod router;
pub mod types;

pub use router::create_router;

use crate::client::AccountClient;
use crate::meter::QuotaMeter;

pub struct ApiState {
    pub client: AccountClient,
    pub meter: QuotaMeter,
}

impl ApiState {
    pub fn new(client: AccountClient, meter: QuotaMeter) -> Self {
        Self { client, meter }
    }
}
