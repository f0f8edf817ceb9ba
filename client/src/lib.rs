pub mod config;
pub mod hosted;
pub mod provider;
pub mod types;

pub use config::BackendConfig;
pub use hosted::HostedBackend;
pub use provider::{BookingBackend, ClientError, ClientResult};
pub use types::{
    hour_slot, AvailabilityQuery, BookingRequest, Credentials, FunctionCall, FunctionReply,
    HttpMethod, SiteResponse, StatusUpdate,
};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::hosted::*;
    pub use crate::provider::*;
    pub use crate::types::*;
}
