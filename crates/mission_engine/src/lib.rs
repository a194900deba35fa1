//! Mission engine: agent API access, the poll session and report persistence.
mod gateway;
mod persist;
mod session;

pub use gateway::{
    ApiGateway, GatewayInitError, GatewaySettings, ReqwestGateway, DEFAULT_API_BASE,
};
pub use persist::{PersistError, ReportWriter};
pub use session::{
    local_clock, Clock, SessionConfig, SessionHandle, DEFAULT_POLL_INTERVAL,
    DEFAULT_REPORT_FILENAME,
};
