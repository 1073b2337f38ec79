pub mod admin;
pub mod api_key;
pub mod response;
pub mod session;

pub use admin::require_admin;
pub use api_key::{require_api_key, require_vpn_key};
pub use response::{ApiResponse, ApiResult};
pub use session::{require_session, SessionContext};
