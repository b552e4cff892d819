pub mod admin;
pub mod device;
pub mod ping;
pub mod query;

pub use admin::AdminService;
pub use ping::PingService;
pub use query::QueryService;
