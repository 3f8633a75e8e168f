mod check;
mod http_client;
mod model;

pub use check::{AbuseIpDb, Lookup, SkipReason};
pub use http_client::HttpClient;
pub use model::IpRecord;
