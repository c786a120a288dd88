pub mod into_url;
pub mod response;

pub use into_url::IntoUrl;
pub use response::Response;
