pub mod options;

pub use options::{Body, RequestOptions};
