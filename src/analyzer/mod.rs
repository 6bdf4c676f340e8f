pub mod client;
pub mod normalize;
pub mod seo;
pub mod service;

pub use client::{create_client, HttpClient};
pub use service::{register_url, run_check, Registration};
