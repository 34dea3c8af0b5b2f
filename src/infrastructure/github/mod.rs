pub mod client;
pub mod oauth;
