pub mod auth;
pub mod db;
pub mod github;
pub mod notifications;
pub mod realtime;
pub mod utils;
