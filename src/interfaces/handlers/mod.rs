pub mod admin;
pub mod conversations;
pub mod developers;
pub mod github;
pub mod home;
pub mod inbox;
pub mod json_error;
pub mod matches;
pub mod profiles;
pub mod projects;
pub mod skills;
pub mod system;
