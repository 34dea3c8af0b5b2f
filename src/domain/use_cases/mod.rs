pub mod admin;
pub mod extractors;
pub mod inbox;
pub mod matching;
pub mod messaging;
pub mod profiles;
pub mod projects;
pub mod skill_validation;
