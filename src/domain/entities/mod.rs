pub mod github;
pub mod matching;
pub mod messaging;
pub mod profile;
pub mod project;
pub mod skill;
pub mod token;
