pub mod codec;
pub mod compatibility;
pub mod entities;
pub mod skill_scoring;
pub mod store;
pub mod use_cases;
