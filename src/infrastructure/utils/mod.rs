pub mod markdown;
pub mod social_card;
pub mod valid_uuid;
