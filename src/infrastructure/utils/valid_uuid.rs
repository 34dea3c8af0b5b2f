use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path segment naming an entity, reporting which one was malformed.
pub fn parse_entity_id(entity: &str, id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidInput(format!("Invalid {entity} id")))
}
