#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `id` is kept as the caller supplied it, which may not be a valid `DbId`.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced row does not exist or a database constraint rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
