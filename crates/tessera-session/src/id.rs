//! Session identifier generation.

use uuid::Uuid;

/// Source of fresh session identifiers.
///
/// Identifiers must be unpredictable and effectively unique for the life of
/// the process. An unavailable entropy source is fatal: implementations panic
/// rather than hand out a weak id.
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier.
    fn new_id(&self) -> String;
}

/// Random (version 4) UUIDs: 122 bits from the OS RNG, hyphenated text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
