use super::types::{ItemId, RecipeId};
use thiserror::Error;

/// Broad error categories used when deciding how an actor recovers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No seat, not enough ingredients, inventory full, not enough money
    ResourceUnavailable,
    /// Unset waypoint, unknown catalog entry, empty menu
    MissingConfiguration,
    /// The same recipe is already being crafted
    ConcurrentCraftConflict,
    /// Save file could not be read or written
    Persistence,
    /// Configuration or catalog data could not be parsed or is invalid
    Config,
}

#[derive(Debug, Error)]
pub enum CafeError {
    #[error("not enough {item}: needed {needed}, have {held}")]
    InsufficientItems { item: ItemId, needed: i32, held: i32 },

    #[error("inventory full: cannot add {amount} x {item} ({current}/{capacity})")]
    CapacityExceeded { item: ItemId, amount: i32, current: i32, capacity: i32 },

    #[error("insufficient funds: needed {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("recipe '{0}' is already being crafted")]
    CraftAlreadyActive(RecipeId),

    #[error("failed to debit {item} while crafting '{recipe}'")]
    IngredientDebitFailed { recipe: RecipeId, item: ItemId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CafeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CafeError::InsufficientItems { .. }
            | CafeError::CapacityExceeded { .. }
            | CafeError::InsufficientFunds { .. }
            | CafeError::IngredientDebitFailed { .. } => ErrorKind::ResourceUnavailable,
            CafeError::MissingConfiguration(_) => ErrorKind::MissingConfiguration,
            CafeError::CraftAlreadyActive(_) => ErrorKind::ConcurrentCraftConflict,
            CafeError::Io(_) => ErrorKind::Persistence,
            CafeError::Json(_) | CafeError::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}

pub type CafeResult<T> = Result<T, CafeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CafeError::InsufficientFunds { needed: 50.0, available: 10.0 }.kind(),
            ErrorKind::ResourceUnavailable
        );
        assert_eq!(
            CafeError::CraftAlreadyActive(RecipeId::new("coffee")).kind(),
            ErrorKind::ConcurrentCraftConflict
        );
        assert_eq!(
            CafeError::MissingConfiguration("exit point".into()).kind(),
            ErrorKind::MissingConfiguration
        );
    }

    #[test]
    fn test_error_messages() {
        let err = CafeError::InsufficientItems {
            item: ItemId::new("milk"),
            needed: 5,
            held: 3,
        };
        assert_eq!(err.to_string(), "not enough milk: needed 5, have 3");
    }
}
