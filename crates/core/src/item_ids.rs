//! Parsing of delimited item-id lists (`items=1,2,3`).
//!
//! Both the registration form and the discovery query carry the accepted
//! material categories as a comma-separated string. Tokens are trimmed,
//! parsed as ids, and collected into an ordered set so a point never lists
//! the same item twice.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Separator between ids in the wire format.
pub const ITEM_ID_SEPARATOR: char = ',';

/// Parse a comma-separated list of item ids into a de-duplicated set.
///
/// - Whitespace around each token is trimmed.
/// - Empty tokens (`"1,,2"`, trailing commas) are skipped.
/// - Non-numeric or non-positive tokens are rejected with
///   [`CoreError::Validation`]. Whether an id exists in the catalog is left
///   to the database's foreign key.
/// - The resulting set must not be empty.
pub fn parse_item_ids(raw: &str) -> Result<BTreeSet<DbId>, CoreError> {
    let mut ids = BTreeSet::new();

    for token in raw.split(ITEM_ID_SEPARATOR).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        let id: DbId = token
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid item id '{token}'")))?;
        if id <= 0 {
            return Err(CoreError::Validation(format!(
                "Item id must be positive, got {id}"
            )));
        }
        ids.insert(id);
    }

    if ids.is_empty() {
        return Err(CoreError::Validation(
            "At least one item id is required".into(),
        ));
    }

    Ok(ids)
}
