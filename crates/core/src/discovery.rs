//! Discovery filter: which points to list for a city, state and item set.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::item_ids::parse_item_ids;
use crate::registration::normalize_state;
use crate::types::DbId;

/// A validated discovery filter.
///
/// A point matches when it is located in exactly `city` / `state` and
/// accepts at least one of `item_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointFilter {
    pub city: String,
    pub state: String,
    pub item_ids: BTreeSet<DbId>,
}

impl PointFilter {
    /// Build a filter from raw query-string values.
    ///
    /// `city` is compared verbatim (after trimming); `uf` is normalized to
    /// upper case the same way registration stores it.
    pub fn parse(
        city: Option<&str>,
        uf: Option<&str>,
        items: Option<&str>,
    ) -> Result<Self, CoreError> {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CoreError::Validation("Query parameter 'city' is required".into()))?;
        let uf = uf.ok_or_else(|| CoreError::Validation("Query parameter 'uf' is required".into()))?;
        let items =
            items.ok_or_else(|| CoreError::Validation("Query parameter 'items' is required".into()))?;

        Ok(Self {
            city: city.to_string(),
            state: normalize_state(uf)?,
            item_ids: parse_item_ids(items)?,
        })
    }

    /// Item ids as a vector, for binding as a Postgres array.
    pub fn item_id_vec(&self) -> Vec<DbId> {
        self.item_ids.iter().copied().collect()
    }
}
