//! Cursor pagination shared by every list operation.
//!
//! A page is `{limit, marker}`: the marker is the id of an existing record
//! of the listed kind, and the page starts strictly after it in the store's
//! stable order. A marker that does not name a live record is `NotFound`
//! ("no such page"); a malformed limit is `BadRequest`, raised before the
//! store is consulted.

use uuid::Uuid;

use crate::config::PagingConfig;
use crate::error::{CadenceError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    /// Requested page size; clamped to the configured maximum.
    pub limit: Option<usize>,
    /// Id of the last record of the previous page.
    pub marker: Option<Uuid>,
}

impl Page {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_marker(mut self, marker: Uuid) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Build a page from raw request parameters.
    ///
    /// A limit that is not a positive integer is `BadRequest`; a marker
    /// that is not a well-formed UUID (including the empty string) is
    /// `NotFound`, the same outcome as a marker naming no record.
    pub fn from_params(limit: Option<&str>, marker: Option<&str>) -> Result<Self> {
        let limit = match limit {
            None => None,
            Some(raw) => {
                let parsed: i64 = raw.parse().map_err(|_| {
                    CadenceError::BadRequest("limit param must be an integer".to_string())
                })?;
                if parsed <= 0 {
                    return Err(CadenceError::BadRequest(
                        "limit param must be positive".to_string(),
                    ));
                }
                Some(parsed as usize)
            }
        };

        let marker = match marker {
            None => None,
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
                CadenceError::NotFound(format!("marker {raw} could not be found"))
            })?),
        };

        Ok(Self { limit, marker })
    }

    /// Resolve the effective page size against the configured bounds.
    pub fn effective_limit(&self, config: &PagingConfig) -> Result<usize> {
        let requested = self.limit.unwrap_or(config.default_page_size);
        if requested == 0 {
            return Err(CadenceError::BadRequest(
                "limit param must be positive".to_string(),
            ));
        }
        Ok(requested.min(config.max_page_size))
    }
}

/// Slice `items` to the page: everything strictly after the marker, up to
/// the effective limit. `items` must already be in the kind's stable order.
pub fn paginate<T, F>(items: &[T], page: &Page, config: &PagingConfig, id_of: F) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> Uuid,
{
    let limit = page.effective_limit(config)?;
    let start = match page.marker {
        None => 0,
        Some(marker) => {
            let position = items.iter().position(|item| id_of(item) == marker);
            match position {
                Some(index) => index + 1,
                None => {
                    return Err(CadenceError::NotFound(format!(
                        "marker {marker} could not be found"
                    )))
                }
            }
        }
    };

    Ok(items.iter().skip(start).take(limit).cloned().collect())
}
