//! Value objects serialized into PATS request payloads.

pub mod campaign;
pub mod line_item;
pub mod order;

pub use campaign::*;
pub use line_item::*;
pub use order::*;

use crate::error::{PatsError, Result};

/// PATS caps external identifiers at 32 characters.
pub(crate) const MAX_EXTERNAL_ID_LEN: usize = 32;

pub(crate) fn validate_external_id(field: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_EXTERNAL_ID_LEN {
        return Err(PatsError::InvalidArgument(format!(
            "{} '{}' exceeds {} characters",
            field, value, MAX_EXTERNAL_ID_LEN
        )));
    }
    Ok(())
}
