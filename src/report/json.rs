use anyhow::Result;

use crate::models::ClassifiedRecord;

/// Serialize the classified rows, in input order.
pub fn render(rows: &[ClassifiedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
