pub mod badges;
pub mod entries;
pub mod metric_config;
pub mod profile;
pub mod reference;

use stride_core::entries::EntryKind;
use stride_core::store::{DAILY_METRICS_DOC_ID, OUTCOME_METRICS_DOC_ID};

use crate::error::{AppError, AppResult};

/// Parse the `{kind}` path segment (`body` or `outcome`).
pub(crate) fn parse_kind(kind: &str) -> AppResult<EntryKind> {
    EntryKind::from_str_value(kind).map_err(AppError::BadRequest)
}

/// Document id of the metric selection for an entry kind.
pub(crate) fn metric_config_doc_id(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Body => DAILY_METRICS_DOC_ID,
        EntryKind::Outcome => OUTCOME_METRICS_DOC_ID,
    }
}
