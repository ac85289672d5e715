//! Document schema migration registry.
//!
//! Every persisted document carries a `schemaVersion` integer. Transforms are
//! registered per `(DocType, from_version)` and applied one after another on
//! read until no step is registered for the document's current version.
//!
//! The registry is an explicitly constructed value handed to whoever loads
//! documents; there is no process-global registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Field holding the schema version on every stored document.
pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

/// Version assumed for documents written before versioning existed.
pub const INITIAL_SCHEMA_VERSION: u32 = 1;

pub const DOC_PROFILE: &str = "profile";
pub const DOC_BODY_ENTRY: &str = "bodyEntry";
pub const DOC_OUTCOME_ENTRY: &str = "outcomeEntry";
pub const DOC_USER_METRIC_CONFIG: &str = "userMetricConfig";

/// All valid document type names.
pub const VALID_DOC_TYPES: &[&str] = &[
    DOC_PROFILE,
    DOC_BODY_ENTRY,
    DOC_OUTCOME_ENTRY,
    DOC_USER_METRIC_CONFIG,
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A raw persisted document: a JSON object.
pub type Document = serde_json::Map<String, Value>;

/// A single schema step. Plain function pointers carry no captured state, so
/// a step always maps the same input to the same output.
pub type MigrationFn = fn(Document) -> Document;

/// Kind of persisted document. Each kind has its own migration chain.
///
/// Earned badges are not documents: they live in their own table and change
/// shape through SQL migrations only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocType {
    Profile,
    BodyEntry,
    OutcomeEntry,
    UserMetricConfig,
}

impl DocType {
    /// Convert from the stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            DOC_PROFILE => Ok(Self::Profile),
            DOC_BODY_ENTRY => Ok(Self::BodyEntry),
            DOC_OUTCOME_ENTRY => Ok(Self::OutcomeEntry),
            DOC_USER_METRIC_CONFIG => Ok(Self::UserMetricConfig),
            _ => Err(format!(
                "Invalid document type '{s}'. Must be one of: {}",
                VALID_DOC_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => DOC_PROFILE,
            Self::BodyEntry => DOC_BODY_ENTRY,
            Self::OutcomeEntry => DOC_OUTCOME_ENTRY,
            Self::UserMetricConfig => DOC_USER_METRIC_CONFIG,
        }
    }
}

/// Registered schema steps keyed by `(doc_type, from_version)`.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    steps: HashMap<(DocType, u32), MigrationFn>,
}

impl MigrationRegistry {
    /// Create an empty registry. With nothing registered, documents pass
    /// through untouched apart from the default version stamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the step that upgrades `doc_type` documents from
    /// `from_version` to `from_version + 1`.
    ///
    /// A second registration for the same key is rejected and leaves the
    /// registry unchanged.
    pub fn register(
        &mut self,
        doc_type: DocType,
        from_version: u32,
        migration: MigrationFn,
    ) -> Result<(), CoreError> {
        if from_version < INITIAL_SCHEMA_VERSION {
            return Err(CoreError::Validation(format!(
                "Migration source version must be at least {INITIAL_SCHEMA_VERSION}, got {from_version}"
            )));
        }
        match self.steps.entry((doc_type, from_version)) {
            Entry::Occupied(_) => Err(CoreError::Conflict(format!(
                "Migration {}:{from_version} is already registered",
                doc_type.as_str()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(migration);
                Ok(())
            }
        }
    }

    /// Total number of registered steps across all document types.
    pub fn migration_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The version current code writes for `doc_type`: one past the end of
    /// the chain that starts at the initial version.
    pub fn current_version(&self, doc_type: DocType) -> u32 {
        let mut version = INITIAL_SCHEMA_VERSION;
        while self.steps.contains_key(&(doc_type, version)) {
            version += 1;
        }
        version
    }

    /// Upgrade `document` to the newest schema reachable from its version.
    ///
    /// A missing or null `schemaVersion` means version 1. The result always
    /// carries an explicit `schemaVersion`.
    pub fn migrate(&self, doc_type: DocType, mut document: Document) -> Result<Document, CoreError> {
        let mut version = read_schema_version(&document)?;

        while let Some(step) = self.steps.get(&(doc_type, version)) {
            document = step(document);
            version = version.checked_add(1).ok_or_else(|| {
                CoreError::Internal(format!(
                    "Schema version overflow migrating {}",
                    doc_type.as_str()
                ))
            })?;
            document.insert(SCHEMA_VERSION_FIELD.to_string(), Value::from(version));
        }

        document.insert(SCHEMA_VERSION_FIELD.to_string(), Value::from(version));
        Ok(document)
    }

    /// Overwrite the version stamp with the current version for `doc_type`.
    pub fn stamp_current_version(&self, doc_type: DocType, mut document: Document) -> Document {
        document.insert(
            SCHEMA_VERSION_FIELD.to_string(),
            Value::from(self.current_version(doc_type)),
        );
        document
    }
}

/// Read the schema version of a raw document.
///
/// Integral floats are accepted since some writers store every number as a
/// double.
pub fn read_schema_version(document: &Document) -> Result<u32, CoreError> {
    let raw = match document.get(SCHEMA_VERSION_FIELD) {
        None | Some(Value::Null) => return Ok(INITIAL_SCHEMA_VERSION),
        Some(v) => v,
    };

    let parsed = raw
        .as_u64()
        .or_else(|| {
            raw.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v >= INITIAL_SCHEMA_VERSION);

    parsed.ok_or_else(|| {
        CoreError::Validation(format!(
            "{SCHEMA_VERSION_FIELD} must be a positive integer, got {raw}"
        ))
    })
}
