//! Rule engine for record automations.
//!
//! A rule is a named computation scoped to one record type: it reads some
//! input fields of a record (interpreting them under the decimal conventions
//! of [`crate::numeric`]), derives one or more output fields, and reports
//! exactly which field indices it changed. Rules are all-or-nothing: every
//! input is validated and every output index is range-checked before the
//! first write, so a failed application leaves the record untouched.
//!
//! The catalog is an explicit, immutable object built once and passed by
//! reference to whoever needs rule lookup; there is no process-wide mutable
//! registry.

mod credit_usage;
mod pis_contribution;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RuleError;
use crate::record::EfdRecord;

pub use credit_usage::CreditUsageSplit;
pub use pis_contribution::{CofinsContribution, PisContribution};

// =============================================================================
// RULE CONTRACT
// =============================================================================

/// Field indices a rule actually mutated, in ascending order. Empty means the
/// recomputation confirmed the stored values; callers use that to decide
/// whether to mark the session as modified.
pub type ChangedFields = Vec<usize>;

/// One record automation.
///
/// `apply` may consult `all_records` for cross-record context, but only ever
/// writes to the target record. Implementations must be idempotent: a second
/// application with no intervening edits reports an empty changed-set.
pub trait EfdRule: Send + Sync {
    /// Record type this rule is scoped to, e.g. `"M210"`.
    fn record_type(&self) -> &'static str;

    /// Short display name for menus.
    fn name(&self) -> &'static str;

    /// One-sentence description of what gets recomputed.
    fn description(&self) -> &'static str;

    /// Recompute the derived fields of `record`.
    fn apply(
        &self,
        record: &mut EfdRecord,
        all_records: &[EfdRecord],
    ) -> Result<ChangedFields, RuleError>;
}

// =============================================================================
// HELPERS SHARED BY RULES
// =============================================================================

/// Read a required input field or fail with [`RuleError::MissingField`].
pub(crate) fn require_field<'a>(record: &'a EfdRecord, index: usize) -> Result<&'a str, RuleError> {
    record.field(index).ok_or_else(|| RuleError::MissingField {
        record_type: record.record_type().to_string(),
        index,
    })
}

/// Check that every output index is writable before any write happens.
pub(crate) fn check_writable(record: &EfdRecord, outputs: &[usize]) -> Result<(), RuleError> {
    for &index in outputs {
        if index == 0 || index >= record.field_count() {
            return Err(RuleError::WriteRejected { index });
        }
    }
    Ok(())
}

/// Write `value` to `index` if it differs from the stored value, pushing the
/// index onto `changed` when a mutation happened. Callers must have
/// range-checked the index via [`check_writable`] first.
pub(crate) fn write_if_changed(
    record: &mut EfdRecord,
    index: usize,
    value: String,
    changed: &mut ChangedFields,
) {
    if record.field(index) != Some(value.as_str()) && record.set_field(index, value) {
        changed.push(index);
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Immutable catalog of the available rules, keyed by record type.
///
/// Insertion order within a record type is preserved because it drives menu
/// order; it has no bearing on correctness and rules never depend on it.
pub struct RuleCatalog {
    by_type: HashMap<&'static str, Vec<Arc<dyn EfdRule>>>,
}

impl RuleCatalog {
    /// Catalog with the standard rule set shipped by the rectifier.
    pub fn standard() -> Self {
        let mut catalog = Self {
            by_type: HashMap::new(),
        };
        catalog.register(Arc::new(PisContribution));
        catalog.register(Arc::new(CofinsContribution));
        catalog.register(Arc::new(CreditUsageSplit));
        catalog
    }

    /// Empty catalog, for callers that assemble their own rule set.
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    /// Add a rule. Only available during construction; the catalog is frozen
    /// once shared.
    pub fn register(&mut self, rule: Arc<dyn EfdRule>) {
        self.by_type.entry(rule.record_type()).or_default().push(rule);
    }

    /// Rules applicable to a record type, in registration order. An unknown
    /// type yields an empty slice, which is a normal outcome.
    pub fn rules_for(&self, record_type: &str) -> &[Arc<dyn EfdRule>] {
        self.by_type.get(record_type).map_or(&[], Vec::as_slice)
    }

    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
