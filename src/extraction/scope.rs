//! Cost center scope validation.

use std::collections::BTreeSet;

use serde::Serialize;

/// Outcome of checking requested cost centers against the ERP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeDecision {
    /// Whether the extraction should query the ERP.
    pub proceed: bool,
    /// Requested cost centers known to the ERP, in request order.
    pub present: Vec<String>,
    /// Requested cost centers unknown to the ERP, in request order.
    pub absent: Vec<String>,
}

/// Intersects the requested cost centers with those known to the ERP.
///
/// The extraction proceeds as soon as one requested cost center exists;
/// missing ones are reported in `absent` but do not stop the run.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::extraction::validate_scope;
/// use std::collections::BTreeSet;
///
/// let known: BTreeSet<String> = ["10", "20"].iter().map(|s| s.to_string()).collect();
/// let requested = vec!["20".to_string(), "30".to_string()];
///
/// let decision = validate_scope(&requested, &known);
/// assert!(decision.proceed);
/// assert_eq!(decision.present, ["20"]);
/// assert_eq!(decision.absent, ["30"]);
/// ```
pub fn validate_scope(requested: &[String], known: &BTreeSet<String>) -> ScopeDecision {
    let (present, absent): (Vec<String>, Vec<String>) = requested
        .iter()
        .cloned()
        .partition(|cost_center| known.contains(cost_center));

    ScopeDecision {
        proceed: !present.is_empty(),
        present,
        absent,
    }
}
