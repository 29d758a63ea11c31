//! The controlling document extraction pipeline.
//!
//! This module contains the scope validator, the query builder, the
//! header/line reconciler, the field normalizer and the [`Extractor`] that
//! chains them around a remote document search.

mod normalize;
mod pipeline;
mod query;
mod reconcile;
mod scope;

pub use normalize::{normalize, strip_leading_zeros};
pub use pipeline::{ExtractionOutcome, Extractor};
pub use query::{
    COST_CENTER_FIELD, DOCUMENT_FIND_FUNCTION, POSTING_DATE_FIELD, RemoteQuerySpec, SelectOption,
    SelectionCriterion, Sign, build_request,
};
pub use reconcile::{HeaderLookup, HeaderLookupBuilder, JoinedLine, Reconciliation, reconcile};
pub use scope::{ScopeDecision, validate_scope};
