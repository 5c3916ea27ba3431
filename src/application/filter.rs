//! Post-aggregation filter pipeline.
//!
//! Downstream policy hooks into the aggregation here: zero or more filters
//! are registered and applied in registration order, each receiving the
//! previous filter's output. Records are in transport-neutral JSON form, so
//! filters never depend on the crate's domain types.

use serde_json::Value;

/// A single registered transformation over the aggregated record set.
pub type UserFilter = Box<dyn Fn(Vec<Value>) -> Vec<Value> + Send + Sync>;

/// Ordered chain of record-set transformations.
///
/// # Example
/// ```
/// use user_fanout::FilterPipeline;
/// use serde_json::json;
///
/// let mut pipeline = FilterPipeline::new();
/// pipeline.register(|records| {
///     records
///         .into_iter()
///         .filter(|r| r["id"].as_i64().is_some_and(|id| id % 2 != 0))
///         .collect()
/// });
///
/// let out = pipeline.apply(vec![json!({"id": 1}), json!({"id": 2})]);
/// assert_eq!(out.len(), 1);
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<UserFilter>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; filters run in registration order.
    pub fn register<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Run every filter sequentially over the record set.
    ///
    /// Filters are untrusted transformations: they may drop, rewrite, or
    /// (although not intended) add records. Each runs to completion before
    /// the next starts.
    pub fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        self.filters
            .iter()
            .fold(records, |current, filter| filter(current))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = FilterPipeline::new();
        let records = vec![json!({"id": 1})];

        assert_eq!(pipeline.apply(records.clone()), records);
    }

    #[test]
    fn test_filters_run_in_registration_order() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register(|mut records| {
            records.push(json!("first"));
            records
        });
        pipeline.register(|mut records| {
            records.push(json!("second"));
            records
        });

        let out = pipeline.apply(Vec::new());
        assert_eq!(out, vec![json!("first"), json!("second")]);
    }

    #[test]
    fn test_each_filter_sees_previous_output() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register(|records| {
            records
                .into_iter()
                .filter(|r| r["id"].as_i64().is_some_and(|id| id > 1))
                .collect()
        });
        pipeline.register(|records| {
            // By now only ids > 1 remain.
            assert!(records.iter().all(|r| r["id"].as_i64().unwrap() > 1));
            records
        });

        let out = pipeline.apply(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_len_tracks_registrations() {
        let mut pipeline = FilterPipeline::new();
        assert!(pipeline.is_empty());

        pipeline.register(|records| records);
        pipeline.register(|records| records);
        assert_eq!(pipeline.len(), 2);
    }
}
