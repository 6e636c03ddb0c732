use serde::Serialize;

use crate::ordered::OrderedMap;
use crate::reconcile::ReconciledView;

/// Training name -> number of people whose latest completion is on record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletionCounts(pub OrderedMap<String, usize>);

impl CompletionCounts {
    pub fn get(&self, training: &str) -> usize {
        self.0.get(training).copied().unwrap_or(0)
    }
}

/// Count canonical records per training. Every record counts once.
pub fn completion_counts(view: &ReconciledView) -> CompletionCounts {
    let mut counts = OrderedMap::new();
    for record in view {
        *counts.entry_or_default(record.training.clone()) += 1;
    }
    CompletionCounts(counts)
}
