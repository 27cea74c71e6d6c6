use crate::reconcile::BatchOutcome;

/// Running totals over every batch a client has applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetrics {
    pub batches_applied: u64,
    pub full_refreshes: u64,
    pub objects_upserted: u64,
    pub objects_patched: u64,
    pub objects_removed: u64,
    pub opaque_objects: u64,
    pub last_sequence: Option<i64>,
}

impl SessionMetrics {
    pub fn record(&mut self, outcome: &BatchOutcome, full_refresh: bool) {
        self.batches_applied += 1;
        if full_refresh {
            self.full_refreshes += 1;
        }
        self.objects_upserted += outcome.upserted as u64;
        self.objects_patched += outcome.patched as u64;
        self.objects_removed += outcome.removed as u64;
        self.opaque_objects += outcome.opaque as u64;
        self.last_sequence = outcome.sequence;
    }
}
