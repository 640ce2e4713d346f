use triplet_core::TrialRecord;

/// Per-run record collection. Records are appended, enriched in place,
/// and read at export time; nothing is ever removed.
pub trait RecordSink {
    fn push(&mut self, record: TrialRecord);
    fn records(&self) -> &[TrialRecord];
    fn last_mut(&mut self) -> Option<&mut TrialRecord>;

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TrialRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn push(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    fn last_mut(&mut self) -> Option<&mut TrialRecord> {
        self.records.last_mut()
    }
}
