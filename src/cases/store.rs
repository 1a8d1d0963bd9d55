use super::CaseRecord;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Diagnoses kept for follow-up chat, for the lifetime of the process.
#[derive(Debug, Default)]
pub struct CaseStore {
    cases: Mutex<HashMap<String, CaseRecord>>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, replacing any earlier record for the same case.
    pub fn insert(&self, record: CaseRecord) -> Result<()> {
        let mut cases = self
            .cases
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;

        debug!(case_id = %record.case_id, "Caching case record");
        cases.insert(record.case_id.clone(), record);
        Ok(())
    }

    pub fn get(&self, case_id: &str) -> Result<Option<CaseRecord>> {
        let cases = self
            .cases
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;
        Ok(cases.get(case_id).cloned())
    }

    pub fn contains(&self, case_id: &str) -> Result<bool> {
        Ok(self.get(case_id)?.is_some())
    }

    pub fn len(&self) -> Result<usize> {
        let cases = self
            .cases
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;
        Ok(cases.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
