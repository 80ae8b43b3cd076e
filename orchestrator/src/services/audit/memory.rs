use std::collections::VecDeque;

use async_trait::async_trait;
use orchestrator_core::audit::{AuditRecord, AuditResult};
use orchestrator_core::settings::audit::DEFAULT_MEMORY_CAPACITY;
use orchestrator_core::tenant::TenantId;
use tokio::sync::RwLock;

use super::AuditSink;

/// Keeps the most recent records in process memory, dropping the oldest
/// once `capacity` is reached. Meant for development and tests; use the file
/// sink for a durable trail.
#[derive(Debug)]
pub struct MemoryAuditSink {
    capacity: usize,
    records: RwLock<VecDeque<AuditRecord>>,
}

impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryAuditSink {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    pub async fn records_for(&self, tenant_id: &TenantId) -> Vec<AuditRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| &record.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    pub async fn denied(&self) -> Vec<AuditRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| record.result == AuditResult::Denied)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: &AuditRecord) -> anyhow::Result<()> {
        let mut records = self.records.write().await;
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
        Ok(())
    }
}
