//! Append-only audit trail.
//!
//! Recording never fails the request that produced the record: sink errors
//! are reported through `tracing` and otherwise swallowed.

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use orchestrator_core::audit::AuditRecord;
use orchestrator_core::settings::audit::{AuditSettings, AuditSinkKind};
use tracing::{error, info};

pub use file::FileAuditSink;
pub use memory::MemoryAuditSink;

/// Destination for audit records. Implementations only ever append.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: &AuditRecord) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
}

impl AuditLogger {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Build the sink selected in the settings.
    pub async fn from_settings(settings: &AuditSettings) -> anyhow::Result<Self> {
        let sink: Arc<dyn AuditSink> = match settings.sink {
            AuditSinkKind::Memory => {
                info!(
                    "Audit records are kept in memory (last {})",
                    settings.memory_capacity
                );
                Arc::new(MemoryAuditSink::with_capacity(settings.memory_capacity))
            }
            AuditSinkKind::File => {
                let path = settings
                    .path
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("audit.path is required for the file sink"))?;
                info!("Audit records are appended to {}", path);
                Arc::new(FileAuditSink::open(path).await?)
            }
        };
        Ok(Self::new(sink))
    }

    pub async fn record(&self, record: AuditRecord) {
        if let Err(e) = self.sink.append(&record).await {
            error!(
                audit_id = %record.id,
                tenant_id = %record.tenant_id,
                action_type = %record.action_type,
                "Failed to persist audit record: {:#}",
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::audit::AuditResult;
    use orchestrator_core::identity::UserId;
    use orchestrator_core::tenant::TenantId;

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn append(&self, _record: &AuditRecord) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn record() -> AuditRecord {
        AuditRecord::new(
            TenantId::new("lycee-hugo"),
            UserId::new("u-1"),
            "students:create",
            "students",
            AuditResult::Denied,
        )
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_reach_the_caller() {
        let logger = AuditLogger::new(Arc::new(FailingSink));
        // Completes without panicking or returning an error.
        logger.record(record()).await;
    }

    #[tokio::test]
    async fn test_records_reach_the_sink() {
        let sink = Arc::new(MemoryAuditSink::default());
        let logger = AuditLogger::new(sink.clone());
        logger.record(record()).await;
        logger.record(record()).await;
        assert_eq!(sink.records().await.len(), 2);
    }
}
