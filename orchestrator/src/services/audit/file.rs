use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use orchestrator_core::audit::AuditRecord;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::AuditSink;

/// Appends one JSON document per line. The file is opened in append mode
/// and never truncated.
pub struct FileAuditSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditSink {
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open audit log {}", path.display()))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append(&self, record: &AuditRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::audit::AuditResult;
    use orchestrator_core::identity::UserId;
    use orchestrator_core::tenant::TenantId;

    fn record(action: &str) -> AuditRecord {
        AuditRecord::new(
            TenantId::new("lycee-hugo"),
            UserId::new("u-7"),
            action,
            "assignments",
            AuditResult::Denied,
        )
    }

    #[tokio::test]
    async fn test_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit/audit.jsonl");

        let sink = FileAuditSink::open(&path).await.unwrap();
        sink.append(&record("assignments:update")).await.unwrap();
        sink.append(&record("assignments:delete")).await.unwrap();

        let content = tokio::fs::read_to_string(sink.path()).await.unwrap();
        let lines: Vec<AuditRecord> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].action_type, "assignments:update");
        assert_eq!(lines[1].action_type, "assignments:delete");
    }

    #[tokio::test]
    async fn test_reopening_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        FileAuditSink::open(&path)
            .await
            .unwrap()
            .append(&record("students:create"))
            .await
            .unwrap();
        FileAuditSink::open(&path)
            .await
            .unwrap()
            .append(&record("classes:create"))
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
