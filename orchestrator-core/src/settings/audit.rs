use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditSinkKind {
    /// Keep the most recent records in process memory.
    #[default]
    Memory,
    /// Append JSON lines to `audit.path`.
    File,
}

pub const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

fn default_memory_capacity() -> usize {
    DEFAULT_MEMORY_CAPACITY
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditSettings {
    #[serde(default)]
    pub sink: AuditSinkKind,
    #[serde(default)]
    pub path: Option<String>,
    /// Records kept by the memory sink before the oldest are dropped.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            sink: AuditSinkKind::default(),
            path: None,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}
