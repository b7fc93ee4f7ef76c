use serde::Serialize;

pub type Pid = u32;

/// CPU figure attached to a record or group.
///
/// Nothing in this crate samples CPU time. `Estimate` carries whatever the
/// platform listing command reports (on Unix, `ps` computes a lifetime
/// average), so it must always be presented as approximate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum CpuUsage {
    #[default]
    Unavailable,
    Estimate(f32),
}

impl CpuUsage {
    pub fn value(self) -> Option<f32> {
        match self {
            CpuUsage::Estimate(v) => Some(v),
            CpuUsage::Unavailable => None,
        }
    }
}

/// One observed OS process at snapshot time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub name: String,
    pub pid: Pid,
    /// Whole megabytes, only filled by the detailed listing.
    pub memory_mb: Option<u64>,
    pub cpu: CpuUsage,
}

impl ProcessRecord {
    pub fn basic(name: impl Into<String>, pid: Pid) -> Self {
        Self {
            name: name.into(),
            pid,
            memory_mb: None,
            cpu: CpuUsage::Unavailable,
        }
    }
}
