use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::process::{CpuUsage, Pid, ProcessRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    #[default]
    Memory,
    Cpu,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            SortKey::Memory => SortKey::Cpu,
            SortKey::Cpu => SortKey::Name,
            SortKey::Name => SortKey::Memory,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Memory => "Memory",
            SortKey::Cpu => "CPU",
            SortKey::Name => "Name",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "memory" | "mem" => Ok(SortKey::Memory),
            "cpu" => Ok(SortKey::Cpu),
            other => Err(format!("unknown sort key `{other}` (expected name, memory or cpu)")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Processes sharing one executable name. Never empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessGroup {
    name: String,
    instances: Vec<ProcessRecord>,
    total_memory_mb: u64,
    avg_cpu: CpuUsage,
    #[serde(skip)]
    cpu_sum: f64,
    #[serde(skip)]
    cpu_samples: usize,
}

impl ProcessGroup {
    pub fn new(first: ProcessRecord) -> Self {
        let mut group = Self {
            name: first.name.clone(),
            instances: Vec::new(),
            total_memory_mb: 0,
            avg_cpu: CpuUsage::Unavailable,
            cpu_sum: 0.0,
            cpu_samples: 0,
        };
        group.push(first);
        group
    }

    /// Adds an instance, keeping the totals and mean current.
    pub fn push(&mut self, record: ProcessRecord) {
        debug_assert_eq!(record.name, self.name);
        self.total_memory_mb += record.memory_mb.unwrap_or(0);
        if let CpuUsage::Estimate(value) = record.cpu {
            self.cpu_sum += f64::from(value);
            self.cpu_samples += 1;
            self.avg_cpu = CpuUsage::Estimate((self.cpu_sum / self.cpu_samples as f64) as f32);
        }
        self.instances.push(record);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instances in discovery order.
    pub fn instances(&self) -> &[ProcessRecord] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn total_memory_mb(&self) -> u64 {
        self.total_memory_mb
    }

    pub fn avg_cpu(&self) -> CpuUsage {
        self.avg_cpu
    }

    pub fn single_pid(&self) -> Option<Pid> {
        match self.instances.as_slice() {
            [only] => Some(only.pid),
            _ => None,
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn matches_filter(&self, filter: &str) -> bool {
        filter.is_empty() || self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// Partitions `records` by name and orders the groups by `sort`.
///
/// Groups are first built in first-seen order; all sorts are stable, so
/// groups that compare equal keep that order.
pub fn group_processes(records: &[ProcessRecord], sort: SortKey) -> Vec<ProcessGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ProcessGroup> = Vec::new();

    for record in records {
        match index.get(record.name.as_str()) {
            Some(&i) => groups[i].push(record.clone()),
            None => {
                index.insert(record.name.as_str(), groups.len());
                groups.push(ProcessGroup::new(record.clone()));
            }
        }
    }

    sort_groups(&mut groups, sort);
    groups
}

pub fn sort_groups(groups: &mut [ProcessGroup], sort: SortKey) {
    match sort {
        SortKey::Name => groups.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Memory => groups.sort_by(|a, b| b.total_memory_mb.cmp(&a.total_memory_mb)),
        SortKey::Cpu => groups.sort_by(|a, b| cmp_cpu_desc(a.avg_cpu, b.avg_cpu)),
    }
}

/// Descending, with groups lacking an estimate after all that have one.
fn cmp_cpu_desc(a: CpuUsage, b: CpuUsage) -> Ordering {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, pid: Pid, memory_mb: u64, cpu: Option<f32>) -> ProcessRecord {
        ProcessRecord {
            name: name.to_string(),
            pid,
            memory_mb: Some(memory_mb),
            cpu: cpu.map_or(CpuUsage::Unavailable, CpuUsage::Estimate),
        }
    }

    #[test]
    fn sort_key_cycles_through_all_variants() {
        let key = SortKey::Memory;
        assert_eq!(key.next(), SortKey::Cpu);
        assert_eq!(key.next().next(), SortKey::Name);
        assert_eq!(key.next().next().next(), SortKey::Memory);
    }

    #[test]
    fn sort_key_parses_config_strings() {
        assert_eq!(SortKey::from_str_config("CPU"), SortKey::Cpu);
        assert_eq!(SortKey::from_str_config("name"), SortKey::Name);
        assert_eq!(SortKey::from_str_config("bogus"), SortKey::Memory);
        assert!("bogus".parse::<SortKey>().is_err());
    }

    #[test]
    fn running_mean_is_current_after_each_push() {
        let mut group = ProcessGroup::new(record("chrome", 1, 10, Some(2.0)));
        assert_eq!(group.avg_cpu(), CpuUsage::Estimate(2.0));
        group.push(record("chrome", 2, 20, Some(4.0)));
        assert_eq!(group.avg_cpu(), CpuUsage::Estimate(3.0));
        group.push(record("chrome", 3, 30, None));
        assert_eq!(group.avg_cpu(), CpuUsage::Estimate(3.0));
        group.push(record("chrome", 4, 40, Some(9.0)));
        assert_eq!(group.avg_cpu(), CpuUsage::Estimate(5.0));
        assert_eq!(group.total_memory_mb(), 100);
        assert_eq!(group.instance_count(), 4);
    }

    #[test]
    fn group_without_estimates_reports_unavailable() {
        let group = ProcessGroup::new(ProcessRecord::basic("init", 1));
        assert_eq!(group.avg_cpu(), CpuUsage::Unavailable);
        assert_eq!(group.total_memory_mb(), 0);
        assert_eq!(group.single_pid(), Some(1));
    }

    #[test]
    fn memory_sort_is_descending_and_stable() {
        let records = vec![
            record("a", 1, 5, None),
            record("b", 2, 50, None),
            record("c", 3, 5, None),
            record("d", 4, 20, None),
        ];
        let names: Vec<String> = group_processes(&records, SortKey::Memory)
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn cpu_sort_puts_unavailable_last() {
        let records = vec![
            record("idle", 1, 1, None),
            record("busy", 2, 1, Some(80.0)),
            record("calm", 3, 1, Some(0.5)),
        ];
        let names: Vec<String> = group_processes(&records, SortKey::Cpu)
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["busy", "calm", "idle"]);
    }

    #[test]
    fn cpu_sort_keeps_first_seen_order_on_ties() {
        let records = vec![
            record("b", 1, 1, Some(2.0)),
            record("none2", 2, 1, None),
            record("a", 3, 1, Some(2.0)),
            record("none1", 4, 1, None),
            record("c", 5, 1, Some(2.0)),
        ];
        let names: Vec<String> = group_processes(&records, SortKey::Cpu)
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a", "c", "none2", "none1"]);
    }

    #[test]
    fn cpu_sort_without_any_estimates_is_a_no_op() {
        let records = vec![
            ProcessRecord::basic("zsh", 1),
            ProcessRecord::basic("init", 2),
            ProcessRecord::basic("cron", 3),
        ];
        let names: Vec<String> = group_processes(&records, SortKey::Cpu)
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["zsh", "init", "cron"]);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let group = ProcessGroup::new(ProcessRecord::basic("Chrome.exe", 9));
        assert!(group.matches_filter("chrome"));
        assert!(group.matches_filter(""));
        assert!(!group.matches_filter("firefox"));
    }
}
