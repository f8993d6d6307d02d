use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;
use sysinfo::System;

use crate::ui::table::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Cpu,
    Mem,
}

/// Table columns in removal-priority order; Command is primary and is
/// rendered first.
pub const COLUMNS: [Column; 4] = [
    Column {
        name: "Memory %",
        is_primary: false,
    },
    Column {
        name: "CPU %",
        is_primary: false,
    },
    Column {
        name: "Count",
        is_primary: false,
    },
    Column {
        name: "Command",
        is_primary: true,
    },
];

#[derive(Default)]
struct Aggregate {
    cpu: f64,
    memory: u64,
    count: u32,
}

/// The process table's row source: processes aggregated by command name,
/// sorted by the active key. Polled every second.
pub struct ProcessSensor {
    sort: SortKey,
    rows: Vec<Vec<String>>,
    initialized: bool,
}

impl ProcessSensor {
    pub const TITLE: &'static str = "Process List";

    pub fn new() -> Self {
        Self {
            sort: SortKey::Cpu,
            rows: Vec::new(),
            initialized: false,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(1000)
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Cell text per row, parallel to COLUMNS.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn poll(&mut self, system: &mut System) {
        system.refresh_processes();
        let total_memory = system.total_memory();

        let mut aggregated: HashMap<&str, Aggregate> = HashMap::new();
        for process in system.processes().values() {
            let entry = aggregated.entry(process.name()).or_default();
            entry.cpu += process.cpu_usage() as f64;
            entry.memory += process.memory();
            entry.count += 1;
        }
        if aggregated.is_empty() {
            return;
        }

        let mut entries: Vec<(String, Aggregate)> = aggregated
            .into_iter()
            .map(|(name, aggregate)| (name.to_string(), aggregate))
            .collect();
        match self.sort {
            SortKey::Cpu => entries.sort_by(|a, b| {
                b.1.cpu
                    .partial_cmp(&a.1.cpu)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            }),
            SortKey::Mem => entries.sort_by(|a, b| {
                b.1.memory.cmp(&a.1.memory).then_with(|| a.0.cmp(&b.0))
            }),
        }

        self.rows = entries
            .into_iter()
            .map(|(name, aggregate)| {
                let memory_percent = if total_memory > 0 {
                    aggregate.memory as f64 / total_memory as f64 * 100.0
                } else {
                    0.0
                };
                vec![
                    format!("{:.1}", memory_percent),
                    format!("{:.1}", aggregate.cpu),
                    aggregate.count.to_string(),
                    name,
                ]
            })
            .collect();
        self.initialized = true;
    }
}

impl Default for ProcessSensor {
    fn default() -> Self {
        Self::new()
    }
}
