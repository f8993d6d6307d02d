pub mod load;
pub mod memory;
pub mod process;

pub use load::LoadSensor;
pub use memory::MemorySensor;
pub use process::{ProcessSensor, SortKey};

use std::time::Duration;
use sysinfo::System;

/// A single chart sample: a percentage in [0, 100].
pub type MetricSample = f64;

/// Static registry of the metrics this monitor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Load,
    Memory,
    Process,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Load, MetricKind::Memory, MetricKind::Process];
}

/// Owns the one sysinfo handle plus the three sensors fed from it. Each
/// sensor refreshes only its slice of the system state and keeps its
/// last-known-good reading when a refresh yields nothing.
pub struct SystemMonitor {
    system: System,
    pub load: LoadSensor,
    pub memory: MemorySensor,
    pub process: ProcessSensor,
}

impl SystemMonitor {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
            load: LoadSensor::new(),
            memory: MemorySensor::new(),
            process: ProcessSensor::new(),
        }
    }

    pub fn poll(&mut self, kind: MetricKind) {
        match kind {
            MetricKind::Load => self.load.poll(&mut self.system),
            MetricKind::Memory => self.memory.poll(&mut self.system),
            MetricKind::Process => self.process.poll(&mut self.system),
        }
    }

    pub fn poll_all(&mut self) {
        for kind in MetricKind::ALL {
            self.poll(kind);
        }
    }

    pub fn poll_interval(&self, kind: MetricKind) -> Duration {
        match kind {
            MetricKind::Load => self.load.poll_interval(),
            MetricKind::Memory => self.memory.poll_interval(),
            MetricKind::Process => self.process.poll_interval(),
        }
    }

    pub fn load_average(&self) -> (f64, f64, f64) {
        let avg = System::load_average();
        (avg.one, avg.five, avg.fifteen)
    }

    pub fn hostname() -> String {
        System::host_name().unwrap_or_else(|| "unknown".to_string())
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}
