use std::time::Duration;
use sysinfo::System;

use crate::monitor::MetricSample;

/// Overall CPU usage across all cores, polled every 200ms.
pub struct LoadSensor {
    current: MetricSample,
    initialized: bool,
}

impl LoadSensor {
    pub const TITLE: &'static str = "CPU Usage";

    pub fn new() -> Self {
        Self {
            current: 0.0,
            initialized: false,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(200)
    }

    pub fn poll(&mut self, system: &mut System) {
        system.refresh_cpu();
        let cpus = system.cpus();
        if cpus.is_empty() {
            return;
        }
        let total: f64 = cpus.iter().map(|cpu| cpu.cpu_usage() as f64).sum();
        self.current = (total / cpus.len() as f64).clamp(0.0, 100.0);
        self.initialized = true;
    }

    pub fn current_value(&self) -> MetricSample {
        self.current
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for LoadSensor {
    fn default() -> Self {
        Self::new()
    }
}
