use crate::monitor::MetricSample;

/// Samples older than this many positions behind the newest are evicted.
pub const WINDOW_SIZE: usize = 5000;

/// Horizontal zoom applied to the charts. Always a power of two in
/// [0.125, 8]; values above 1 stretch the plotted window, values below 1
/// decimate it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const MIN: f64 = 0.125;
    pub const MAX: f64 = 8.0;

    pub fn new() -> Self {
        ScaleFactor(1.0)
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        if self.0 < Self::MAX {
            self.0 *= 2.0;
        }
    }

    pub fn zoom_out(&mut self) {
        if self.0 > Self::MIN {
            self.0 /= 2.0;
        }
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::new()
    }
}

/// A point selected for plotting: the logical index within the chart
/// window, its target x-coordinate and the contour value to draw there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub index: i64,
    pub x: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    position: u64,
    value: MetricSample,
}

/// Bounded per-metric time series. A fixed-capacity ring indexed by
/// `position % capacity`, each slot stamped with the position it holds so
/// stale entries read as gaps rather than wrong values.
#[derive(Debug, Clone)]
pub struct MetricSeriesStore {
    slots: Vec<Option<Slot>>,
    latest: Option<u64>,
}

impl MetricSeriesStore {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            latest: None,
        }
    }

    /// Stores `value` at `position`. Writing into the ring slot evicts
    /// whatever sample sat `capacity` positions behind.
    pub fn append(&mut self, position: u64, value: MetricSample) {
        let idx = position as usize % self.slots.len();
        self.slots[idx] = Some(Slot { position, value });
        if self.latest.map_or(true, |latest| position > latest) {
            self.latest = Some(position);
        }
    }

    /// The sample stored at `position`, if it has not been evicted.
    pub fn get(&self, position: u64) -> Option<MetricSample> {
        let slot = self.slots[position as usize % self.slots.len()]?;
        (slot.position == position).then_some(slot.value)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    /// Selects the points to plot for a chart `width` pixels wide at the
    /// given zoom. Below scale 1 only every `round(1/scale)`-th sample is
    /// kept. The newest sample maps to logical index `width - 1`; a point
    /// at index `p` lands at `x = p * scale + (1 - scale) * width` and
    /// carries its predecessor's value, so index 0 and 1 never start a
    /// line and gaps in the series draw nothing.
    pub fn windowed_view(&self, scale: ScaleFactor, width: usize) -> Vec<PlotPoint> {
        let Some(latest) = self.latest else {
            return Vec::new();
        };
        let scale = scale.get();
        let step = if scale < 1.0 {
            (1.0 / scale).round() as u64
        } else {
            1
        };

        let oldest = latest.saturating_sub(self.slots.len() as u64 - 1);
        let mut points = Vec::new();
        for position in oldest..=latest {
            if self.get(position).is_none() {
                continue;
            }
            if scale < 1.0 && position % step != 0 {
                continue;
            }
            let index = position as i64 + width as i64 - 1 - latest as i64;
            if index <= 1 {
                continue;
            }
            let Some(value) = position.checked_sub(1).and_then(|prev| self.get(prev)) else {
                continue;
            };
            points.push(PlotPoint {
                index,
                x: index as f64 * scale + (1.0 - scale) * width as f64,
                value,
            });
        }
        points
    }
}

impl Default for MetricSeriesStore {
    fn default() -> Self {
        Self::new()
    }
}
