use std::time::{Duration, Instant};

use crate::monitor::MetricKind;

/// Table content stays frozen this long after the latest navigation key.
pub const SUPPRESS_FOR: Duration = Duration::from_millis(1000);
/// Delay before the selection snaps to the top after a sort change, long
/// enough for one repaint to land first.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);
/// Cadence of repeat upgrade probes.
pub const UPGRADE_RECHECK: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
struct PeriodicTimer {
    every: Duration,
    at: Instant,
}

impl PeriodicTimer {
    fn new(now: Instant, every: Duration) -> Self {
        Self { every, at: now }
    }

    fn due(&mut self, now: Instant) -> bool {
        if now >= self.at {
            self.at = now + self.every;
            true
        } else {
            false
        }
    }
}

/// The full deadline set driving the application: the redraw cadence, one
/// poll cadence per sensor, the restartable navigation-suppression window,
/// the post-sort selection settle, the periodic upgrade probe and the
/// optional quit-after deadline. All of it lives in one place so that
/// cancellation before quit or upgrade handoff is a single idempotent call.
#[derive(Debug)]
pub struct Scheduler {
    redraw: PeriodicTimer,
    polls: Vec<(MetricKind, PeriodicTimer)>,
    upgrade_check: Option<PeriodicTimer>,
    suppress_until: Option<Instant>,
    settle_at: Option<Instant>,
    quit_at: Option<Instant>,
    cancelled: bool,
}

impl Scheduler {
    pub fn new(
        now: Instant,
        redraw_every: Duration,
        poll_intervals: &[(MetricKind, Duration)],
        upgrade_checks: bool,
        quit_after: Option<Duration>,
    ) -> Self {
        Self {
            redraw: PeriodicTimer::new(now, redraw_every),
            polls: poll_intervals
                .iter()
                .map(|(kind, every)| (*kind, PeriodicTimer::new(now + *every, *every)))
                .collect(),
            upgrade_check: upgrade_checks
                .then(|| PeriodicTimer::new(now + UPGRADE_RECHECK, UPGRADE_RECHECK)),
            suppress_until: None,
            settle_at: None,
            quit_at: quit_after.map(|after| now + after),
            cancelled: false,
        }
    }

    pub fn redraw_due(&mut self, now: Instant) -> bool {
        !self.cancelled && self.redraw.due(now)
    }

    pub fn poll_due(&mut self, kind: MetricKind, now: Instant) -> bool {
        if self.cancelled {
            return false;
        }
        self.polls
            .iter_mut()
            .find(|(poll_kind, _)| *poll_kind == kind)
            .map_or(false, |(_, timer)| timer.due(now))
    }

    pub fn upgrade_check_due(&mut self, now: Instant) -> bool {
        if self.cancelled {
            return false;
        }
        self.upgrade_check
            .as_mut()
            .map_or(false, |timer| timer.due(now))
    }

    /// (Re)starts the suppression window from `now`; each navigation key
    /// pushes the deadline out rather than stacking a second timer.
    pub fn suppress_nav(&mut self, now: Instant) {
        if !self.cancelled {
            self.suppress_until = Some(now + SUPPRESS_FOR);
        }
    }

    pub fn table_suppressed(&self, now: Instant) -> bool {
        self.suppress_until.map_or(false, |until| now < until)
    }

    pub fn schedule_selection_reset(&mut self, now: Instant) {
        if !self.cancelled {
            self.settle_at = Some(now + SETTLE_DELAY);
        }
    }

    pub fn selection_reset_due(&mut self, now: Instant) -> bool {
        if self.cancelled {
            return false;
        }
        match self.settle_at {
            Some(at) if now >= at => {
                self.settle_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn quit_due(&self, now: Instant) -> bool {
        !self.cancelled && self.quit_at.map_or(false, |at| now >= at)
    }

    /// The earliest pending deadline, used to bound the event wait so the
    /// loop wakes exactly when there is work.
    pub fn next_deadline(&self, _now: Instant) -> Option<Instant> {
        if self.cancelled {
            return None;
        }
        let mut next = Some(self.redraw.at);
        let mut consider = |candidate: Option<Instant>| {
            if let Some(at) = candidate {
                next = Some(next.map_or(at, |current| current.min(at)));
            }
        };
        for (_, timer) in &self.polls {
            consider(Some(timer.at));
        }
        consider(self.upgrade_check.map(|timer| timer.at));
        consider(self.settle_at);
        consider(self.quit_at);
        next
    }

    /// Stops every timer at once. Safe to call more than once; nothing
    /// fires after this.
    pub fn cancel_all(&mut self) {
        self.cancelled = true;
        self.suppress_until = None;
        self.settle_at = None;
        self.quit_at = None;
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(now: Instant) -> Scheduler {
        Scheduler::new(
            now,
            Duration::from_millis(100),
            &[(MetricKind::Load, Duration::from_millis(200))],
            false,
            None,
        )
    }

    #[test]
    fn test_suppression_restarts_from_latest_key() {
        let t0 = Instant::now();
        let mut scheduler = scheduler(t0);

        scheduler.suppress_nav(t0);
        scheduler.suppress_nav(t0 + Duration::from_millis(900));

        assert!(scheduler.table_suppressed(t0 + Duration::from_millis(1500)));
        assert!(scheduler.table_suppressed(t0 + Duration::from_millis(1899)));
        assert!(!scheduler.table_suppressed(t0 + Duration::from_millis(1900)));
    }

    #[test]
    fn test_redraw_fires_then_reschedules() {
        let t0 = Instant::now();
        let mut scheduler = scheduler(t0);

        assert!(scheduler.redraw_due(t0));
        assert!(!scheduler.redraw_due(t0 + Duration::from_millis(50)));
        assert!(scheduler.redraw_due(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_poll_waits_a_full_interval_first() {
        let t0 = Instant::now();
        let mut scheduler = scheduler(t0);

        assert!(!scheduler.poll_due(MetricKind::Load, t0));
        assert!(scheduler.poll_due(MetricKind::Load, t0 + Duration::from_millis(200)));
        assert!(!scheduler.poll_due(MetricKind::Memory, t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_selection_reset_fires_once() {
        let t0 = Instant::now();
        let mut scheduler = scheduler(t0);

        scheduler.schedule_selection_reset(t0);
        assert!(!scheduler.selection_reset_due(t0 + Duration::from_millis(100)));
        assert!(scheduler.selection_reset_due(t0 + Duration::from_millis(200)));
        assert!(!scheduler.selection_reset_due(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_cancel_all_is_idempotent_and_final() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new(
            t0,
            Duration::from_millis(100),
            &[(MetricKind::Load, Duration::from_millis(200))],
            true,
            Some(Duration::from_secs(1)),
        );

        scheduler.suppress_nav(t0);
        scheduler.schedule_selection_reset(t0);
        scheduler.cancel_all();
        scheduler.cancel_all();

        let later = t0 + Duration::from_secs(600);
        assert!(!scheduler.redraw_due(later));
        assert!(!scheduler.poll_due(MetricKind::Load, later));
        assert!(!scheduler.upgrade_check_due(later));
        assert!(!scheduler.selection_reset_due(later));
        assert!(!scheduler.table_suppressed(t0));
        assert!(!scheduler.quit_due(later));
        assert!(scheduler.next_deadline(later).is_none());
    }

    #[test]
    fn test_quit_after_deadline() {
        let t0 = Instant::now();
        let scheduler = Scheduler::new(
            t0,
            Duration::from_millis(100),
            &[],
            false,
            Some(Duration::from_secs(2)),
        );
        assert!(!scheduler.quit_due(t0 + Duration::from_secs(1)));
        assert!(scheduler.quit_due(t0 + Duration::from_secs(2)));
    }
}
