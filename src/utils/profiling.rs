use std::time::{Duration, Instant};

/// Timing and workload counters gathered during one simulation step.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfile {
    pub constraint_time: Duration,
    pub integration_time: Duration,
    pub narrow_phase_time: Duration,
    pub total_time: Duration,

    pub body_count: usize,
    pub constraint_count: usize,
    pub contacts_recorded: usize,
    /// Triangles handed to the exact sphere/triangle test after octree culling.
    pub triangles_tested: usize,
}

impl StepProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the whole step took longer than `budget`.
    pub fn exceeds(&self, budget: Duration) -> bool {
        self.total_time > budget
    }

    /// Logs a warning when the step overran a fixed time step of
    /// `time_step` seconds. Returns whether it did.
    pub fn warn_if_over_budget(&self, time_step: f32) -> bool {
        let budget = Duration::try_from_secs_f32(time_step).unwrap_or(Duration::MAX);
        if !self.exceeds(budget) {
            return false;
        }
        log::warn!(
            "step exceeded budget: {:.2} ms > {:.2} ms ({} bodies, {} triangles tested)",
            self.total_time.as_secs_f32() * 1000.0,
            budget.as_secs_f32() * 1000.0,
            self.body_count,
            self.triangles_tested
        );
        true
    }

    pub fn report(&self) {
        let total_us = self.total_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "step: {} bodies, {} constraints, {} contacts, {} triangles tested, {:.3} ms total \
             (constraints {:.1}%, integration {:.1}%, narrow phase {:.1}%)",
            self.body_count,
            self.constraint_count,
            self.contacts_recorded,
            self.triangles_tested,
            self.total_time.as_secs_f32() * 1000.0,
            share(self.constraint_time, total_us),
            share(self.integration_time, total_us),
            share(self.narrow_phase_time, total_us),
        );
    }
}

fn share(stage: Duration, total_us: f32) -> f32 {
    (stage.as_micros() as f32 / total_us) * 100.0
}

/// Adds the lifetime of the guard to the referenced duration and traces the
/// stage's start and end.
pub struct StageTimer<'a> {
    stage: &'static str,
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> StageTimer<'a> {
    pub fn new(stage: &'static str, output: &'a mut Duration) -> Self {
        log::trace!("start {stage}");
        Self {
            stage,
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for StageTimer<'a> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.output += elapsed;
        log::trace!("end {} ({} µs)", self.stage, elapsed.as_micros());
    }
}
