//! Simulation driver
//!
//! Owns the state and the integrator and performs one step per frame until a
//! limit is hit: frame budget, wall-clock deadline, external cancellation or
//! every particle absorbed. Optional pacing sleeps out the rest of each frame
//! period. Everything runs on the caller's thread; only the [`CancelToken`]
//! may be shared.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use super::integrator::{GravityIntegrator, StepReport};
use super::states::SimulationState;

/// Cooperative stop flag, checked between frames
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bounds on a run. With every field `None` a run only ends through the
/// cancel token or depletion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunLimits {
    pub frames: Option<u64>,          // frame budget
    pub wall_clock: Option<Duration>, // deadline measured from the first step
    pub rate: Option<f64>,            // target frames per second for `run`
}

impl RunLimits {
    /// Minimum duration of one frame under pacing. Rates whose period does
    /// not fit in a `Duration` disable pacing.
    pub fn frame_period(&self) -> Option<Duration> {
        self.rate
            .filter(|hz| *hz > 0.0 && hz.is_finite())
            .and_then(|hz| Duration::try_from_secs_f64(1.0 / hz).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    FrameBudget,
    Deadline,
    Cancelled,
    Depleted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::FrameBudget => "frame budget exhausted",
            StopReason::Deadline => "wall-clock limit reached",
            StopReason::Cancelled => "cancelled",
            StopReason::Depleted => "all particles absorbed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped(StopReason),
}

pub struct Simulation<const D: usize> {
    pub state: SimulationState<D>,
    pub integrator: GravityIntegrator<D>,
    pub limits: RunLimits,
    cancel: CancelToken,
    run_state: RunState,
    frames: u64,
    started: Option<Instant>,
}

impl<const D: usize> Simulation<D> {
    pub fn new(state: SimulationState<D>, integrator: GravityIntegrator<D>, limits: RunLimits) -> Self {
        Self {
            state,
            integrator,
            limits,
            cancel: CancelToken::new(),
            run_state: RunState::Running,
            frames: 0,
            started: None,
        }
    }

    /// Handle that stops this simulation before its next frame
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Frames stepped so far by this driver
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn check_limits(&self) -> Option<StopReason> {
        if self.cancel.is_cancelled() {
            return Some(StopReason::Cancelled);
        }
        if let Some(budget) = self.limits.frames {
            if self.frames >= budget {
                return Some(StopReason::FrameBudget);
            }
        }
        if let (Some(limit), Some(started)) = (self.limits.wall_clock, self.started) {
            if started.elapsed() >= limit {
                return Some(StopReason::Deadline);
            }
        }
        if self.state.is_depleted() {
            return Some(StopReason::Depleted);
        }
        None
    }

    fn stop(&mut self, reason: StopReason) {
        info!(
            "simulation stopped after {} frames (t = {:.3}): {}",
            self.frames, self.state.t, reason
        );
        self.run_state = RunState::Stopped(reason);
    }

    /// Perform one frame, or report why the simulation has stopped.
    /// Stopping is terminal.
    pub fn advance(&mut self) -> Result<StepReport, StopReason> {
        if let RunState::Stopped(reason) = self.run_state {
            return Err(reason);
        }
        if let Some(reason) = self.check_limits() {
            self.stop(reason);
            return Err(reason);
        }

        self.started.get_or_insert_with(Instant::now);
        let report = self.integrator.step(&mut self.state);
        self.frames += 1;

        if report.absorbed > 0 {
            debug!(
                "frame {}: {} absorbed, {} still alive",
                self.frames,
                report.absorbed,
                self.state.alive_count()
            );
        }
        Ok(report)
    }

    /// Perform one frame. Returns `None` once the simulation has stopped.
    pub fn step(&mut self) -> Option<StepReport> {
        self.advance().ok()
    }

    /// Step until a limit stops the run, calling `observer` after every frame
    /// and pacing to `limits.rate` if set
    pub fn run<F>(&mut self, mut observer: F) -> StopReason
    where
        F: FnMut(&SimulationState<D>, &StepReport),
    {
        let period = self.limits.frame_period();
        loop {
            let frame_start = Instant::now();
            match self.advance() {
                Ok(report) => observer(&self.state, &report),
                Err(reason) => return reason,
            }
            if let Some(period) = period {
                // no wait if the step overran the frame
                if let Some(rest) = period.checked_sub(frame_start.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }
    }
}
