//! Animation scheduler
//!
//! Provides portable frame pacing without async/await or platform-specific
//! timers. The caller is responsible for sleeping between ticks, using the
//! returned [`FrameResult`].
//!
//! ```ignore
//! let mut scheduler = AnimationScheduler::new(&ARBITER, pwm);
//! scheduler.start();
//!
//! loop {
//!     let now = Instant::from_millis(get_current_time_ms());
//!     let sleep = match scheduler.tick(now) {
//!         Ok(result) => result.sleep_duration,
//!         // Output failures are retried on the next tick
//!         Err(_) => scheduler.frame_duration(),
//!     };
//!     sleep_ms(sleep.as_millis());
//! }
//! ```

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::PwmOutput;
use crate::arbiter::{ArbiterState, ModeArbiter};
use crate::color::ChannelQuad;
use crate::effect::{EffectRng, EffectSlot};
use crate::error::{OutputError, TickError};
use crate::hardware::HardwareProfile;

const DEFAULT_SEED: u64 = 0x5eed_1ed5_c0de_f00d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// What a tick did to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduler is idle, no frame computed
    Stopped,
    /// A frame was computed and written
    Rendered(ChannelQuad),
    /// Automatic animation is paused, the hardware keeps its last values
    Held,
}

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    pub outcome: TickOutcome,
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Periodic driver that turns the arbiter state into hardware output.
///
/// Effect scratch state lives here and is rebuilt whenever the arbiter
/// reports a new effect epoch. A frame is computed on a copy of the scratch
/// state and only committed after the hardware write succeeded, so a failed
/// write is retried from the same state on the next tick.
pub struct AnimationScheduler<'a, O: PwmOutput> {
    arbiter: &'a ModeArbiter,
    output: O,
    state: SchedulerState,

    slot: EffectSlot,
    epoch: Option<u32>,
    effect_tick: u32,
    seed: u64,
    last_output: Option<ChannelQuad>,
    last_state: Option<ArbiterState>,
    /// Zero quad still owed to the output after a failed stop write
    blackout_pending: bool,

    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O: PwmOutput> AnimationScheduler<'a, O> {
    /// Create an idle scheduler using the hardware profile's frame period.
    pub fn new(arbiter: &'a ModeArbiter, output: O) -> Self {
        Self::with_frame_period(arbiter, output, HardwareProfile::FRAME_PERIOD)
    }

    /// Create an idle scheduler with custom frame period.
    pub fn with_frame_period(arbiter: &'a ModeArbiter, output: O, period: Duration) -> Self {
        Self {
            arbiter,
            output,
            state: SchedulerState::Idle,
            slot: EffectSlot::default(),
            epoch: None,
            effect_tick: 0,
            seed: DEFAULT_SEED,
            last_output: None,
            last_state: None,
            blackout_pending: false,
            next_frame: Instant::from_millis(0),
            frame_duration: period,
        }
    }

    /// Seed for the randomized effects
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start running. Does nothing if already running.
    pub fn start(&mut self) {
        if self.state == SchedulerState::Running {
            return;
        }
        self.state = SchedulerState::Running;
        // Force a fresh effect on the first tick
        self.epoch = None;
        // The first frame overwrites whatever a failed stop left behind
        self.blackout_pending = false;

        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationScheduler] started for {}: {}-bit at {}Hz, {}ms period",
            HardwareProfile::CHIP_NAME,
            crate::hardware::resolution_bits(self.output.max_duty()),
            HardwareProfile::PWM_FREQUENCY_HZ,
            self.frame_duration.as_millis()
        );
    }

    /// Stop running and switch the output off.
    ///
    /// If the zero write fails the scheduler is idle anyway and the blackout
    /// is retried by the next `stop` or `tick` until it lands. Once the
    /// output is dark, further calls do nothing.
    pub fn stop(&mut self) -> Result<(), OutputError> {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Idle;
            self.blackout_pending = true;

            #[cfg(feature = "esp32-log")]
            println!("[AnimationScheduler] stopped");
        }
        self.blackout()
    }

    fn blackout(&mut self) -> Result<(), OutputError> {
        if !self.blackout_pending {
            return Ok(());
        }
        if let Err(err) = self.output.write_quad(ChannelQuad::ZERO) {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationScheduler] blackout write failed: {}", err);
            return Err(err);
        }
        self.blackout_pending = false;
        self.last_output = Some(ChannelQuad::ZERO);
        Ok(())
    }

    /// Process one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again. On error the tick was skipped without touching
    /// effect state; call again on the next period. While idle, a tick only
    /// retries a pending blackout.
    pub fn tick(&mut self, now: Instant) -> Result<FrameResult, TickError> {
        // Drift correction: if we've fallen too far behind, reset to now
        let max_drift = Duration::from_ticks(self.frame_duration.as_ticks() * 2);
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }
        self.next_frame += self.frame_duration;

        let outcome = match self.state {
            SchedulerState::Idle => {
                self.blackout()?;
                TickOutcome::Stopped
            }
            SchedulerState::Running => self.run_frame()?,
        };

        Ok(FrameResult {
            outcome,
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        })
    }

    fn run_frame(&mut self) -> Result<TickOutcome, TickError> {
        let state = self.arbiter.state();
        self.last_state = Some(state);
        self.sync_effect(&state);

        // Static and Off always render so manual output stays live. Anything
        // else only runs when the arbiter allows automatic animation.
        let effect = state.config.current_effect;
        if !effect.is_manual_only() && !state.should_animate() {
            return Ok(TickOutcome::Held);
        }

        let mut next = self.slot.clone();
        let quad = next.compute(self.effect_tick, &state.config);

        if let Err(err) = self.output.write_quad(quad) {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationScheduler] output write failed: {}", err);
            return Err(err.into());
        }

        self.slot = next;
        self.effect_tick = self.effect_tick.wrapping_add(1);
        self.last_output = Some(quad);
        Ok(TickOutcome::Rendered(quad))
    }

    /// Rebuild effect scratch state when the arbiter switched effects
    fn sync_effect(&mut self, state: &ArbiterState) {
        let effect = state.config.current_effect;
        if self.epoch == Some(state.epoch) && self.slot.id() == effect {
            return;
        }
        let seed = EffectRng::mix(self.seed ^ u64::from(state.epoch));
        self.slot = effect.to_slot(seed);
        self.slot.reset();
        self.effect_tick = 0;
        self.epoch = Some(state.epoch);

        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationScheduler] effect switched to {} (epoch {})",
            effect.as_str(),
            state.epoch
        );
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Ticks computed for the current effect since it was switched in
    pub fn effect_tick(&self) -> u32 {
        self.effect_tick
    }

    /// Last quad successfully written to the output
    pub fn last_output(&self) -> Option<ChannelQuad> {
        self.last_output
    }

    /// Arbiter state the last running tick acted on
    pub fn last_state(&self) -> Option<ArbiterState> {
        self.last_state
    }

    /// Whether a zero write from `stop` is still outstanding
    pub fn blackout_pending(&self) -> bool {
        self.blackout_pending
    }

    /// Effect instance currently driving the output
    pub fn current_slot(&self) -> &EffectSlot {
        &self.slot
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
