//! Signal controller: the tasks, the override handling and the shared state they drive.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::brightness::{BrightnessRange, BrightnessSource};
use crate::channel::IntentReceiver;
use crate::intent::SignalIntent;
use crate::light::{Light, LightStates};
use crate::mode::{Mode, Override, Overrides};
use crate::phase::{BLINK_WINDOW, ConfigError, Phase, PhaseDurations};
use crate::scheduler::{Iteration, Iterations, Scheduler, TaskSpec};
use crate::status::StatusRecord;
use crate::{BrightnessInput, OutputDriver, StatusSink};

/// Number of tasks the controller registers
pub const TASK_COUNT: usize = 5;

/// Tasks run by the controller, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// Reads the brightness input
    BrightnessSampling,
    /// Advances the traffic-light cycle
    PhaseCycle,
    /// Bounded burst blinking blue at the end of the blue phase
    BlueBlink,
    /// Blinks all lamps together while BlinkAll is set
    AllBlink,
    /// Emits the periodic status record
    StatusReport,
}

/// Periods of the controller tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTimings {
    pub brightness_sampling: Duration,
    /// Must be shorter than [`BLINK_WINDOW`] so every cycle hits the blink tail
    pub phase: Duration,
    /// Spacing of the blue blink toggles
    pub blue_blink: Duration,
    /// Number of blue blink toggles per burst
    pub blue_blink_toggles: u32,
    pub all_blink: Duration,
    pub status: Duration,
}

impl TaskTimings {
    pub const DEFAULT: Self = Self {
        brightness_sampling: Duration::from_millis(10),
        phase: Duration::from_millis(500),
        blue_blink: Duration::from_millis(167),
        blue_blink_toggles: 6,
        all_blink: Duration::from_millis(500),
        status: Duration::from_millis(100),
    };
}

impl Default for TaskTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for the signal controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalConfig {
    pub durations: PhaseDurations,
    pub timings: TaskTimings,
    pub brightness: BrightnessRange,
    /// Brightness used until the first sample
    pub initial_brightness: u8,
}

impl SignalConfig {
    pub const DEFAULT: Self = Self {
        durations: PhaseDurations::DEFAULT,
        timings: TaskTimings::DEFAULT,
        brightness: BrightnessRange::DEFAULT,
        initial_brightness: 255,
    };
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State shared by the cycle, the override handlers and the status reporter
#[derive(Debug, Clone)]
pub struct SignalState {
    overrides: Overrides,
    mode: Mode,
    lights: LightStates,
    cycle_start: Instant,
    blue_blink_started: bool,
    blue_blink_on: bool,
    all_blink_on: bool,
}

impl SignalState {
    const fn new(now: Instant) -> Self {
        Self {
            overrides: Overrides::NONE,
            mode: Mode::Normal,
            lights: LightStates::OFF,
            cycle_start: now,
            blue_blink_started: false,
            blue_blink_on: true,
            all_blink_on: false,
        }
    }

    pub const fn overrides(&self) -> Overrides {
        self.overrides
    }

    /// Label of the most recently toggled override
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Lamp flags as last written to the outputs
    pub const fn lights(&self) -> LightStates {
        self.lights
    }

    pub const fn cycle_start(&self) -> Instant {
        self.cycle_start
    }

    /// The blink tail of the current cycle has been entered
    pub const fn blue_blink_started(&self) -> bool {
        self.blue_blink_started
    }
}

/// Everything the tasks touch, apart from the scheduler itself
struct SignalCore<O, B, S> {
    output: O,
    input: B,
    status: S,
    brightness: BrightnessSource,
    durations: PhaseDurations,
    state: SignalState,
}

impl<O: OutputDriver, B: BrightnessInput, S: StatusSink> SignalCore<O, B, S> {
    fn run_task(
        &mut self,
        scheduler: &mut Scheduler<TaskId, TASK_COUNT>,
        task: TaskId,
        iteration: Iteration,
        now: Instant,
    ) {
        match task {
            TaskId::BrightnessSampling => {
                let raw = self.input.read();
                self.brightness.sample(raw);
            }
            TaskId::PhaseCycle => self.advance_cycle(scheduler, now),
            TaskId::BlueBlink => self.blink_blue(iteration),
            TaskId::AllBlink => self.blink_all(),
            TaskId::StatusReport => self.report(),
        }
    }

    /// Phase cycle task
    fn advance_cycle(&mut self, scheduler: &mut Scheduler<TaskId, TASK_COUNT>, now: Instant) {
        if self.state.overrides.is_any() {
            return;
        }

        let elapsed = now.saturating_duration_since(self.state.cycle_start);
        let phase = match Phase::at(elapsed, &self.durations) {
            Some(phase) => phase,
            None => {
                self.state.cycle_start = now;
                #[cfg(feature = "esp32-log")]
                println!("[SignalController] cycle restart");
                // Validated durations always leave a non-empty cycle
                Phase::at(Duration::from_millis(0), &self.durations).unwrap_or(Phase::Red)
            }
        };

        if phase == Phase::BlueBlink {
            if !self.state.blue_blink_started {
                self.state.blue_blink_started = true;
                #[cfg(feature = "esp32-log")]
                println!("[SignalController] blue blink burst");
                scheduler.restart(TaskId::BlueBlink);
            }
        } else {
            self.drive(LightStates::only(phase.light()));
            self.state.blue_blink_started = false;
        }

        self.report();
    }

    /// Blue blink burst task
    fn blink_blue(&mut self, iteration: Iteration) {
        self.state.blue_blink_on = !self.state.blue_blink_on;
        self.set_light(Light::Blue, self.state.blue_blink_on);

        if iteration.last {
            self.set_light(Light::Blue, true);
        }
    }

    /// All-lamps blink task
    fn blink_all(&mut self) {
        if !self.state.overrides.is_set(Override::BlinkAll) {
            return;
        }
        self.state.all_blink_on = !self.state.all_blink_on;
        let lights = if self.state.all_blink_on {
            LightStates::ALL
        } else {
            LightStates::OFF
        };
        self.drive(lights);
    }

    /// Apply one intent from the channel
    fn apply(
        &mut self,
        scheduler: &mut Scheduler<TaskId, TASK_COUNT>,
        intent: SignalIntent,
        now: Instant,
    ) {
        match intent {
            SignalIntent::Toggle(which) => self.toggle(scheduler, which, now),
            SignalIntent::Durations(durations) => {
                #[cfg(feature = "esp32-log")]
                println!("[SignalController] durations {:?}", durations);
                self.durations = durations;
            }
        }
    }

    /// Flip an override, report, then apply its side effects
    fn toggle(
        &mut self,
        scheduler: &mut Scheduler<TaskId, TASK_COUNT>,
        which: Override,
        now: Instant,
    ) {
        let active = self.state.overrides.toggle(which);
        self.state.mode = if active { which.mode() } else { Mode::Normal };
        #[cfg(feature = "esp32-log")]
        println!("[SignalController] {:?} -> {}", which, active);
        self.report();

        match (which, active) {
            (Override::BlinkAll, true) => {
                scheduler.disable(TaskId::PhaseCycle);
                scheduler.disable(TaskId::BlueBlink);
                self.state.all_blink_on = false;
                scheduler.enable(TaskId::AllBlink);
            }
            (Override::BlinkAll, false) => {
                scheduler.disable(TaskId::AllBlink);
                self.restart_cycle(scheduler, now);
            }
            (Override::RedOnly, true) => {
                Self::suspend_cycle(scheduler);
                self.drive(LightStates::only(Light::Red));
            }
            (Override::RedOnly, false) => {
                self.restart_cycle(scheduler, now);
            }
            (Override::AllOff, true) => {
                Self::suspend_cycle(scheduler);
                self.drive(LightStates::OFF);
            }
            (Override::AllOff, false) => {
                self.drive(LightStates::only(Light::Red));
                self.restart_cycle(scheduler, now);
            }
        }
    }

    fn suspend_cycle(scheduler: &mut Scheduler<TaskId, TASK_COUNT>) {
        scheduler.disable(TaskId::PhaseCycle);
        scheduler.disable(TaskId::BlueBlink);
        scheduler.disable(TaskId::AllBlink);
    }

    /// Start the cycle over from Red and resume the phase task
    fn restart_cycle(&mut self, scheduler: &mut Scheduler<TaskId, TASK_COUNT>, now: Instant) {
        self.state.cycle_start = now;
        self.state.blue_blink_started = false;
        scheduler.enable(TaskId::PhaseCycle);
    }

    /// Write all lamps at the current brightness
    fn drive(&mut self, lights: LightStates) {
        for light in Light::ALL {
            self.set_light(light, lights.is_on(light));
        }
    }

    fn set_light(&mut self, light: Light, on: bool) {
        let intensity = if on { self.brightness.level() } else { 0 };
        self.output.write(light, intensity);
        self.state.lights = self.state.lights.with(light, on);
    }

    fn status_record(&self) -> StatusRecord {
        StatusRecord::snapshot(&self.state, self.brightness.level())
    }

    fn report(&mut self) {
        match self.status_record().to_line() {
            Ok(line) => self.status.emit(&line),
            Err(_err) => {
                #[cfg(feature = "esp32-log")]
                println!("[SignalController] status dropped: {:?}", _err);
            }
        }
    }
}

/// Signal controller - owns the state, the scheduler and the I/O collaborators
///
/// Call [`poll`](Self::poll) from the main loop. Button handlers send
/// [`SignalIntent`]s through the intent channel; they are applied at the
/// start of the next poll.
pub struct SignalController<'a, O, B, S, const INTENT_CHANNEL_SIZE: usize>
where
    O: OutputDriver,
    B: BrightnessInput,
    S: StatusSink,
{
    intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>,
    scheduler: Scheduler<TaskId, TASK_COUNT>,
    core: SignalCore<O, B, S>,
}

impl<'a, O, B, S, const INTENT_CHANNEL_SIZE: usize> SignalController<'a, O, B, S, INTENT_CHANNEL_SIZE>
where
    O: OutputDriver,
    B: BrightnessInput,
    S: StatusSink,
{
    /// Create a controller whose cycle starts at `now`
    pub fn new(
        intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>,
        config: &SignalConfig,
        output: O,
        input: B,
        status: S,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        let timings = config.timings;
        if timings.blue_blink_toggles == 0 {
            return Err(ConfigError::EmptyBlinkBurst);
        }
        if timings.phase >= BLINK_WINDOW {
            return Err(ConfigError::PhaseTickTooSlow);
        }

        let mut scheduler = Scheduler::new();
        let specs = [
            (TaskId::BrightnessSampling, timings.brightness_sampling, Iterations::Forever, true),
            (TaskId::PhaseCycle, timings.phase, Iterations::Forever, true),
            (
                TaskId::BlueBlink,
                timings.blue_blink,
                Iterations::Bounded(timings.blue_blink_toggles),
                false,
            ),
            (TaskId::AllBlink, timings.all_blink, Iterations::Forever, false),
            (TaskId::StatusReport, timings.status, Iterations::Forever, true),
        ];
        for (id, period, iterations, enabled) in specs {
            scheduler
                .add(TaskSpec {
                    id,
                    period,
                    iterations,
                    enabled,
                })
                .map_err(|_| ConfigError::SchedulerFull)?;
        }

        Ok(Self {
            intents,
            scheduler,
            core: SignalCore {
                output,
                input,
                status,
                brightness: BrightnessSource::new(config.brightness, config.initial_brightness),
                durations: config.durations,
                state: SignalState::new(now),
            },
        })
    }

    /// One iteration of the main loop
    ///
    /// Applies pending intents, then runs one scheduler pass.
    pub fn poll(&mut self, now: Instant) {
        for intent in self.intents.drain() {
            self.core.apply(&mut self.scheduler, intent, now);
        }

        let Self {
            scheduler, core, ..
        } = self;
        scheduler.execute(now, |scheduler, task, iteration| {
            core.run_task(scheduler, task, iteration, now);
        });
    }

    /// Apply an intent immediately, bypassing the channel
    pub fn handle(&mut self, intent: SignalIntent, now: Instant) {
        self.core.apply(&mut self.scheduler, intent, now);
    }

    /// Replace the phase durations, effective from the next phase tick
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.core.durations = durations;
    }

    pub fn durations(&self) -> &PhaseDurations {
        &self.core.durations
    }

    pub fn state(&self) -> &SignalState {
        &self.core.state
    }

    pub fn brightness(&self) -> u8 {
        self.core.brightness.level()
    }

    /// Current status snapshot, without emitting it
    pub fn status_record(&self) -> StatusRecord {
        self.core.status_record()
    }

    pub fn scheduler(&self) -> &Scheduler<TaskId, TASK_COUNT> {
        &self.scheduler
    }

    pub fn output(&self) -> &O {
        &self.core.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.core.output
    }

    pub fn input_mut(&mut self) -> &mut B {
        &mut self.core.input
    }

    pub fn status_sink(&self) -> &S {
        &self.core.status
    }

    pub fn status_sink_mut(&mut self) -> &mut S {
        &mut self.core.status
    }
}
