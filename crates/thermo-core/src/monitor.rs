//! Poll loop tying the sensor, buttons and display together
//!
//! [`Monitor`] owns every collaborator, so nothing is shared through
//! globals. One [`Monitor::poll_once`] call does a full cycle: read the
//! sensor, read the buttons, render, write. [`Monitor::run`] repeats that
//! forever at the configured cadence.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::{debug, error, info, warn};

use crate::buttons::{ButtonInput, DisplayMode};
use crate::config::MonitorConfig;
use crate::display::{
    DisplayError, DisplayFrame, SegmentDisplay, render_dual, render_error, render_off,
    render_single,
};
use crate::sensors::{Adt7420, Sensor};
use crate::temperature::{Celsius, Fahrenheit, Unit};

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// A fresh reading was shown in `mode`.
    Rendered { mode: DisplayMode, celsius: Celsius },
    /// The sensor failed; the previous frame stays up.
    Held,
    /// The sensor has failed too many polls in a row; the error pattern is up.
    SensorFault,
    /// The frame could not be written and was dropped.
    DisplaySkipped,
}

/// Build the frame for `mode` from one reading.
pub fn frame_for(mode: DisplayMode, celsius: Celsius, fahrenheit: Fahrenheit) -> DisplayFrame {
    match mode {
        DisplayMode::Celsius => render_single(celsius.0, Unit::Celsius),
        DisplayMode::Fahrenheit => render_single(fahrenheit.0, Unit::Fahrenheit),
        DisplayMode::Both => render_dual(fahrenheit.0, celsius.0),
        DisplayMode::Off => render_off(),
    }
}

pub struct Monitor<S, B, D> {
    sensor: S,
    buttons: B,
    display: D,
    config: MonitorConfig,
    consecutive_failures: u8,
}

impl<I, B, D> Monitor<Adt7420<I>, B, D>
where
    I: I2c,
    B: ButtonInput,
    D: SegmentDisplay,
{
    /// Monitor for an ADT7420 at the address and register named in `config`.
    pub fn with_adt7420(i2c: I, buttons: B, display: D, config: MonitorConfig) -> Self {
        let sensor = Adt7420::new(i2c, config.sensor_address)
            .with_temperature_register(config.temperature_register);
        Self::new(sensor, buttons, display, config)
    }
}

impl<S, B, D> Monitor<S, B, D>
where
    S: Sensor,
    B: ButtonInput,
    D: SegmentDisplay,
{
    pub fn new(sensor: S, buttons: B, display: D, config: MonitorConfig) -> Self {
        Self {
            sensor,
            buttons,
            display,
            config,
            consecutive_failures: 0,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Polls in a row that produced no reading.
    pub fn consecutive_failures(&self) -> u8 {
        self.consecutive_failures
    }

    /// Write `frame`, logging and swallowing driver failures.
    fn show(&mut self, frame: &DisplayFrame) -> Result<(), DisplayError> {
        frame.write_to(&mut self.display).inspect_err(|e| {
            warn!("Skipping frame: {}", e);
        })
    }

    /// Blank the display.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.show(&render_off())
    }

    /// Run one read-render-write cycle.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let celsius = match self.sensor.read(self.config.read_attempts).await {
            Ok(celsius) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "{} recovered after {} failed polls",
                        S::NAME,
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                celsius
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                error!(
                    "{} poll failed ({} in a row): {}",
                    S::NAME,
                    self.consecutive_failures,
                    e
                );
                if self.consecutive_failures < self.config.failure_threshold {
                    return PollOutcome::Held;
                }
                return match self.show(&render_error()) {
                    Ok(()) => PollOutcome::SensorFault,
                    Err(_) => PollOutcome::DisplaySkipped,
                };
            }
        };

        let fahrenheit = Fahrenheit::from(celsius);
        let mode = DisplayMode::from_code(self.buttons.read());
        debug!("{:?}: {} C / {} F", mode, celsius.0, fahrenheit.0);

        match self.show(&frame_for(mode, celsius, fahrenheit)) {
            Ok(()) => PollOutcome::Rendered { mode, celsius },
            Err(_) => PollOutcome::DisplaySkipped,
        }
    }

    /// Log the settings and blank the display before the first poll.
    fn start(&mut self) {
        info!(
            "Monitor started: {} polled every {} ms, {} attempts per poll",
            S::NAME,
            self.config.poll_interval().as_millis(),
            self.config.read_attempts
        );

        if let Err(e) = self.clear() {
            error!("Initial display clear failed: {}", e);
        }
    }

    /// One poll followed by the inter-poll delay.
    async fn cycle<T: DelayNs>(&mut self, delay: &mut T) -> PollOutcome {
        let outcome = self.poll_once().await;
        debug!("Poll outcome: {:?}", outcome);

        let interval_ms = u32::try_from(self.config.poll_interval().as_millis()).unwrap_or(u32::MAX);
        delay.delay_ms(interval_ms).await;
        outcome
    }

    /// Blank the display, then run `polls` cycles.
    pub async fn run_for<T: DelayNs>(&mut self, delay: &mut T, polls: u32) {
        self.start();
        for _ in 0..polls {
            self.cycle(delay).await;
        }
    }

    /// Blank the display, then poll forever. Never returns.
    pub async fn run<T: DelayNs>(&mut self, delay: &mut T) {
        self.start();
        loop {
            self.cycle(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::frame::tests::RecordingDisplay;
    use crate::display::{DASH_PATTERN, Glyph, HEX_PATTERNS};
    use crate::sensors::SensorError;
    use embassy_futures::block_on;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::collections::VecDeque;

    /// Sensor that replays a fixed script of transaction results.
    struct ScriptedSensor {
        script: VecDeque<Result<Celsius, SensorError>>,
    }

    impl ScriptedSensor {
        fn new(script: impl IntoIterator<Item = Result<Celsius, SensorError>>) -> Self {
            Self {
                script: script.into_iter().collect(),
            }
        }
    }

    const BUS_FAULT: SensorError = SensorError::ReadFailed {
        sensor: "scripted",
        operation: "read",
        details: "injected",
    };

    impl Sensor for ScriptedSensor {
        const NAME: &'static str = "scripted";

        async fn read_once(&mut self) -> Result<Celsius, SensorError> {
            self.script.pop_front().unwrap_or(Err(BUS_FAULT))
        }
    }

    /// Records every requested delay instead of sleeping.
    #[derive(Default)]
    struct RecordingDelay {
        delays_ns: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.delays_ns.push(ns);
        }
    }

    struct FixedButtons(u8);

    impl ButtonInput for FixedButtons {
        fn read(&mut self) -> u8 {
            self.0
        }
    }

    fn config(read_attempts: u8, failure_threshold: u8) -> MonitorConfig {
        MonitorConfig {
            read_attempts,
            failure_threshold,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_for_each_mode() {
        let celsius = Celsius(22.5);
        let fahrenheit = Fahrenheit::from(celsius);

        assert_eq!(
            frame_for(DisplayMode::Celsius, celsius, fahrenheit),
            render_single(22.5, Unit::Celsius)
        );
        assert_eq!(
            frame_for(DisplayMode::Fahrenheit, celsius, fahrenheit),
            render_single(72.5, Unit::Fahrenheit)
        );
        assert_eq!(
            frame_for(DisplayMode::Both, celsius, fahrenheit),
            render_dual(72.5, 22.5)
        );
        assert_eq!(frame_for(DisplayMode::Off, celsius, fahrenheit), render_off());
    }

    #[test]
    fn test_poll_renders_selected_mode() {
        let sensor = ScriptedSensor::new([Ok(Celsius(22.5))]);
        let mut monitor = Monitor::new(
            sensor,
            FixedButtons(2),
            RecordingDisplay::default(),
            config(1, 5),
        );

        assert_eq!(
            block_on(monitor.poll_once()),
            PollOutcome::Rendered {
                mode: DisplayMode::Fahrenheit,
                celsius: Celsius(22.5)
            }
        );

        // 72.50 F: unit at 3, digits 0,5,2,7 from position 4.
        let display = monitor.display();
        assert_eq!(display.patterns[2], Some(0xFF));
        assert_eq!(display.patterns[3], Some(HEX_PATTERNS[0xF]));
        assert_eq!(display.patterns[5], Some(HEX_PATTERNS[5]));
        assert_eq!(display.patterns[7], Some(HEX_PATTERNS[7]));
        assert_eq!(display.decimal_points, Some(0x40));
    }

    #[test]
    fn test_poll_retries_within_one_poll() {
        let sensor = ScriptedSensor::new([Err(BUS_FAULT), Err(BUS_FAULT), Ok(Celsius(50.0))]);
        let mut monitor = Monitor::new(
            sensor,
            FixedButtons(0),
            RecordingDisplay::default(),
            config(3, 5),
        );

        assert!(matches!(
            block_on(monitor.poll_once()),
            PollOutcome::Rendered { mode: DisplayMode::Celsius, .. }
        ));
        assert_eq!(monitor.consecutive_failures(), 0);
    }

    #[test]
    fn test_failures_hold_then_show_error() {
        let sensor = ScriptedSensor::new([]);
        let mut monitor = Monitor::new(
            sensor,
            FixedButtons(0),
            RecordingDisplay::default(),
            config(2, 3),
        );

        assert_eq!(block_on(monitor.poll_once()), PollOutcome::Held);
        assert_eq!(block_on(monitor.poll_once()), PollOutcome::Held);
        assert_eq!(monitor.display().writes, 0);

        assert_eq!(block_on(monitor.poll_once()), PollOutcome::SensorFault);
        assert_eq!(monitor.consecutive_failures(), 3);
        assert_eq!(monitor.display().patterns, [Some(DASH_PATTERN); 8]);
        assert_eq!(monitor.display().decimal_points, Some(0));
    }

    #[test]
    fn test_good_reading_resets_failures() {
        let sensor = ScriptedSensor::new([Err(BUS_FAULT), Ok(Celsius(21.0))]);
        let mut monitor = Monitor::new(
            sensor,
            FixedButtons(3),
            RecordingDisplay::default(),
            config(1, 5),
        );

        assert_eq!(block_on(monitor.poll_once()), PollOutcome::Held);
        assert_eq!(monitor.consecutive_failures(), 1);

        assert!(matches!(
            block_on(monitor.poll_once()),
            PollOutcome::Rendered { mode: DisplayMode::Both, .. }
        ));
        assert_eq!(monitor.consecutive_failures(), 0);
    }

    #[test]
    fn test_display_failure_skips_frame() {
        let sensor = ScriptedSensor::new([Ok(Celsius(21.0)), Ok(Celsius(21.0))]);
        let display = RecordingDisplay {
            fail_position: Some(0),
            ..Default::default()
        };
        let mut monitor = Monitor::new(sensor, FixedButtons(0), display, config(1, 5));

        assert_eq!(block_on(monitor.poll_once()), PollOutcome::DisplaySkipped);
        // The loop keeps going on the next poll.
        assert_eq!(block_on(monitor.poll_once()), PollOutcome::DisplaySkipped);
        assert_eq!(monitor.consecutive_failures(), 0);
    }

    #[test]
    fn test_off_mode_blanks_display() {
        let sensor = ScriptedSensor::new([Ok(Celsius(21.0))]);
        let mut monitor = Monitor::new(
            sensor,
            FixedButtons(1),
            RecordingDisplay::default(),
            config(1, 5),
        );

        block_on(monitor.poll_once());
        assert_eq!(monitor.display().patterns, [Some(0xFF); 8]);
        assert_eq!(monitor.display().decimal_points, Some(0));
    }

    #[test]
    fn test_adt7420_monitor_uses_config() {
        let expectations = [I2cTransaction::write_read(0x48, vec![0x00], vec![0x0B, 0x40])];
        let mut i2c = I2cMock::new(&expectations);
        let config = MonitorConfig {
            sensor_address: 0x48,
            ..Default::default()
        };
        let mut monitor = Monitor::with_adt7420(
            i2c.clone(),
            FixedButtons(3),
            RecordingDisplay::default(),
            config,
        );

        assert_eq!(
            block_on(monitor.poll_once()),
            PollOutcome::Rendered {
                mode: DisplayMode::Both,
                celsius: Celsius(22.5)
            }
        );
        // 72.50 F | 22.50 C
        assert_eq!(monitor.display().decimal_points, Some(0x44));
        assert_eq!(
            monitor.display().patterns[1],
            Some(Glyph::Hex(5).pattern(monitor.display()))
        );
        i2c.done();
    }

    #[test]
    fn test_adt7420_bus_errors_hold_display() {
        let expectations = [
            I2cTransaction::write_read(0x4B, vec![0x00], vec![0x00, 0x00])
                .with_error(ErrorKind::Other),
            I2cTransaction::write_read(0x4B, vec![0x00], vec![0x00, 0x00])
                .with_error(ErrorKind::Other),
            I2cTransaction::write_read(0x4B, vec![0x00], vec![0x00, 0x00])
                .with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut monitor = Monitor::with_adt7420(
            i2c.clone(),
            FixedButtons(0),
            RecordingDisplay::default(),
            MonitorConfig::default(),
        );

        assert_eq!(block_on(monitor.poll_once()), PollOutcome::Held);
        assert_eq!(monitor.display().writes, 0);
        i2c.done();
    }

    #[test]
    fn test_run_for_clears_then_polls_at_configured_interval() {
        let sensor = ScriptedSensor::new([Ok(Celsius(22.5)), Ok(Celsius(22.5)), Ok(Celsius(22.5))]);
        let config = MonitorConfig {
            poll_interval_ms: 250,
            ..config(1, 5)
        };
        let mut monitor = Monitor::new(sensor, FixedButtons(0), RecordingDisplay::default(), config);
        let mut delay = RecordingDelay::default();

        block_on(monitor.run_for(&mut delay, 3));

        assert_eq!(delay.delays_ns.len(), 3);
        assert!(delay.delays_ns.iter().all(|ns| *ns == 250_000_000));
        // One clear plus three rendered frames.
        assert_eq!(monitor.display().writes, 4 * 8);
        assert_eq!(monitor.display().decimal_points, Some(0x40));
    }
}
