//! RoomGuard Firmware: Main Entry Point
//!
//! Single control loop over a hexagonal core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Keypad          HardwareAdapter         LogEventSink          │
//! │  (4x4 matrix)    (Door+Fan+Display)      (EventSink)           │
//! │  UART x2         Lm35Sensor              MonotonicClock        │
//! │  (LineAssembler) (TemperaturePort)                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            RoomController (pure logic)                 │    │
//! │  │  FSM · fan policy · fade completion                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  esp_timer fade channel → FadeSignal (atomic hand-off)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::hal::delay::{FreeRtos, NON_BLOCK};
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_svc::hal::units::Hertz;

use roomguard::adapters::display::OledDisplay;
use roomguard::adapters::hardware::HardwareAdapter;
use roomguard::adapters::log_sink::LogEventSink;
use roomguard::adapters::serial_console::LineAssembler;
use roomguard::adapters::time::MonotonicClock;
use roomguard::app::service::RoomController;
use roomguard::config::RoomConfig;
use roomguard::control::fan::FadeSignal;
use roomguard::drivers::door::DoorLock;
use roomguard::drivers::fan_pwm::{FadeChannel, FanPwm};
use roomguard::drivers::hw_init;
use roomguard::drivers::keypad::Keypad;
use roomguard::drivers::oled::Ssd1306;
use roomguard::drivers::watchdog::Watchdog;
use roomguard::pins;
use roomguard::sensors::temperature::Lm35Sensor;

// ── Fade hand-off ─────────────────────────────────────────────
//
// Shared between the control loop and the esp_timer task that plays fan
// fades. Both sides only touch atomics.

static FAN_FADE: FadeSignal = FadeSignal::new();
static FAN_CHANNEL: FadeChannel = FadeChannel::new(&FAN_FADE);

/// Bytes drained from one UART per loop iteration.
const UART_READ_CHUNK: usize = 32;

// ── Console polling ───────────────────────────────────────────

/// Drain whatever the UART holds, dispatch complete lines, and write each
/// reply back on the same port.
fn poll_console(
    uart: &UartDriver<'_>,
    asm: &mut LineAssembler,
    app: &mut RoomController,
    sink: &mut LogEventSink,
) {
    let mut buf = [0u8; UART_READ_CHUNK];
    let n = match uart.read(&mut buf, NON_BLOCK) {
        Ok(n) => n,
        Err(e) => {
            warn!("console: UART read failed ({})", e);
            return;
        }
    };
    for &byte in &buf[..n] {
        let Some(line) = asm.push(byte) else {
            continue;
        };
        let reply = app.handle_line(&line, sink);
        if uart
            .write(reply.as_bytes())
            .and_then(|_| uart.write(b"\r\n"))
            .is_err()
        {
            warn!("console: reply dropped");
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RoomGuard v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (RAM only) ───────────────────────────
    let config = RoomConfig::default();
    config.validate()?;

    // ── 3. Raw peripherals (ADC, LEDC) ────────────────────────
    hw_init::init_peripherals()?;
    let fan = FanPwm::new(hw_init::LEDC_CH_FAN, &FAN_CHANNEL);
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. HAL-managed peripherals ────────────────────────────
    // Pin choices mirror `pins.rs`.
    let p = Peripherals::take()?;

    let door = DoorLock::new(PinDriver::output(p.pins.gpio2)?);

    let rows: [PinDriver<'_, AnyOutputPin, Output>; 4] = [
        PinDriver::output(AnyOutputPin::from(p.pins.gpio6))?,
        PinDriver::output(AnyOutputPin::from(p.pins.gpio7))?,
        PinDriver::output(AnyOutputPin::from(p.pins.gpio8))?,
        PinDriver::output(AnyOutputPin::from(p.pins.gpio9))?,
    ];
    let mut cols: [PinDriver<'_, AnyInputPin, Input>; 4] = [
        PinDriver::input(AnyInputPin::from(p.pins.gpio10))?,
        PinDriver::input(AnyInputPin::from(p.pins.gpio11))?,
        PinDriver::input(AnyInputPin::from(p.pins.gpio12))?,
        PinDriver::input(AnyInputPin::from(p.pins.gpio13))?,
    ];
    for col in &mut cols {
        col.set_pull(Pull::Up)?;
    }
    let mut keypad = Keypad::new(rows, cols, config.keypad_debounce_ms);

    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio14,
        p.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let mut oled = Ssd1306::new(i2c, pins::OLED_I2C_ADDR);
    if let Err(e) = oled.init() {
        // The controller keeps running headless; every render retries.
        warn!("OLED init failed ({:?}), display may stay blank", e);
    }

    let uart_cfg = UartConfig::default().baudrate(Hertz(pins::UART_BAUD));
    let debug_uart = UartDriver::new(
        p.uart0,
        p.pins.gpio43,
        p.pins.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_cfg,
    )?;
    let bridge_uart = UartDriver::new(
        p.uart1,
        p.pins.gpio17,
        p.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_cfg,
    )?;
    let mut debug_lines = LineAssembler::new();
    let mut bridge_lines = LineAssembler::new();

    // ── 5. Construct adapters and the controller ──────────────
    let mut hw = HardwareAdapter::new(door, fan, OledDisplay::new(oled));
    let mut lm35 = Lm35Sensor::new(hw_init::ADC1_CH_TEMP);
    let clock = MonotonicClock::new();
    let mut log_sink = LogEventSink::new();

    let mut app = RoomController::new(&config, &FAN_FADE);
    let boot_ms = clock.now_ms();
    app.start(boot_ms, &mut log_sink);
    app.set_temperature(lm35.sample(), &mut log_sink);
    let mut last_sample_ms = boot_ms;

    info!(
        "Control loop: {} ms tick, temperature every {} ms",
        config.control_loop_interval_ms, config.temperature_sample_interval_ms
    );

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now = clock.now_ms();

        if let Some(key) = keypad.poll(now) {
            app.process_key(key, now, &mut log_sink);
        }

        poll_console(&debug_uart, &mut debug_lines, &mut app, &mut log_sink);
        poll_console(&bridge_uart, &mut bridge_lines, &mut app, &mut log_sink);

        if now.wrapping_sub(last_sample_ms) >= config.temperature_sample_interval_ms {
            app.set_temperature(lm35.sample(), &mut log_sink);
            last_sample_ms = now;
        }

        app.update(now, &mut hw, &mut log_sink);

        watchdog.feed();
        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
