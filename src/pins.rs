//! GPIO / peripheral pin assignments for the room controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Door latch (relay driver)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = latch energised (door locked).
pub const DOOR_LOCK_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Ventilation fan (MOSFET low-side switch)
// ---------------------------------------------------------------------------

/// LEDC PWM output for fan speed.
pub const FAN_PWM_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Sensors, analog (ADC1)
// ---------------------------------------------------------------------------

/// LM35 analog temperature sensor, 10 mV/°C.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// 4x4 matrix keypad
// ---------------------------------------------------------------------------

/// Row lines, driven low one at a time during a scan.
pub const KEYPAD_ROW_GPIOS: [i32; 4] = [6, 7, 8, 9];
/// Column lines, inputs with pull-ups (a pressed key reads LOW).
pub const KEYPAD_COL_GPIOS: [i32; 4] = [10, 11, 12, 13];

// ---------------------------------------------------------------------------
// I²C bus (SSD1306 OLED)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
/// 7-bit address of the SSD1306 with SA0 tied low.
pub const OLED_I2C_ADDR: u8 = 0x3C;
pub const I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// UARTs
// ---------------------------------------------------------------------------

/// Debug console.
pub const UART_DEBUG_TX_GPIO: i32 = 43;
pub const UART_DEBUG_RX_GPIO: i32 = 44;
/// Wi-Fi bridge module (AT-style passthrough).
pub const UART_BRIDGE_TX_GPIO: i32 = 17;
pub const UART_BRIDGE_RX_GPIO: i32 = 18;
pub const UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  7-bit gives 0 – 127, enough for a 0 – 99 period.
pub const PWM_RESOLUTION_BITS: u32 = 7;
/// LEDC base frequency for the fan (25 kHz, inaudible).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
/// Interval between fade steps.
pub const FAN_FADE_STEP_US: u64 = 10_000;
