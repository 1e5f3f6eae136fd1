//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements    | Connects to                 |
//! |------------------|---------------|-----------------------------|
//! | `display`        | DisplayPort   | SSD1306 OLED (I²C)          |
//! | `hardware`       | DoorPort      | Door relay GPIO             |
//! |                  | FanPort       | LEDC PWM + fade timer       |
//! |                  | DisplayPort   | (delegates to `display`)    |
//! | `log_sink`       | EventSink     | Serial log output           |
//! | `serial_console` | -             | UART byte stream → lines    |
//! | `time`           | -             | ESP32 system timer          |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod serial_console;
pub mod time;
