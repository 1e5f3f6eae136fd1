//! Display adapter: renders [`RoomStatus`] onto the SSD1306.
//!
//! [`compose_screen`] decides *what* to show (pure, testable);
//! [`OledDisplay`] decides *how*: first line in a large font, the rest in
//! a small one, then one flush.

use core::fmt::Write as _;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_9X15_BOLD};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::DisplayPort;
use crate::app::service::RoomStatus;
use crate::config::PASSWORD_LENGTH;
use crate::drivers::oled::Ssd1306;
use crate::fsm::RoomState;

pub type ScreenLine = heapless::String<16>;
pub type Screen = heapless::Vec<ScreenLine, 4>;

fn line(text: &str) -> ScreenLine {
    let mut out = ScreenLine::new();
    let _ = out.push_str(text);
    out
}

/// Text lines to show for `status`, top to bottom.
pub fn compose_screen(status: &RoomStatus) -> Screen {
    let mut screen = Screen::new();
    // At most four lines, each well under 16 bytes.
    match status.state {
        RoomState::Locked => {
            let _ = screen.push(line("SYSTEM"));
            let _ = screen.push(line("LOCKED"));
        }
        RoomState::InputPassword => {
            let _ = screen.push(line("CODE:"));
            let mut cells = ScreenLine::new();
            for i in 0..PASSWORD_LENGTH {
                let _ = cells.push(if i < status.input_len { '*' } else { '_' });
            }
            let _ = screen.push(cells);
        }
        RoomState::Unlocked => {
            let _ = screen.push(line("ACCESS OK"));
            let mut temp = ScreenLine::new();
            let _ = write!(temp, "Temp: {:.1}C", status.temperature_c);
            let _ = screen.push(temp);
            let mut fan = ScreenLine::new();
            let _ = write!(fan, "Fan: {}", status.fan_level.label());
            let _ = screen.push(fan);
            let _ = screen.push(line(if status.manual_fan_override {
                "Mode: MANUAL"
            } else {
                "Mode: AUTO"
            }));
        }
        RoomState::AccessDenied => {
            let _ = screen.push(line("ACCESS"));
            let _ = screen.push(line("DENIED"));
        }
        RoomState::Emergency => {
            let _ = screen.push(line("EMERGENCY!"));
            let _ = screen.push(line("EXIT NOW"));
        }
    }
    screen
}

/// Draw `screen` into any monochrome target.
pub fn draw_screen<D>(screen: &Screen, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    let headline = MonoTextStyle::new(&FONT_9X15_BOLD, BinaryColor::On);
    let body = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    let mut y = 0;
    for (i, text) in screen.iter().enumerate() {
        let (style, advance) = if i == 0 { (headline, 20) } else { (body, 12) };
        Text::with_baseline(text.as_str(), Point::new(0, y), style, Baseline::Top).draw(target)?;
        y += advance;
    }
    Ok(())
}

pub struct OledDisplay<I> {
    oled: Ssd1306<I>,
}

impl<I: I2c> OledDisplay<I> {
    pub fn new(oled: Ssd1306<I>) -> Self {
        Self { oled }
    }

    pub fn panel(&self) -> &Ssd1306<I> {
        &self.oled
    }
}

impl<I: I2c> DisplayPort for OledDisplay<I> {
    fn render(&mut self, status: &RoomStatus) {
        let screen = compose_screen(status);
        // Framebuffer drawing cannot fail.
        let _ = draw_screen(&screen, &mut self.oled);
        if self.oled.flush().is_err() {
            warn!("display: I2C flush failed");
        }
    }
}
