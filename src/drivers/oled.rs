//! SSD1306 128x64 monochrome OLED over I²C.
//!
//! Rendering goes into a RAM framebuffer through the `embedded-graphics`
//! [`DrawTarget`] trait; [`Ssd1306::flush`] then pushes the whole buffer in
//! horizontal addressing mode. The panel is only written on flush, so a
//! frame is never shown half-drawn.
//!
//! Framebuffer layout follows the controller's page format: byte
//! `x + (y / 8) * WIDTH`, bit `y % 8`.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::i2c::I2c;

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const BUFFER_LEN: usize = WIDTH * HEIGHT / 8;

/// Control byte: the rest of the transfer is commands.
const CTRL_CMD: u8 = 0x00;
/// Control byte: the rest of the transfer is display RAM.
const CTRL_DATA: u8 = 0x40;
/// Display RAM bytes sent per I²C transaction.
const DATA_CHUNK: usize = 16;

const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4, // resume from RAM
    0xA6, // normal (not inverted)
    0xAF, // display on
];

pub struct Ssd1306<I> {
    i2c: I,
    addr: u8,
    buffer: [u8; BUFFER_LEN],
}

impl<I: I2c> Ssd1306<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            buffer: [0; BUFFER_LEN],
        }
    }

    /// Send the power-up sequence. The panel is blank until the first flush.
    pub fn init(&mut self) -> Result<(), I::Error> {
        self.command(INIT_SEQUENCE)?;
        log::info!("oled: SSD1306 initialised at 0x{:02X}", self.addr);
        Ok(())
    }

    /// Blank the framebuffer (does not touch the panel).
    pub fn clear_buffer(&mut self) {
        self.buffer.fill(0);
    }

    /// Push the framebuffer to the panel.
    pub fn flush(&mut self) -> Result<(), I::Error> {
        // Full window: columns 0..=127, pages 0..=7.
        self.command(&[0x21, 0, (WIDTH - 1) as u8, 0x22, 0, (HEIGHT / 8 - 1) as u8])?;

        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CTRL_DATA;
        for chunk in self.buffer.chunks(DATA_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(self.addr, &packet[..=chunk.len()])?;
        }
        Ok(())
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buffer[x + (y / 8) * WIDTH] & (1 << (y % 8)) != 0
    }

    fn command(&mut self, cmds: &[u8]) -> Result<(), I::Error> {
        for &cmd in cmds {
            self.i2c.write(self.addr, &[CTRL_CMD, cmd])?;
        }
        Ok(())
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I> OriginDimensions for Ssd1306<I> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I> DrawTarget for Ssd1306<I> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let idx = x + (y / 8) * WIDTH;
            let bit = 1u8 << (y % 8);
            match color {
                BinaryColor::On => self.buffer[idx] |= bit,
                BinaryColor::Off => self.buffer[idx] &= !bit,
            }
        }
        Ok(())
    }
}
