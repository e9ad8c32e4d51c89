//! SSD1306 OLED panel over I²C.

use defmt::warn;
use embedded_graphics::draw_target::DrawTarget;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use touchplayer::config::OLED_I2C_ADDR;
use touchplayer::ui::{Display, FrameBuffer};
use touchplayer::Error;

/// Concrete driver type, generic over the HAL's I²C peripheral.
pub type Driver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub struct Oled<I2C> {
    driver: Driver<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the panel and leave it blank.
    pub fn new(i2c: I2C) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, OLED_I2C_ADDR);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        driver.init().map_err(|_| Error::Display)?;
        driver.clear_buffer();
        driver.flush().map_err(|_| Error::Display)?;
        Ok(Self { driver })
    }
}

impl<I2C> Display for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn present(&mut self, frame: &FrameBuffer) {
        let _ = self.driver.draw_iter(frame.pixels());
        if self.driver.flush().is_err() {
            warn!("OLED: flush failed");
        }
    }
}
