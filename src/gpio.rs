//! Physical buttons on the Raspberry Pi header (feature `hardware`).

use crate::input::Button;
use rppal::gpio::{Gpio, InputPin, Level};

pub use rppal::gpio::Error as GpioError;

/// Active-low push button wired between a BCM pin and ground.
pub struct GpioButton {
    pin: InputPin,
}

impl GpioButton {
    /// Claim `bcm_pin` as an input with the internal pull-up enabled.
    pub fn new(gpio: &Gpio, bcm_pin: u8) -> Result<Self, GpioError> {
        let pin = gpio.get(bcm_pin)?.into_input_pullup();
        Ok(Self { pin })
    }
}

impl Button for GpioButton {
    fn value(&mut self) -> u8 {
        match self.pin.read() {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

/// Open the GPIO controller and claim the select and menu pins.
pub fn open_buttons(select_pin: u8, menu_pin: u8) -> Result<(GpioButton, GpioButton), GpioError> {
    let gpio = Gpio::new()?;
    Ok((
        GpioButton::new(&gpio, select_pin)?,
        GpioButton::new(&gpio, menu_pin)?,
    ))
}
