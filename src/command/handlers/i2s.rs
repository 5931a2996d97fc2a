//! I2S command set
//!
//! `AT+I2SINIT=<role>,<sample_rate>,<bclk_gpio>,<ws_gpio>,<dout_gpio>,<din_gpio>`
//! brings up a bidirectional PCM channel and routes its signals through the
//! GPIO matrix. Role 0 is master, 1 is slave.

use crate::command::{CommandDescriptor, CommandError, CommandSet, Invocation};
use crate::stack::i2s::signal_routes;
use crate::stack::{I2sChannelConfig, I2sDriver, I2sPins, I2sRole};
use std::sync::Arc;
use tracing::info;

/// Highest GPIO number accepted for a pin parameter
pub const MAX_GPIO: i32 = 48;

pub struct I2sCommands {
    driver: Arc<dyn I2sDriver>,
}

impl I2sCommands {
    pub fn new(driver: Arc<dyn I2sDriver>) -> Self {
        Self { driver }
    }
}

fn parse_gpio(inv: &Invocation<'_>, index: usize, what: &'static str) -> Result<u32, CommandError> {
    let gpio = inv.params.get_digit(index)?;
    let gpio = CommandError::check_range(what, gpio, 0, MAX_GPIO)?;
    Ok(gpio as u32)
}

/// Parse and validate every parameter before touching the driver
fn parse_config(inv: &Invocation<'_>) -> Result<I2sChannelConfig, CommandError> {
    let role = inv.params.get_digit(0)?;
    let role = I2sRole::try_from(role).map_err(|value| CommandError::OutOfRange {
        what: "role",
        value: value.into(),
        min: 0,
        max: 1,
    })?;

    let rate = inv.params.get_digit(1)?;
    let rate = CommandError::check_range("sample rate", rate, 1, i32::MAX)?;

    let pins = I2sPins {
        bclk: parse_gpio(inv, 2, "bclk gpio")?,
        ws: parse_gpio(inv, 3, "ws gpio")?,
        dout: parse_gpio(inv, 4, "dout gpio")?,
        din: parse_gpio(inv, 5, "din gpio")?,
    };

    Ok(I2sChannelConfig::pcm(role, rate as u32, pins))
}

impl CommandSet for I2sCommands {
    fn name(&self) -> &'static str {
        "i2s"
    }

    fn commands(&self) -> Vec<CommandDescriptor> {
        let driver = self.driver.clone();
        vec![CommandDescriptor::new("+I2SINIT").with_setup(move |inv| {
            let config = parse_config(inv)?;
            info!(
                "I2S init: {:?} {} Hz pins {:?}",
                config.role, config.sample_rate_hz, config.pins
            );

            driver.configure(&config)?;
            for route in signal_routes(config.role, &config.pins) {
                driver.route_signal(route);
            }
            Ok(())
        })]
    }
}
