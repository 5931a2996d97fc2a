//! I2S channel configuration and PCM signal routing

/// Clock direction of the I2S controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2sRole {
    /// Drives BCLK and WS
    Master,
    /// Follows an external BCLK and WS
    Slave,
}

impl TryFrom<i32> for I2sRole {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(I2sRole::Master),
            1 => Ok(I2sRole::Slave),
            other => Err(other),
        }
    }
}

/// GPIO assignment for the four I2S lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2sPins {
    pub bclk: u32,
    pub ws: u32,
    pub dout: u32,
    pub din: u32,
}

/// Standard-mode channel configuration for a bidirectional PCM link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I2sChannelConfig {
    pub controller: u8,
    pub role: I2sRole,
    pub dma_desc_num: u32,
    pub dma_frame_num: u32,
    pub auto_clear: bool,
    pub sample_rate_hz: u32,
    /// Mono slot, one sample per frame
    pub bits_per_sample: u8,
    /// `None` leaves MCLK unrouted
    pub mclk: Option<u32>,
    pub pins: I2sPins,
    pub invert_bclk: bool,
    pub invert_ws: bool,
}

impl I2sChannelConfig {
    /// 16-bit mono PCM slot on controller 0, no MCLK, no inversion
    pub fn pcm(role: I2sRole, sample_rate_hz: u32, pins: I2sPins) -> Self {
        Self {
            controller: 0,
            role,
            dma_desc_num: 6,
            dma_frame_num: 240,
            auto_clear: true,
            sample_rate_hz,
            bits_per_sample: 16,
            mclk: None,
            pins,
            invert_bclk: false,
            invert_ws: false,
        }
    }
}

/// Peripheral-side PCM signals in the GPIO matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmSignal {
    FsyncOut,
    ClkOut,
    FsyncIn,
    ClkIn,
    DataOut,
    DataIn,
}

/// One GPIO matrix connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalRoute {
    Output { gpio: u32, signal: PcmSignal },
    Input { gpio: u32, signal: PcmSignal },
}

/// Connections needed for the PCM link after the channel is enabled
///
/// The master drives frame sync and bit clock out of the chip, the slave
/// samples them. Data lines are the same for both roles.
pub fn signal_routes(role: I2sRole, pins: &I2sPins) -> [SignalRoute; 4] {
    let (fsync, clk) = match role {
        I2sRole::Master => (
            SignalRoute::Output {
                gpio: pins.ws,
                signal: PcmSignal::FsyncOut,
            },
            SignalRoute::Output {
                gpio: pins.bclk,
                signal: PcmSignal::ClkOut,
            },
        ),
        I2sRole::Slave => (
            SignalRoute::Input {
                gpio: pins.ws,
                signal: PcmSignal::FsyncIn,
            },
            SignalRoute::Input {
                gpio: pins.bclk,
                signal: PcmSignal::ClkIn,
            },
        ),
    };

    [
        fsync,
        clk,
        SignalRoute::Output {
            gpio: pins.dout,
            signal: PcmSignal::DataOut,
        },
        SignalRoute::Input {
            gpio: pins.din,
            signal: PcmSignal::DataIn,
        },
    ]
}
