//! HFP Audio-Gateway command set
//!
//! | Command                          | Form    | Stack call                |
//! |----------------------------------|---------|---------------------------|
//! | `AT+HFPAG`                       | execute | none, prints version      |
//! | `AT+HFPAGINIT=<0\|1>`            | setup   | register callback, (de)init |
//! | `AT+HFPAGCONNECTSVC=<mac>`       | setup   | `slc_connect`             |
//! | `AT+HFPAGDISCONNECTSVC=<mac>`    | setup   | `slc_disconnect`          |
//! | `AT+HFPAGCONNECTAUD=<mac>`       | setup   | `audio_connect`           |
//! | `AT+HFPAGDISCONNECTAUD=<mac>`    | setup   | `audio_disconnect`        |
//! | `AT+HFPAGSETMICVOL=<mac>,<0-15>` | setup   | `volume_control`          |
//! | `AT+HFPAGSETSPKVOL=<mac>,<0-15>` | setup   | `volume_control`          |

use crate::command::{CommandDescriptor, CommandError, CommandSet, Invocation};
use crate::stack::{EventSink, HfpAgStack, StackError};
use hfpag_shared::event::MAX_VOLUME;
use hfpag_shared::{BdAddr, VolumeTarget};
use std::sync::Arc;
use tracing::info;

/// Reported by `AT+HFPAG`
pub const HFP_AG_VERSION: &str = "v0.0.1";

type AddressCall = fn(&dyn HfpAgStack, &BdAddr) -> Result<(), StackError>;

pub struct HfpAgCommands {
    stack: Arc<dyn HfpAgStack>,
    sink: EventSink,
}

impl HfpAgCommands {
    /// `sink` is registered with the stack on every `AT+HFPAGINIT`
    pub fn new(stack: Arc<dyn HfpAgStack>, sink: EventSink) -> Self {
        Self { stack, sink }
    }

    /// Setup-only command taking a single address
    fn address_command(&self, name: &'static str, call: AddressCall) -> CommandDescriptor {
        let stack = self.stack.clone();
        CommandDescriptor::new(name).with_setup(move |inv| {
            let remote = inv.params.get_address(0)?;
            info!("AT{} {}", inv.name, remote);
            call(stack.as_ref(), &remote)?;
            Ok(())
        })
    }

    fn volume_command(&self, name: &'static str, target: VolumeTarget) -> CommandDescriptor {
        let stack = self.stack.clone();
        CommandDescriptor::new(name).with_setup(move |inv| {
            let remote = inv.params.get_address(0)?;
            let volume = parse_volume(inv)?;
            info!("AT{} {} {:?}={}", inv.name, remote, target, volume);
            stack.volume_control(&remote, target, volume)?;
            Ok(())
        })
    }
}

fn parse_volume(inv: &Invocation<'_>) -> Result<u8, CommandError> {
    let volume = inv.params.get_digit(1)?;
    let volume = CommandError::check_range("volume", volume, 0, i32::from(MAX_VOLUME))?;
    // Range check above keeps this within u8
    Ok(volume as u8)
}

impl CommandSet for HfpAgCommands {
    fn name(&self) -> &'static str {
        "hfp-ag"
    }

    fn commands(&self) -> Vec<CommandDescriptor> {
        let init = {
            let stack = self.stack.clone();
            let sink = self.sink.clone();
            CommandDescriptor::new("+HFPAGINIT").with_setup(move |inv| {
                let enable = inv.params.get_digit(0)?;
                let enable = CommandError::check_range("init flag", enable, 0, 1)?;

                stack.register_callback(sink.clone());
                if enable == 1 {
                    stack.init()?;
                } else {
                    stack.deinit()?;
                }
                Ok(())
            })
        };

        vec![
            CommandDescriptor::new("+HFPAG").with_execute(|inv| {
                inv.output.write_line(HFP_AG_VERSION);
                Ok(())
            }),
            init,
            self.address_command("+HFPAGCONNECTSVC", |stack, remote| stack.slc_connect(remote)),
            self.address_command("+HFPAGDISCONNECTSVC", |stack, remote| {
                stack.slc_disconnect(remote)
            }),
            self.address_command("+HFPAGCONNECTAUD", |stack, remote| stack.audio_connect(remote)),
            self.address_command("+HFPAGDISCONNECTAUD", |stack, remote| {
                stack.audio_disconnect(remote)
            }),
            self.volume_command("+HFPAGSETMICVOL", VolumeTarget::Microphone),
            self.volume_command("+HFPAGSETSPKVOL", VolumeTarget::Speaker),
        ]
    }
}
