//! Base command set: `AT`, `AT+GMR`, `AT+CMD?`

use crate::command::{CommandDescriptor, CommandSet, Priority};
use hfpag_shared::CommandForm;

/// Version reported by `AT+GMR`
pub const GATEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct BaseCommands;

impl CommandSet for BaseCommands {
    fn name(&self) -> &'static str {
        "base"
    }

    fn priority(&self) -> Priority {
        Priority::First
    }

    fn commands(&self) -> Vec<CommandDescriptor> {
        vec![
            // Bare "AT": liveness check
            CommandDescriptor::new("").with_execute(|_| Ok(())),
            CommandDescriptor::new("+GMR").with_execute(|inv| {
                inv.output
                    .write_line(&format!("AT version:{} (hfpag-gateway)", GATEWAY_VERSION));
                Ok(())
            }),
            CommandDescriptor::new("+CMD").with_query(|inv| {
                let listed = inv.registry.iter().filter(|c| !c.name().is_empty());
                for (index, command) in listed.enumerate() {
                    let flag = |form| u8::from(command.supports(form));
                    inv.output.write_line(&format!(
                        "+CMD:{},\"{}\",{},{},{},{}",
                        index,
                        command.name(),
                        flag(CommandForm::Test),
                        flag(CommandForm::Query),
                        flag(CommandForm::Setup),
                        flag(CommandForm::Execute),
                    ));
                }
                Ok(())
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Dispatcher, RegistryBuilder};
    use crate::output::{drain, Output};
    use hfpag_shared::ResultCode;

    fn dispatcher() -> (Dispatcher, crate::output::OutputReceiver) {
        let (output, rx) = Output::channel();
        let registry = RegistryBuilder::new(8).with(BaseCommands).build();
        (Dispatcher::new(registry, output), rx)
    }

    #[test]
    fn test_bare_at() {
        let (dispatcher, mut rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("AT"), ResultCode::Ok);
        assert_eq!(dispatcher.dispatch("AT?"), ResultCode::Error);
        assert_eq!(drain(&mut rx), "");
    }

    #[test]
    fn test_gmr_reports_version() {
        let (dispatcher, mut rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("AT+GMR"), ResultCode::Ok);
        assert!(drain(&mut rx).contains(GATEWAY_VERSION));
    }

    #[test]
    fn test_cmd_lists_registered_commands() {
        let (dispatcher, mut rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("AT+CMD?"), ResultCode::Ok);
        assert_eq!(
            drain(&mut rx),
            "+CMD:0,\"+GMR\",0,0,0,1\r\n+CMD:1,\"+CMD\",0,1,0,0\r\n"
        );
    }
}
