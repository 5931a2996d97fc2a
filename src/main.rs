mod command;
mod config;
mod events;
mod output;
mod session;
mod stack;
mod transport;

use anyhow::Result;
use command::handlers::{BaseCommands, HfpAgCommands, I2sCommands};
use command::{Dispatcher, RegistryBuilder};
use config::{GatewayConfig, HostPortConfig};
use events::EventTranslator;
use output::{Output, OutputReceiver};
use session::Session;
use stack::{EventSink, HfpAgStack, I2sDriver, SimHfpAg, SimI2s};
use std::sync::Arc;
use std::time::Duration;
use transport::{HostConnector, HostStream, SerialConnector, TcpListenConnector};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// First delay before reopening a port that failed to open
const REOPEN_DELAY: Duration = Duration::from_secs(1);
const MAX_REOPEN_DELAY: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stderr keeps a stdio-attached port clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = GatewayConfig::from_env()?;
    info!("HFP-AG gateway {} starting", command::handlers::GATEWAY_VERSION);
    info!("  Host port: {:?}", config.port);

    let (output, outbound) = Output::channel();
    // Attached only while a host session runs
    output.set_attached(false);
    let (sink, events) = EventSink::channel();

    // Simulated vendor backends
    let hfp_ag: Arc<dyn HfpAgStack> = Arc::new(SimHfpAg::new());
    let i2s: Arc<dyn I2sDriver> = Arc::new(SimI2s::new());

    let registry = RegistryBuilder::new(config.registry_capacity)
        .with(BaseCommands)
        .with(HfpAgCommands::new(hfp_ag.clone(), sink))
        .with(I2sCommands::new(i2s))
        .build();
    info!("{} commands registered", registry.len());
    let dispatcher = Dispatcher::new(registry, output.clone());

    let translator = EventTranslator::new(output.clone(), hfp_ag);
    tokio::spawn(translator.run(events));

    let session = Session {
        dispatcher: &dispatcher,
        output: &output,
        max_line_len: config.max_line_len,
    };

    match config.port {
        HostPortConfig::Serial { path, baud } => {
            serve(SerialConnector::new(path, baud), &session, outbound).await
        }
        HostPortConfig::Tcp { address } => {
            let connector = TcpListenConnector::new(address);
            connector.bind().await?;
            serve(connector, &session, outbound).await
        }
    }
}

/// Open the host port and run sessions on it forever
async fn serve<C: HostConnector>(
    connector: C,
    session: &Session<'_>,
    mut outbound: OutputReceiver,
) -> Result<()> {
    let mut reopen_delay = REOPEN_DELAY;

    loop {
        match connector.open().await {
            Ok(mut stream) => {
                reopen_delay = REOPEN_DELAY;
                info!("{} session started", connector.name());

                match session.run(&mut stream, &mut outbound).await {
                    Ok(()) => info!("{} session ended", connector.name()),
                    Err(e) => warn!("{} session failed: {:#}", connector.name(), e),
                }
                if let Err(e) = stream.shutdown().await {
                    warn!("{} shutdown failed: {}", connector.name(), e);
                }
                continue;
            }
            Err(e) => {
                error!("{} unavailable: {:#}", connector.name(), e);
            }
        }

        tokio::time::sleep(reopen_delay).await;

        // Exponential backoff
        reopen_delay = std::cmp::min(reopen_delay * 2, MAX_REOPEN_DELAY);
    }
}
