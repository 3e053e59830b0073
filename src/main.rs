use anyhow::Result;
use navqueue::{
    CommandQueue, CommandType, Dispatcher, QueueConfig, SimulatedExecutor, StaticDisplays,
};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = QueueConfig {
        command_timeout: Duration::from_secs(2),
        max_pending: 8,
        ..Default::default()
    };

    info!("Navigation queue starting");
    info!("  Command timeout: {}ms", config.command_timeout.as_millis());
    info!("  Max pending commands: {}", config.max_pending);

    // Two displays; transitions on the second one hang to show the timeout
    let displays = Arc::new(StaticDisplays::new([0, 1]));
    let executor = Arc::new(SimulatedExecutor::default());
    executor.stall(1).await;

    let queue = CommandQueue::new(executor.clone(), &config);
    let dispatcher = Dispatcher::new(queue, displays.clone(), config);

    let mut handles = Vec::new();
    handles.extend(dispatcher.add_command_default(CommandType::ShowOverview));
    handles.extend(dispatcher.add_commands_for_all_displays(CommandType::Home));
    handles.extend(dispatcher.add_commands_for_displays_except(CommandType::ToggleOverview, 1));

    // A display removed after submission still gets its queued command
    displays.connect(2);
    handles.extend(dispatcher.add_commands_for_displays_except(CommandType::QuickSwitch, 0));
    displays.disconnect(2);

    if let Some(snapshot) = dispatcher.queue().snapshot().await {
        info!("{}", snapshot);
    }

    for handle in &handles {
        let status = handle.wait_for_terminal().await;
        if status.is_terminal() {
            info!("{} finished", handle);
        } else {
            warn!("{} never finished", handle);
        }
    }

    // Wait for the commands behind the last returned handle
    while dispatcher.queue().outstanding() > 0 {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    info!(
        "Overview visible on display 0: {}",
        executor.is_overview_visible(0).await
    );
    info!("Navigation queue idle, exiting");

    Ok(())
}
