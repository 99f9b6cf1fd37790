//! Headless whiteboard client
//!
//! Run with:
//! ```bash
//! cargo run -p whiteboard-client --bin whiteboard
//! ```
//!
//! Connects to the broker, draws a short stroke on the publish channel and
//! renders whatever arrives on the subscribed channels until the configured
//! duration elapses.

use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};
use whiteboard_client::{ui_context, Communicator, RasterCanvas, Whiteboard, WsConnector};
use whiteboard_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use whiteboard_core::Channel;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, code = e.error_code(), "Whiteboard failed");
        eprintln!("whiteboard: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        publisher = %config.publisher.address(),
        binding_name = %config.publisher.binding_name,
        workers = config.dispatcher.worker_threads,
        "Configuration loaded"
    );

    let palette = config.whiteboard.palette()?;
    let (ui, queue) = ui_context();
    let communicator = Arc::new(Communicator::new(
        &config.dispatcher,
        Arc::new(WsConnector::from_config(&config.publisher)),
        ui,
    ));
    let canvas = RasterCanvas::new(config.whiteboard.width, config.whiteboard.height);
    let mut board = Whiteboard::new(palette, canvas, queue, communicator)?;

    if let Some(name) = &config.demo.publish_channel {
        board.select_publish_channel(&Channel::from(name.as_str()))?;
    }

    let subscribe: Vec<Channel> = match &config.demo.subscribe_channels {
        Some(names) => names.iter().map(|n| Channel::from(n.as_str())).collect(),
        None => board.palette().channels().to_vec(),
    };
    for channel in &subscribe {
        if let Err(e) = board.set_subscribed(channel, true) {
            warn!(channel = %channel, error = %e, "Subscription skipped");
        }
    }

    if !board.connect_to_publisher().await {
        warn!("Publisher unreachable, drawing locally only");
    }

    draw_stroke(&mut board);

    let rendered = render_until(&mut board, Instant::now() + config.demo.duration()).await;
    info!(
        rendered,
        painted_pixels = board.surface().painted_pixels(),
        "Demo finished"
    );

    board.stop().await;
    Ok(())
}

/// A short diagonal stroke from the upper-left corner
fn draw_stroke(board: &mut Whiteboard<RasterCanvas>) {
    board.pointer_pressed(20.0, 20.0);
    for step in 1..=10 {
        let offset = 20.0 + f64::from(step) * 8.0;
        board.pointer_dragged(offset, offset);
    }
}

async fn render_until(board: &mut Whiteboard<RasterCanvas>, deadline: Instant) -> usize {
    let mut rendered = 0;
    loop {
        match timeout_at(deadline, board.process_next()).await {
            Ok(Some(count)) => rendered += count,
            // UI context closed or deadline reached
            Ok(None) | Err(_) => break,
        }
    }
    // Anything that raced the deadline
    rendered + board.process_pending()
}
