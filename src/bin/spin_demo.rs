//! Headless run of one player session: login, spin until the allotment is
//! used up, print the win history. Cues go to the log through `LogFeedback`.

use std::sync::Arc;

use anyhow::Context;

use naughty_spin::{
    AppError,
    config::Config,
    sequencer::{LogFeedback, SpinOutcome, SpinSequencer},
    services::{MockBackend, Session},
    utils::init_json_logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_json_logger();

    let config = Config::from_toml().context("Failed to load configuration file")?;
    let username = std::env::args().nth(1).unwrap_or_else(|| "demo-player".to_string());

    let backend = MockBackend::new(config.latency, config.seed);
    let session = Session::new(backend.clone());
    let user = session.login(&username, "demo").await?;
    log::info!("Logged in as {} with {} spins", user.username, user.spins);

    let prizes = backend.fetch_prizes().await?;
    let feedback = Arc::new(LogFeedback::new());
    let sequencer = SpinSequencer::new(backend.clone(), config.spin, prizes.len(), feedback.clone());

    loop {
        match sequencer.spin(&session).await {
            Ok(SpinOutcome::Revealed(reveal)) => {
                log::info!(
                    "Wheel stopped on segment {}, backend awarded {}",
                    reveal.landing_segment,
                    reveal.prize.full_name
                );
                sequencer.dismiss_result().await;
            }
            Ok(other) => {
                log::warn!("Spin did not complete: {other:?}");
                break;
            }
            Err(AppError::NoSpinsLeft) => break,
            Err(e) => return Err(e.into()),
        }
    }

    for win in sequencer.history().await {
        log::info!("{} {}", win.time.format("%H:%M:%S"), win.prize.full_name);
    }
    log::info!("{} ticks played", feedback.ticks());

    sequencer.close().await;
    session.logout().await?;
    Ok(())
}
