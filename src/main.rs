//! RF Data Converter Controller Main Application
//!
//! Entry point for the converter controller firmware.
//! Resolves the board clock plan, prepares the Tx path and spawns tasks.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use rfdc_clock::clock::overrides::OverrideTable;
use rfdc_clock::datapath::shared::SharedDataPath;
use rfdc_clock::prelude::*;

/// Tx data path shared by the control tasks
static TX_PATH: SharedDataPath = SharedDataPath::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RFDC Controller Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // Built-in rows; board-specific rows can be pushed after these
    match OverrideTable::<OVERRIDE_TABLE_CAPACITY>::with_defaults() {
        Ok(overrides) => {
            let clocks = default_clocks();
            match resolve_with(overrides.as_slice(), clocks) {
                Ok(resolution) => info!("Clock plan {}: {}", clocks, resolution.dividers),
                Err(err) => error!("Clock plan {} rejected: {}", clocks, err),
            }
        }
        Err(err) => error!("Override table: {}", err),
    }

    info!("Rx global: {}", RX_GLOBAL);
    for (ch, rx) in RX_DEFAULT_CHANNELS.iter().enumerate() {
        info!("Rx channel {}: {}", ch, rx);
    }
    for (ch, tx) in TX_DEFAULT_CHANNELS.iter().enumerate() {
        info!("Tx channel {}: {}", ch, tx);
    }
    if let Err(err) = validate_plan(&RX_DEFAULT_CHANNELS, &TX_DEFAULT_CHANNELS) {
        error!("Channel plan rejected: {}", err);
    }

    for (pair, tone) in DEFAULT_TONES.iter().enumerate() {
        let settings = tone.settings();
        info!(
            "DDS pair {}: {} Hz, raw={}",
            pair, settings.tone1_q.freq_hz, settings.raw
        );
    }
    // DDS owns the Tx path whenever any tone is enabled
    let raw = DEFAULT_TONES.iter().any(|tone| tone.enabled);
    match TX_PATH.set_raw(raw) {
        Ok(mode) => info!("Tx path: {} ({})", mode, TX_PATH.state()),
        Err(err) => error!("Tx path: {}", err),
    }

    spawner.spawn(heartbeat_task(led)).unwrap();

    loop {
        Timer::after(Duration::from_secs(10)).await;
        info!("Main loop tick");
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
