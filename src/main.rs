use crate::geocoder::google::GoogleGeocoderProvider;
use crate::panel::GeocodePanel;
use crate::watcher::LoiWatcher;
use anyhow::Result;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing::info;

mod geocoder;
mod panel;
mod utils;
mod watcher;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let panel = GeocodePanel::new();
    let service = GoogleGeocoderProvider::from_env()?;

    let mut watcher = LoiWatcher::new(panel.clone(), service);
    watcher.start();

    info!("Type a place name and press enter; ctrl-d to quit");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        panel.loi.enter_text(line.trim_end());

        // One poll period plus headroom for the request round-trip
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let text = panel.output.text();
        if panel.output.has_error() {
            println!("{text}");
        } else if !text.is_empty() {
            println!("lng={} lat={} {}", panel.lng.value(), panel.lat.value(), text);
        }
    }

    watcher.stop();
    Ok(())
}
