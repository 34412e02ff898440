use crate::{config::SenderConfig, link, ProbeError};
use enet_packets::ProbeFrame;
use tokio::time;
use tracing::{debug, info};

/// The frame the sender repeats: built once, since the payload never changes.
pub fn build_frame(config: &SenderConfig) -> Result<Vec<u8>, ProbeError> {
    let codec = config.link.codec();
    let frame = ProbeFrame::encode(
        config.link.peer,
        config.link.local,
        codec.as_ref(),
        config.message.as_bytes(),
    )?;
    Ok(frame)
}

/// Sends the frame once per interval until `count` frames are out (or forever when it is 0).
pub async fn run(config: SenderConfig) -> Result<(), ProbeError> {
    let frame = build_frame(&config)?;
    let (mut sock, _) = link::open(&config.link)?;
    debug!(len = frame.len(), mode = ?config.link.mode, "frame built");

    let mut ticker = time::interval(config.interval);
    let mut sent: u64 = 0;
    loop {
        ticker.tick().await;
        sock.send(&frame)
            .await
            .map_err(|e| ProbeError::io("sending frame", e))?;
        sent += 1;
        info!(sent, "Packet sent");

        if config.is_done(sent) {
            return Ok(());
        }
    }
}
