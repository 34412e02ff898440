use crate::{config::ResponderConfig, link, quotes::QuoteBook, ProbeError};
use enet_packets::{FrameError, FrameKind, MacAddr, PayloadCodec, ProbeFrame, HEADER_LEN};
use std::convert::TryInto;
use tracing::{debug, info, trace, warn};

/// A peer frame that decoded to text, and what we answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub kind: FrameKind,
    pub received: String,
    pub reply: &'static str,
    /// The reply, ready for the wire.
    pub frame: Vec<u8>,
}

/// What the responder makes of one received frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not from the peer (or too short to tell).
    Ignored,
    /// From the peer, but the payload could not be decoded.
    Invalid(FrameError),
    /// From the peer, decoded, but not UTF-8.
    NotText(Vec<u8>),
    Reply(Exchange),
}

pub struct Responder {
    local: MacAddr,
    peer: MacAddr,
    codec: Box<dyn PayloadCodec>,
    quotes: QuoteBook,
}

impl Responder {
    pub fn new(
        local: MacAddr,
        peer: MacAddr,
        codec: Box<dyn PayloadCodec>,
        quotes: QuoteBook,
    ) -> Self {
        Responder {
            local,
            peer,
            codec,
            quotes,
        }
    }

    pub fn from_config(config: &ResponderConfig) -> Self {
        Responder::new(
            config.link.local,
            config.link.peer,
            config.link.codec(),
            QuoteBook::new(),
        )
    }

    pub fn handle(&self, bytes: &[u8]) -> Verdict {
        if bytes.len() < HEADER_LEN {
            return Verdict::Ignored;
        }
        let src = MacAddr::new(bytes[6..12].try_into().unwrap());
        if src != self.peer {
            return Verdict::Ignored;
        }

        let frame = match ProbeFrame::decode(bytes, self.codec.as_ref()) {
            Ok(frame) => frame,
            Err(err) => return Verdict::Invalid(err),
        };
        let received = match String::from_utf8(frame.message) {
            Ok(text) => text,
            Err(err) => return Verdict::NotText(err.into_bytes()),
        };

        let reply = self.quotes.reply_to(&received);
        match ProbeFrame::encode(self.peer, self.local, self.codec.as_ref(), reply.as_bytes()) {
            Ok(reply_frame) => Verdict::Reply(Exchange {
                kind: frame.kind,
                received,
                reply,
                frame: reply_frame,
            }),
            Err(err) => Verdict::Invalid(err),
        }
    }
}

/// Listens until the socket fails, answering every frame from the peer.
pub async fn run(config: ResponderConfig) -> Result<(), ProbeError> {
    let responder = Responder::from_config(&config);
    let (mut sock, _) = link::open(&config.link)?;
    sock.set_promiscuous(true)
        .map_err(|e| ProbeError::io("enabling promiscuous mode", e))?;

    info!(peer = %config.link.peer, mode = ?config.link.mode, "Listening");
    let mut buf = vec![0u8; link::RECV_BUF_LEN];
    loop {
        let (len, addr) = sock
            .recv(&mut buf)
            .await
            .map_err(|e| ProbeError::io("receiving frame", e))?;
        if addr.is_outgoing() {
            continue;
        }

        match responder.handle(&buf[..len]) {
            Verdict::Ignored => trace!(len, "frame ignored"),
            Verdict::Invalid(err) => {
                info!(len, ">>> >>> Received packet");
                warn!(error = %err, "Invalid packet");
            }
            Verdict::NotText(bytes) => {
                info!(len, ">>> >>> Received packet");
                warn!(payload = ?bytes, "Invalid packet: payload is not UTF-8");
            }
            Verdict::Reply(exchange) => {
                info!(len, kind = ?exchange.kind, ">>> >>> Received packet");
                info!("Received data: {}", exchange.received);
                info!("Reply: {}", exchange.reply);
                if config.reply {
                    info!("Sending reply: {}", exchange.reply);
                    sock.send(&exchange.frame)
                        .await
                        .map_err(|e| ProbeError::io("sending reply", e))?;
                } else {
                    debug!("reply not sent (--no-reply)");
                }
            }
        }
    }
}
