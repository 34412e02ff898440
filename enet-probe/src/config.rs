//! Command line configuration shared by `enet-sender` and `enet-responder`.

use crate::ProbeError;
use clap::{App, Arg, ArgMatches};
use enet_packets::{MacAddr, PayloadCodec, PlainCodec, SecureCodec};
use std::convert::TryInto;
use std::time::Duration;

/// MAC address of the PC running the tools.
pub const DEFAULT_LOCAL_MAC: &str = "00:2b:67:36:70:0f";
/// MAC address of the board under test.
pub const DEFAULT_PEER_MAC: &str = "54:27:8d:24:2a:f2";
pub const DEFAULT_KEY: &str = "My16byteKey00000";
pub const DEFAULT_MESSAGE: &str = "Reading data from the network";
pub const DEFAULT_INTERVAL_SECS: &str = "3";
/// Longest accepted `--interval`: one day.
pub const MAX_INTERVAL_SECS: f64 = 86_400.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Length field, message, dummy trailer.
    Plain,
    /// AES-128-CBC plus CRC-32, as the board's protocol layer sends it.
    Secure,
}

/// Where and how frames are exchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    /// Interface to bind. When absent, the interface owning `local` is used.
    pub interface: Option<String>,
    pub local: MacAddr,
    pub peer: MacAddr,
    pub mode: Mode,
    pub key: [u8; 16],
    pub iv: [u8; 16],
    pub verbosity: u64,
}

impl LinkConfig {
    pub fn codec(&self) -> Box<dyn PayloadCodec> {
        match self.mode {
            Mode::Plain => Box::new(PlainCodec),
            Mode::Secure => Box::new(SecureCodec::new(self.key, self.iv)),
        }
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, ProbeError> {
        let mode = match matches.value_of("mode") {
            Some("secure") => Mode::Secure,
            _ => Mode::Plain,
        };
        Ok(LinkConfig {
            interface: matches.value_of("interface").map(str::to_string),
            local: parse_mac(matches, "local-mac")?,
            peer: parse_mac(matches, "peer-mac")?,
            mode,
            key: parse_block(matches, "key")?,
            iv: parse_block(matches, "iv")?,
            verbosity: matches.occurrences_of("verbose"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderConfig {
    pub link: LinkConfig,
    pub message: String,
    pub interval: Duration,
    /// Number of frames to send; 0 sends until interrupted.
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponderConfig {
    pub link: LinkConfig,
    /// Put replies on the wire, not just on the console.
    pub reply: bool,
}

fn link_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name("interface")
            .short("i")
            .long("interface")
            .value_name("IFACE")
            .help("Network interface to use (default: the one owning --local-mac)")
            .takes_value(true),
    )
    .arg(
        Arg::with_name("local-mac")
            .long("local-mac")
            .value_name("MAC")
            .help("MAC address of this machine")
            .default_value(DEFAULT_LOCAL_MAC)
            .takes_value(true),
    )
    .arg(
        Arg::with_name("peer-mac")
            .long("peer-mac")
            .value_name("MAC")
            .help("MAC address of the board")
            .default_value(DEFAULT_PEER_MAC)
            .takes_value(true),
    )
    .arg(
        Arg::with_name("mode")
            .short("m")
            .long("mode")
            .help("Payload encoding")
            .possible_values(&["plain", "secure"])
            .default_value("plain")
            .takes_value(true),
    )
    .arg(
        Arg::with_name("key")
            .long("key")
            .value_name("16 CHARS")
            .help("AES-128 key for --mode secure")
            .default_value(DEFAULT_KEY)
            .takes_value(true),
    )
    .arg(
        Arg::with_name("iv")
            .long("iv")
            .value_name("16 CHARS")
            .help("AES-128 IV for --mode secure")
            .default_value(DEFAULT_KEY)
            .takes_value(true),
    )
    .arg(
        Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .help("More logging; repeat for trace (RUST_LOG overrides)"),
    )
}

pub fn sender_app() -> App<'static, 'static> {
    link_args(
        App::new("enet-sender")
            .version("0.1")
            .author("enet-probe Contributors")
            .about("Periodically sends a fixed payload in a raw Ethernet frame"),
    )
    .arg(
        Arg::with_name("message")
            .long("message")
            .value_name("TEXT")
            .help("Payload to send")
            .default_value(DEFAULT_MESSAGE)
            .takes_value(true),
    )
    .arg(
        Arg::with_name("interval")
            .long("interval")
            .value_name("SECONDS")
            .help("Time between frames")
            .default_value(DEFAULT_INTERVAL_SECS)
            .takes_value(true),
    )
    .arg(
        Arg::with_name("count")
            .short("c")
            .long("count")
            .value_name("N")
            .help("Stop after N frames (0 = run until interrupted)")
            .default_value("0")
            .takes_value(true),
    )
}

pub fn responder_app() -> App<'static, 'static> {
    link_args(
        App::new("enet-responder")
            .version("0.1")
            .author("enet-probe Contributors")
            .about("Answers quotations sent by the board over raw Ethernet"),
    )
    .arg(
        Arg::with_name("no-reply")
            .long("no-reply")
            .help("Only print replies, do not send them"),
    )
}

impl SenderConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ProbeError> {
        let interval = value(matches, "interval")
            .parse::<f64>()
            .ok()
            .filter(|secs| *secs > 0.0 && *secs <= MAX_INTERVAL_SECS)
            .ok_or_else(|| {
                ProbeError::config(
                    "interval",
                    format!("expected seconds in (0, {}]", MAX_INTERVAL_SECS),
                )
            })?;
        let count = value(matches, "count")
            .parse::<u64>()
            .map_err(|e| ProbeError::config("count", e.to_string()))?;

        Ok(SenderConfig {
            link: LinkConfig::from_matches(matches)?,
            message: value(matches, "message").to_string(),
            interval: Duration::from_secs_f64(interval),
            count,
        })
    }

    /// Parses an argument list (program name first).
    pub fn from_args<I, T>(args: I) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = sender_app()
            .get_matches_from_safe(args)
            .map_err(|e| ProbeError::config("args", e.message))?;
        SenderConfig::from_matches(&matches)
    }

    /// Whether the sender stops once `sent` frames are out.
    pub fn is_done(&self, sent: u64) -> bool {
        self.count != 0 && sent >= self.count
    }
}

impl ResponderConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ProbeError> {
        Ok(ResponderConfig {
            link: LinkConfig::from_matches(matches)?,
            reply: !matches.is_present("no-reply"),
        })
    }

    /// Parses an argument list (program name first).
    pub fn from_args<I, T>(args: I) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = responder_app()
            .get_matches_from_safe(args)
            .map_err(|e| ProbeError::config("args", e.message))?;
        ResponderConfig::from_matches(&matches)
    }
}

// Every caller asks for an argument that has a default value.
fn value<'m>(matches: &'m ArgMatches, name: &str) -> &'m str {
    matches.value_of(name).unwrap_or_default()
}

fn parse_mac(matches: &ArgMatches, arg: &'static str) -> Result<MacAddr, ProbeError> {
    value(matches, arg)
        .parse()
        .map_err(|e: enet_packets::FrameError| ProbeError::config(arg, e.to_string()))
}

fn parse_block(matches: &ArgMatches, arg: &'static str) -> Result<[u8; 16], ProbeError> {
    let raw = value(matches, arg);
    raw.as_bytes().try_into().map_err(|_| {
        ProbeError::config(arg, format!("expected 16 bytes, got {}", raw.len()))
    })
}
