use enet_packets::{FrameError, MacAddr};
use failure::Fail;
use std::io;

#[derive(Debug, Fail)]
pub enum ProbeError {
    #[fail(display = "invalid value for --{}: {}", arg, reason)]
    Config { arg: &'static str, reason: String },

    #[fail(display = "no interface has MAC address {}", _0)]
    NoInterface(MacAddr),

    #[fail(display = "{} failed: {}", context, source)]
    Io {
        context: &'static str,
        #[cause]
        source: io::Error,
    },

    #[fail(display = "{}", _0)]
    Frame(#[cause] FrameError),

    #[fail(display = "could not install log subscriber: {}", _0)]
    Logging(String),
}

impl ProbeError {
    pub fn config(arg: &'static str, reason: impl Into<String>) -> Self {
        ProbeError::Config {
            arg,
            reason: reason.into(),
        }
    }

    pub fn io(context: &'static str, source: io::Error) -> Self {
        ProbeError::Io { context, source }
    }
}

impl From<FrameError> for ProbeError {
    fn from(err: FrameError) -> Self {
        ProbeError::Frame(err)
    }
}
