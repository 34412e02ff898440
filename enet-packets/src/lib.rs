mod types;
pub use self::types::*;

mod error;
pub use self::error::*;

mod checksum;
pub use self::checksum::*;

mod ethernet;
pub use self::ethernet::*;

mod codec;
pub use self::codec::*;

mod frame;
pub use self::frame::*;
