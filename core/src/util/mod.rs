pub mod cmdline;
pub mod paths;

mod ring_bytes;
pub use ring_bytes::RingBytes;
