pub mod bitfield;
pub mod handshake;
pub mod message;
