pub const DEFAULT_ANNOUNCE_PORT: u16 = 80;
pub const DEFAULT_TLS_PORT: u16 = 443;
