pub mod bt_peer;
pub mod message;
pub mod peer_session;
pub mod session_error;
pub mod session_status;
