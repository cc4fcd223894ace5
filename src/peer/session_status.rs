/// Local flow-control state of a peer session, from our side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub peer_is_choking_us: bool,
    pub am_interested: bool,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            peer_is_choking_us: true,
            am_interested: false,
        }
    }
}
