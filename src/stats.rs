use crate::game::Session;

/// Counters shown beside the board. Derived fresh from the session on every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub clicks: u32,
    pub pairs_matched: usize,
    pub pairs_left: usize,
    pub total_pairs: usize,
    pub time_left: u32,
}

impl From<&Session> for Stats {
    fn from(session: &Session) -> Self {
        Self {
            clicks: session.clicks(),
            pairs_matched: session.pairs_matched(),
            pairs_left: session.total_pairs().saturating_sub(session.pairs_matched()),
            total_pairs: session.total_pairs(),
            time_left: session.time_left(),
        }
    }
}
