use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

use crate::content::{Artwork, CreatureRef};
use crate::difficulty::Difficulty;
use crate::fetch::FetchCommand;
use crate::game::{GameEvent, Session};

/// Owns the current session and replaces it on start, reset and difficulty change.
///
/// Network work is not done here: methods hand back the `FetchCommand`s the
/// caller should dispatch, and results come back in through `on_roster` and
/// `on_artwork` tagged with the epoch that asked for them.
#[derive(Debug)]
pub struct Controller {
    session: Session,
    last_epoch: u64,
    rng: StdRng,
    api_base: String,
}

impl Controller {
    /// Build the first session (no timer yet) and the request that fills it
    pub fn new(difficulty: Difficulty, api_base: &str, seed: Option<u64>) -> (Self, FetchCommand) {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut controller = Self {
            session: Session::new(0, difficulty),
            last_epoch: 0,
            rng,
            api_base: api_base.to_string(),
        };
        let cmd = controller.begin(difficulty, false);
        (controller, cmd)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch()
    }

    /// Fresh session with the countdown running
    pub fn start(&mut self) -> FetchCommand {
        self.begin(self.session.difficulty(), true)
    }

    /// Fresh session, countdown stopped
    pub fn reset(&mut self) -> FetchCommand {
        self.begin(self.session.difficulty(), false)
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> FetchCommand {
        self.begin(difficulty, false)
    }

    fn begin(&mut self, difficulty: Difficulty, with_timer: bool) -> FetchCommand {
        // the old countdown must be dead before a new one exists
        self.session.stop_timer();

        self.last_epoch += 1;
        self.session = Session::new(self.last_epoch, difficulty);
        if with_timer {
            self.session.start_timer();
        }
        info!(
            epoch = self.last_epoch,
            %difficulty,
            timer = with_timer,
            "new session"
        );

        FetchCommand::Roster {
            epoch: self.last_epoch,
            pairs: self.session.total_pairs(),
        }
    }

    /// Deal the board if the roster belongs to the current session; returns
    /// one artwork request per card.
    pub fn on_roster(&mut self, epoch: u64, pool: Vec<CreatureRef>) -> Vec<FetchCommand> {
        if epoch != self.session.epoch() {
            debug!(
                stale = epoch,
                current = self.session.epoch(),
                "dropping roster for a discarded session"
            );
            return vec![];
        }

        if self
            .session
            .deal(pool, &self.api_base, &mut self.rng)
            .is_empty()
        {
            return vec![];
        }

        self.session
            .artwork_requests()
            .into_iter()
            .map(|(index, url)| FetchCommand::Artwork { epoch, index, url })
            .collect()
    }

    pub fn on_artwork(&mut self, epoch: u64, index: usize, artwork: Artwork) -> Vec<GameEvent> {
        self.session.apply_artwork(epoch, index, artwork)
    }

    pub fn select(&mut self, index: usize) -> Vec<GameEvent> {
        self.session.select(index)
    }

    pub fn use_power_up(&mut self) -> Vec<GameEvent> {
        self.session.use_power_up()
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        self.session.advance(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentId, DEFAULT_API_BASE};
    use assert_matches::assert_matches;

    fn pool(n: u32) -> Vec<CreatureRef> {
        (1..=n)
            .map(|i| CreatureRef {
                id: ContentId(i),
                name: format!("mon{i}"),
                detail_url: format!("https://pokeapi.co/api/v2/pokemon/{i}/"),
            })
            .collect()
    }

    #[test]
    fn test_new_requests_roster_for_first_epoch() {
        let (controller, cmd) = Controller::new(Difficulty::Medium, DEFAULT_API_BASE, Some(1));
        assert_eq!(cmd, FetchCommand::Roster { epoch: 1, pairs: 6 });
        assert_eq!(controller.epoch(), 1);
        assert!(!controller.session().timer_running());
    }

    #[test]
    fn test_each_session_gets_a_new_epoch() {
        let (mut controller, _) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(1));
        assert_matches!(controller.start(), FetchCommand::Roster { epoch: 2, pairs: 3 });
        assert!(controller.session().timer_running());
        assert_matches!(controller.reset(), FetchCommand::Roster { epoch: 3, .. });
        assert!(!controller.session().timer_running());
        assert_matches!(
            controller.change_difficulty(Difficulty::Hard),
            FetchCommand::Roster { epoch: 4, pairs: 9 }
        );
        assert_eq!(controller.session().difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_roster_deals_and_requests_artwork_per_card() {
        let (mut controller, _) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(3));
        let cmds = controller.on_roster(1, pool(30));

        assert_eq!(cmds.len(), 6);
        for (pos, cmd) in cmds.iter().enumerate() {
            assert_matches!(cmd, FetchCommand::Artwork { epoch: 1, index, .. } if *index == pos);
        }
        assert!(controller.session().is_dealt());
    }

    #[test]
    fn test_stale_roster_is_ignored() {
        let (mut controller, _) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(3));
        controller.reset();
        assert!(controller.on_roster(1, pool(30)).is_empty());
        assert!(!controller.session().is_dealt());
        assert_eq!(controller.on_roster(2, pool(30)).len(), 6);
    }

    #[test]
    fn test_duplicate_roster_does_not_redeal() {
        let (mut controller, _) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(3));
        controller.on_roster(1, pool(30));
        let board = controller.session().board().clone();
        assert!(controller.on_roster(1, pool(30)).is_empty());
        assert_eq!(controller.session().board(), &board);
    }

    #[test]
    fn test_seed_makes_deal_repeatable() {
        let (mut a, _) = Controller::new(Difficulty::Hard, DEFAULT_API_BASE, Some(77));
        let (mut b, _) = Controller::new(Difficulty::Hard, DEFAULT_API_BASE, Some(77));
        a.on_roster(1, pool(100));
        b.on_roster(1, pool(100));
        assert_eq!(a.session().board(), b.session().board());
    }

    #[test]
    fn test_reset_drops_pending_mismatch() {
        let (mut controller, _) = Controller::new(Difficulty::Medium, DEFAULT_API_BASE, Some(5));
        controller.on_roster(1, pool(30));

        let cards = controller.session().board().cards().to_vec();
        let second = (1..cards.len())
            .find(|i| cards[*i].content != cards[0].content)
            .unwrap();
        controller.select(0);
        controller.select(second);
        assert!(controller.session().is_locked());

        controller.reset();
        controller.on_roster(2, pool(30));
        assert!(controller.advance(Duration::from_secs(2)).is_empty());
        assert!(!controller.session().is_locked());
        assert_eq!(controller.session().clicks(), 0);
    }
}
