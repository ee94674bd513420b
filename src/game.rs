use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

use crate::board::{Board, Card};
use crate::content::{Artwork, ContentId, CreatureRef};
use crate::countdown::Countdown;
use crate::difficulty::Difficulty;

/// Matched pairs needed before the reveal power-up unlocks
pub const POWER_UP_THRESHOLD: usize = 3;
pub const MISMATCH_DELAY: Duration = Duration::from_secs(1);
pub const REVEAL_DURATION: Duration = Duration::from_secs(3);

/// Where the current turn stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Idle,
    OneSelected(usize),
    Resolving(usize, usize),
}

impl Turn {
    pub fn contains(&self, index: usize) -> bool {
        match *self {
            Turn::Idle => false,
            Turn::OneSelected(a) => a == index,
            Turn::Resolving(a, b) => a == index || b == index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    Locked,
    Ready,
    Revealing,
    Spent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    TimedOut,
}

/// Something that changed; every event means the stats need redrawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Dealt { cards: usize },
    Flipped { index: usize },
    Matched { content: ContentId, pairs_matched: usize },
    Mismatched { first: usize, second: usize },
    Hidden { first: usize, second: usize },
    PowerUpReady,
    RevealStarted,
    RevealEnded,
    Tick { time_left: u32 },
    Won,
    TimedOut,
    ArtworkResolved { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delayed {
    HideMismatch(usize, usize),
    EndReveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    due: Duration,
    action: Delayed,
}

/// One game from deal to win or timeout.
///
/// A session is never reused: start, reset and difficulty changes all build a
/// new one with a fresh epoch. Delayed actions and the countdown live on the
/// session's own clock, so dropping the session drops them too.
#[derive(Debug, Clone)]
pub struct Session {
    epoch: u64,
    difficulty: Difficulty,
    board: Board,
    dealt: bool,
    turn: Turn,
    clicks: u32,
    pairs_matched: usize,
    total_pairs: usize,
    time_left: u32,
    countdown: Option<Countdown>,
    power_up: PowerUp,
    outcome: Option<Outcome>,
    clock: Duration,
    pending: Vec<Pending>,
}

impl Session {
    pub fn new(epoch: u64, difficulty: Difficulty) -> Self {
        let setting = difficulty.setting();
        Self {
            epoch,
            difficulty,
            board: Board::default(),
            dealt: false,
            turn: Turn::Idle,
            clicks: 0,
            pairs_matched: 0,
            total_pairs: setting.pairs,
            time_left: setting.time_budget_secs,
            countdown: None,
            power_up: PowerUp::Locked,
            outcome: None,
            clock: Duration::ZERO,
            pending: Vec::new(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_dealt(&self) -> bool {
        self.dealt
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn pairs_matched(&self) -> usize {
        self.pairs_matched
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn power_up(&self) -> PowerUp {
        self.power_up
    }

    pub fn power_up_available(&self) -> bool {
        self.power_up == PowerUp::Ready
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn timer_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    /// Input is refused while a pair resolves, during a reveal, and once the game is over
    pub fn is_locked(&self) -> bool {
        matches!(self.turn, Turn::Resolving(..))
            || self.power_up == PowerUp::Revealing
            || self.outcome.is_some()
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        match self.board.get(index) {
            Some(card) => {
                card.matched || self.power_up == PowerUp::Revealing || self.turn.contains(index)
            }
            None => false,
        }
    }

    /// Lay out the deck. Only the first call has any effect.
    pub fn deal<R: Rng>(
        &mut self,
        pool: Vec<CreatureRef>,
        api_base: &str,
        rng: &mut R,
    ) -> Vec<GameEvent> {
        if self.dealt {
            return vec![];
        }

        self.board = Board::deal(pool, self.total_pairs, api_base, rng);
        self.dealt = true;
        debug!(epoch = self.epoch, cards = self.board.len(), "board dealt");

        vec![GameEvent::Dealt {
            cards: self.board.len(),
        }]
    }

    /// Cards that still need their artwork fetched
    pub fn artwork_requests(&self) -> Vec<(usize, String)> {
        self.board
            .cards()
            .iter()
            .filter(|c| c.artwork.is_none())
            .map(|c| (c.index, c.detail_url.clone()))
            .collect()
    }

    /// Apply resolved artwork; results from an older epoch are dropped.
    pub fn apply_artwork(&mut self, epoch: u64, index: usize, artwork: Artwork) -> Vec<GameEvent> {
        if epoch != self.epoch {
            debug!(
                stale = epoch,
                current = self.epoch,
                index,
                "dropping artwork for a discarded board"
            );
            return vec![];
        }

        match self.board.get_mut(index) {
            Some(card) => {
                card.artwork = Some(artwork);
                vec![GameEvent::ArtworkResolved { index }]
            }
            None => vec![],
        }
    }

    /// Start counting down, replacing any countdown already running
    pub fn start_timer(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.stop_timer();
        self.countdown = Some(Countdown::start());
    }

    pub fn stop_timer(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.cancel();
        }
    }

    pub fn select(&mut self, index: usize) -> Vec<GameEvent> {
        if !self.dealt || self.is_locked() || index >= self.board.len() || self.is_face_up(index)
        {
            return vec![];
        }

        let mut events = vec![];
        match self.turn {
            Turn::Idle => {
                self.turn = Turn::OneSelected(index);
                self.clicks += 1;
                events.push(GameEvent::Flipped { index });
            }
            Turn::OneSelected(first) => {
                self.turn = Turn::Resolving(first, index);
                self.clicks += 1;
                events.push(GameEvent::Flipped { index });
                self.resolve(&mut events);
            }
            Turn::Resolving(..) => {}
        }
        events
    }

    fn resolve(&mut self, events: &mut Vec<GameEvent>) {
        let Turn::Resolving(first, second) = self.turn else {
            return;
        };
        let (Some(a), Some(b)) = (self.board.get(first), self.board.get(second)) else {
            self.turn = Turn::Idle;
            return;
        };

        if a.content == b.content {
            let content = a.content;
            for index in [first, second] {
                if let Some(card) = self.board.get_mut(index) {
                    card.matched = true;
                }
            }
            if self.pairs_matched < self.total_pairs {
                self.pairs_matched += 1;
            }
            self.turn = Turn::Idle;
            events.push(GameEvent::Matched {
                content,
                pairs_matched: self.pairs_matched,
            });

            if self.pairs_matched == POWER_UP_THRESHOLD && self.power_up == PowerUp::Locked {
                self.power_up = PowerUp::Ready;
                events.push(GameEvent::PowerUpReady);
            }
            if self.pairs_matched >= self.total_pairs {
                self.finish(Outcome::Won, events);
            }
        } else {
            events.push(GameEvent::Mismatched { first, second });
            self.schedule(MISMATCH_DELAY, Delayed::HideMismatch(first, second));
        }
    }

    /// Reveal every card for a few seconds. Refused unless the turn is idle.
    pub fn use_power_up(&mut self) -> Vec<GameEvent> {
        if self.power_up != PowerUp::Ready || self.turn != Turn::Idle || self.outcome.is_some() {
            return vec![];
        }

        self.power_up = PowerUp::Revealing;
        self.schedule(REVEAL_DURATION, Delayed::EndReveal);
        vec![GameEvent::RevealStarted]
    }

    /// Move the session clock forward, firing ticks and delayed actions in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let target = self.clock + elapsed;
        let mut events = vec![];

        loop {
            let next_tick = self
                .countdown
                .as_ref()
                .filter(|c| c.is_running())
                .map(|c| self.clock + c.until_next_tick());
            let next_due = self.pending.iter().map(|p| p.due).min();
            let next = match (next_tick, next_due) {
                (Some(tick), Some(due)) => Some(tick.min(due)),
                (tick, due) => tick.or(due),
            };

            let at = match next {
                Some(at) if at <= target => at,
                _ => break,
            };

            let ticks = self.move_clock(at);
            for _ in 0..ticks {
                self.on_tick(&mut events);
            }
            self.fire_due(&mut events);
        }

        self.move_clock(target);
        events
    }

    fn move_clock(&mut self, to: Duration) -> u32 {
        let step = to.saturating_sub(self.clock);
        self.clock = self.clock.max(to);
        match self.countdown.as_mut() {
            Some(countdown) => countdown.advance(step),
            None => 0,
        }
    }

    fn on_tick(&mut self, events: &mut Vec<GameEvent>) {
        if self.outcome.is_some() {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        events.push(GameEvent::Tick {
            time_left: self.time_left,
        });
        if self.time_left == 0 {
            self.finish(Outcome::TimedOut, events);
        }
    }

    fn schedule(&mut self, delay: Duration, action: Delayed) {
        self.pending.push(Pending {
            due: self.clock + delay,
            action,
        });
    }

    fn fire_due(&mut self, events: &mut Vec<GameEvent>) {
        let clock = self.clock;
        let mut due: Vec<Pending> = self.pending.iter().copied().filter(|p| p.due <= clock).collect();
        self.pending.retain(|p| p.due > clock);
        due.sort_by_key(|p| p.due);

        for pending in due {
            match pending.action {
                Delayed::HideMismatch(first, second) => {
                    if self.turn == Turn::Resolving(first, second) {
                        self.turn = Turn::Idle;
                        events.push(GameEvent::Hidden { first, second });
                    }
                }
                Delayed::EndReveal => {
                    if self.power_up == PowerUp::Revealing {
                        self.power_up = PowerUp::Spent;
                        events.push(GameEvent::RevealEnded);
                    }
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.stop_timer();
        info!(
            epoch = self.epoch,
            ?outcome,
            clicks = self.clicks,
            pairs_matched = self.pairs_matched,
            "session over"
        );
        events.push(match outcome {
            Outcome::Won => GameEvent::Won,
            Outcome::TimedOut => GameEvent::TimedOut,
        });
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.board.get(index)
    }
}
