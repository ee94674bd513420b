use std::collections::HashMap;
use std::time::Duration;

use flipdex::content::{ContentId, CreatureRef, DEFAULT_API_BASE};
use flipdex::difficulty::Difficulty;
use flipdex::game::{GameEvent, PowerUp, Session, MISMATCH_DELAY, REVEAL_DURATION};
use rand::{rngs::StdRng, SeedableRng};

fn pool(n: u32) -> Vec<CreatureRef> {
    (1..=n)
        .map(|i| CreatureRef {
            id: ContentId(i),
            name: format!("mon{i}"),
            detail_url: format!("https://pokeapi.co/api/v2/pokemon/{i}/"),
        })
        .collect()
}

fn dealt(difficulty: Difficulty, seed: u64) -> Session {
    let mut session = Session::new(1, difficulty);
    let mut rng = StdRng::seed_from_u64(seed);
    session.deal(pool(200), DEFAULT_API_BASE, &mut rng);
    session
}

/// Positions of each content id on the board
fn positions(session: &Session) -> HashMap<ContentId, Vec<usize>> {
    let mut map: HashMap<ContentId, Vec<usize>> = HashMap::new();
    for card in session.board().cards() {
        map.entry(card.content).or_default().push(card.index);
    }
    map
}

#[test]
fn easy_match_then_mismatch() {
    let mut session = dealt(Difficulty::Easy, 31);
    assert_eq!(session.board().len(), 6);
    assert_eq!(positions(&session).len(), 3);
    assert_eq!(session.time_left(), 60);

    let by_content = positions(&session);
    let mut groups: Vec<&Vec<usize>> = by_content.values().collect();
    groups.sort();

    // A and B share content
    let (a, b) = (groups[0][0], groups[0][1]);
    session.select(a);
    session.select(b);
    assert_eq!(session.pairs_matched(), 1);
    assert_eq!(session.clicks(), 2);

    // C and D differ
    let (c, d) = (groups[1][0], groups[2][0]);
    session.select(c);
    session.select(d);
    assert!(session.is_face_up(c) && session.is_face_up(d));

    session.advance(MISMATCH_DELAY);
    assert!(!session.is_face_up(c) && !session.is_face_up(d));
    assert_eq!(session.pairs_matched(), 1);
    assert_eq!(session.clicks(), 4);
}

#[test]
fn every_difficulty_deals_full_pairs() {
    for (seed, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let session = dealt(difficulty, seed as u64);
        assert_eq!(session.board().len(), 2 * difficulty.pairs());
        assert!(positions(&session).values().all(|p| p.len() == 2));
    }
}

#[test]
fn power_up_reveal_scenario() {
    let mut session = dealt(Difficulty::Medium, 12);
    let by_content = positions(&session);
    let mut groups: Vec<&Vec<usize>> = by_content.values().collect();
    groups.sort();

    let mut ready = 0;
    for group in groups.iter().take(3) {
        session.select(group[0]);
        for event in session.select(group[1]) {
            if event == GameEvent::PowerUpReady {
                ready += 1;
            }
        }
    }
    assert_eq!(ready, 1);
    assert_eq!(session.power_up(), PowerUp::Ready);

    session.use_power_up();
    assert!((0..12).all(|i| session.is_face_up(i)));

    session.advance(REVEAL_DURATION - Duration::from_millis(1));
    assert!((0..12).all(|i| session.is_face_up(i)));

    session.advance(Duration::from_millis(1));
    for card in session.board().cards() {
        assert_eq!(session.is_face_up(card.index), card.matched);
    }
    assert_eq!(session.power_up(), PowerUp::Spent);
}

#[test]
fn win_fires_once_even_with_stray_input() {
    let mut session = dealt(Difficulty::Medium, 5);
    session.start_timer();
    let by_content = positions(&session);

    let mut wins = 0;
    for group in by_content.values() {
        session.select(group[0]);
        for event in session.select(group[1]) {
            if event == GameEvent::Won {
                wins += 1;
            }
        }
    }
    // stray selections and time after the win
    for i in 0..12 {
        assert!(session.select(i).is_empty());
    }
    assert!(session.advance(Duration::from_secs(100)).is_empty());
    assert!(session.use_power_up().is_empty());

    assert_eq!(wins, 1);
    assert_eq!(session.pairs_matched(), 6);
    assert_eq!(session.time_left(), 90);
}
