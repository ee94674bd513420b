use std::sync::mpsc;
use std::time::Duration;

use flipdex::content::{Artwork, ContentId, CreatureRef, DEFAULT_API_BASE};
use flipdex::controller::Controller;
use flipdex::difficulty::Difficulty;
use flipdex::fetch::FetchCommand;
use flipdex::game::{GameEvent, Outcome};
use flipdex::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};

fn pool(n: u32) -> Vec<CreatureRef> {
    (1..=n)
        .map(|i| CreatureRef {
            id: ContentId(i),
            name: format!("mon{i}"),
            detail_url: format!("https://pokeapi.co/api/v2/pokemon/{i}/"),
        })
        .collect()
}

// Headless integration using the runtime + Controller without a TTY.
// Fetch results arrive through the same channel the real worker uses.
#[test]
fn headless_roster_and_artwork_flow() {
    let (mut controller, cmd) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(8));
    let FetchCommand::Roster { epoch, pairs } = cmd else {
        panic!("expected roster request");
    };
    assert_eq!(pairs, 3);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(AppEvent::Roster {
        epoch,
        pool: pool(20),
    })
    .unwrap();

    let mut resolved = 0;
    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Roster { epoch, pool } => {
                let requests = controller.on_roster(epoch, pool);
                assert_eq!(requests.len(), 6);
                // answer every request as the worker would
                for req in requests {
                    if let FetchCommand::Artwork { epoch, index, url } = req {
                        tx.send(AppEvent::Artwork {
                            epoch,
                            index,
                            artwork: Artwork {
                                name: format!("card{index}"),
                                image_url: url,
                            },
                        })
                        .unwrap();
                    }
                }
            }
            AppEvent::Artwork {
                epoch,
                index,
                artwork,
            } => {
                resolved += controller.on_artwork(epoch, index, artwork).len();
                if resolved == 6 {
                    break;
                }
            }
            AppEvent::Tick | AppEvent::Resize | AppEvent::Key(_) => {}
        }
    }

    assert_eq!(resolved, 6);
    assert!(controller
        .session()
        .board()
        .cards()
        .iter()
        .all(|c| c.artwork.is_some()));
}

#[test]
fn headless_late_artwork_after_reset_is_dropped() {
    let (mut controller, _) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(8));
    let requests = controller.on_roster(1, pool(20));
    assert_eq!(requests.len(), 6);

    controller.reset();
    controller.on_roster(2, pool(20));

    let events = controller.on_artwork(
        1,
        0,
        Artwork {
            name: "stale".into(),
            image_url: "https://img/stale.png".into(),
        },
    );
    assert!(events.is_empty());
    assert!(controller
        .session()
        .board()
        .cards()
        .iter()
        .all(|c| c.artwork.is_none()));
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let (mut controller, _) = Controller::new(Difficulty::Easy, DEFAULT_API_BASE, Some(8));
    controller.start();
    controller.on_roster(2, pool(20));

    // drive a full minute through the clock in small steps
    let mut timeouts = 0;
    for _ in 0..700u32 {
        for event in controller.advance(Duration::from_millis(100)) {
            if event == GameEvent::TimedOut {
                timeouts += 1;
            }
        }
    }

    assert_eq!(timeouts, 1);
    assert_eq!(controller.session().outcome(), Some(Outcome::TimedOut));
    assert_eq!(controller.session().time_left(), 0);
    assert!(controller.select(0).is_empty());
}
