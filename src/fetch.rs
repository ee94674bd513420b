use rand::{rngs::StdRng, SeedableRng};
use std::sync::mpsc::Sender;
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::content::PokeApi;
use crate::error::FetchError;
use crate::runtime::AppEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommand {
    Roster { epoch: u64, pairs: usize },
    Artwork { epoch: u64, index: usize, url: String },
}

/// Handle to the background worker that talks to the creature API.
///
/// The worker owns a tokio runtime on its own thread and answers through the
/// app event channel. Dropping the handle shuts the worker down.
pub struct Fetcher {
    tx: UnboundedSender<FetchCommand>,
}

impl Fetcher {
    pub fn spawn(api: PokeApi, events: Sender<AppEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build fetch runtime: {}", FetchError::from(err));
                    return;
                }
            };

            runtime.block_on(serve(api, rx, events));
        });

        Self { tx }
    }

    pub fn send(&self, cmd: FetchCommand) -> Result<(), FetchError> {
        self.tx.send(cmd).map_err(|_| FetchError::WorkerGone)
    }

    pub fn request_roster(&self, epoch: u64, pairs: usize) -> Result<(), FetchError> {
        self.send(FetchCommand::Roster { epoch, pairs })
    }

    pub fn request_artwork(&self, epoch: u64, index: usize, url: String) -> Result<(), FetchError> {
        self.send(FetchCommand::Artwork { epoch, index, url })
    }
}

async fn serve(api: PokeApi, mut rx: UnboundedReceiver<FetchCommand>, events: Sender<AppEvent>) {
    info!(base = api.base(), "fetch worker ready");

    while let Some(cmd) = rx.recv().await {
        let api = api.clone();
        let events = events.clone();
        match cmd {
            FetchCommand::Roster { epoch, pairs } => {
                tokio::spawn(async move {
                    let pool = match api.roster().await {
                        Ok(pool) => {
                            info!(epoch, creatures = pool.len(), "creature list loaded");
                            pool
                        }
                        Err(err) => {
                            error!(epoch, "error loading creature list: {err}");
                            let mut rng = StdRng::from_entropy();
                            api.fallback_roster(pairs, &mut rng)
                        }
                    };

                    if events.send(AppEvent::Roster { epoch, pool }).is_err() {
                        debug!(epoch, "event loop gone, dropping roster");
                    }
                });
            }
            FetchCommand::Artwork { epoch, index, url } => {
                tokio::spawn(async move {
                    match api.artwork(&url).await {
                        Ok(artwork) => {
                            let _ = events.send(AppEvent::Artwork {
                                epoch,
                                index,
                                artwork,
                            });
                        }
                        Err(err) => warn!(epoch, index, %url, "artwork unavailable: {err}"),
                    }
                });
            }
        }
    }

    debug!("fetch worker shutting down");
}
