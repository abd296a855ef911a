//! Async session driver.
//!
//! A session owns a [`RoundScheduler`] inside a single tokio task. Host
//! commands arrive over a channel and the one armed timer is awaited
//! alongside them, so scheduler state is only ever touched from that task.
//! Disarming a timer is simply forgetting its deadline.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::catalog::Tone;
use crate::error::SessionError;
use crate::grader::{Signal, Verdict};
use crate::report::RoundReport;
use crate::scheduler::{Phase, RoundScheduler, Step, TimerToken};
use crate::sequence::RoundMode;
use crate::stats::RoundStats;
use crate::traits::{RoundObserver, TonePlayer};

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub phase: Phase,
    pub playing: Option<Tone>,
    pub remaining: usize,
    pub stats: RoundStats,
}

enum Command {
    Start {
        mode: RoundMode,
        count: Option<usize>,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Stop {
        reply: oneshot::Sender<Option<RoundReport>>,
    },
    Signal {
        signal: Signal,
        reply: oneshot::Sender<Verdict>,
    },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
}

/// Cloneable handle for controlling a running session.
///
/// The session task exits, stopping any active round, once every handle is
/// dropped.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Start a round. `count` defaults to the catalog size.
    pub async fn start(&self, mode: RoundMode, count: Option<usize>) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Start { mode, count, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Stop the active round, returning its report. `None` when inactive.
    pub async fn stop(&self) -> Result<Option<RoundReport>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stop { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Deliver a listener signal.
    pub async fn signal(&self, signal: Signal) -> Result<Verdict, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Signal { signal, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn status(&self) -> Result<SessionStatus, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.tx.send(command).await.map_err(|_| SessionError::Closed)
    }
}

/// Spawn the session task on the current tokio runtime.
pub fn spawn_session<P, R>(
    scheduler: RoundScheduler<P, R>,
    observer: Arc<dyn RoundObserver>,
) -> (SessionHandle, JoinHandle<()>)
where
    P: TonePlayer + 'static,
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);
    let task = tokio::spawn(drive(scheduler, observer, rx));
    (SessionHandle { tx }, task)
}

async fn drive<P, R>(
    mut scheduler: RoundScheduler<P, R>,
    observer: Arc<dyn RoundObserver>,
    mut rx: mpsc::Receiver<Command>,
) where
    P: TonePlayer,
    R: Rng,
{
    let mut armed: Option<(Instant, TimerToken)> = None;

    loop {
        let timer = async move {
            match armed {
                Some((deadline, token)) => {
                    tokio::time::sleep_until(deadline).await;
                    token
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Start { mode, count, reply } => {
                        armed = None;
                        let result = match scheduler.start(mode, count) {
                            Ok(step) => {
                                if let Some(id) = scheduler.round_id() {
                                    observer.on_round_started(id, mode, scheduler.remaining());
                                }
                                armed = apply(step, observer.as_ref());
                                Ok(())
                            }
                            Err(e) => {
                                tracing::error!("tone player unavailable: {e}");
                                Err(SessionError::from(e))
                            }
                        };
                        let _ = reply.send(result);
                    }
                    Command::Stop { reply } => {
                        armed = None;
                        let _ = reply.send(scheduler.stop());
                    }
                    Command::Signal { signal, reply } => {
                        let verdict = scheduler.signal(signal);
                        observer.on_verdict(&verdict);
                        let _ = reply.send(verdict);
                    }
                    Command::Status { reply } => {
                        let _ = reply.send(SessionStatus {
                            phase: scheduler.phase(),
                            playing: scheduler.playback().tone().cloned(),
                            remaining: scheduler.remaining(),
                            stats: scheduler.stats().clone(),
                        });
                    }
                }
            }
            token = timer => {
                armed = apply(scheduler.fire(token), observer.as_ref());
            }
        }
    }

    scheduler.stop();
    tracing::debug!("session closed");
}

/// Notify the observer of a step and return the timer to arm next.
fn apply(step: Step, observer: &dyn RoundObserver) -> Option<(Instant, TimerToken)> {
    let timer = step.timer();
    match step {
        Step::Played {
            tone, remaining, ..
        } => observer.on_tone_started(&tone, remaining),
        Step::Completed(stats) => observer.on_round_complete(&stats),
        Step::Wait(_) | Step::Stale => {}
    }
    timer.map(|t| (Instant::now() + t.after, t.token))
}
