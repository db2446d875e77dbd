// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
//! Serializes the events for one engine on a tokio task.
//!
//! Every event runs to completion before the next one is read, so a frame
//! never overlaps another frame. While a scan is running, a timer drives the
//! sweep; pending events always win over the timer, so a manual move cancels
//! the sweep before its next step.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, info_span, Instrument};

use crate::engine::{Engine, FrameReport, PointerOrigin, ScanDirection};

const EVENT_BUFFER: usize = 64;
const MIN_SCAN_INTERVAL: Duration = Duration::from_millis(1);

/// Events that drive an engine.
#[derive(Debug)]
pub enum Event {
    /// The user moved the pointer.
    PointerMoved { x: i32, y: i32 },

    /// Starts (or restarts) a sweep in the given direction.
    StartScan(ScanDirection),

    /// Stops the sweep, if any.
    CancelScan,

    /// Changes the base cursor radius.
    SetCursorRadius(u32),

    /// Mutes or unmutes the engine.
    SetMuted(bool),

    /// The image is now rendered at the given size.
    AttachSurface { width: u32, height: u32 },

    /// The image is no longer rendered.
    DetachSurface,

    /// Silences the engine and ends the session.
    Close,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,

    #[error("session task failed: {0}")]
    Join(#[from] JoinError),
}

/// A running session. The engine is handed back when the session ends.
pub struct Session {
    events: mpsc::Sender<Event>,
    handle: JoinHandle<Engine>,
}

impl Session {
    /// Spawns the session task. Every frame report is sent to `reports`, if
    /// given.
    pub fn spawn(
        engine: Engine,
        scan_interval: Duration,
        reports: Option<mpsc::UnboundedSender<FrameReport>>,
    ) -> Session {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let scan_interval = scan_interval.max(MIN_SCAN_INTERVAL);
        let handle = tokio::spawn(
            Session::run(engine, events_rx, scan_interval, reports)
                .instrument(info_span!("session")),
        );
        Session {
            events: events_tx,
            handle,
        }
    }

    /// Returns a sender for feeding events from elsewhere.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.events.clone()
    }

    pub async fn send(&self, event: Event) -> Result<(), SessionError> {
        self.events
            .send(event)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Asks the session to close and waits for it.
    pub async fn close(self) -> Result<Engine, SessionError> {
        // The task may already be gone, in which case join reports why.
        let _ = self.events.send(Event::Close).await;
        self.join().await
    }

    /// Waits for the session to end. The session ends on [`Event::Close`] or
    /// once every sender, including ones from [`Session::sender`], is dropped.
    pub async fn join(self) -> Result<Engine, SessionError> {
        let Session { events, handle } = self;
        drop(events);
        Ok(handle.await?)
    }

    async fn run(
        mut engine: Engine,
        mut events: mpsc::Receiver<Event>,
        scan_interval: Duration,
        reports: Option<mpsc::UnboundedSender<FrameReport>>,
    ) -> Engine {
        let mut ticker = tokio::time::interval(scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let publish = |report: Option<FrameReport>| {
            if let (Some(reports), Some(report)) = (&reports, report) {
                if reports.send(report).is_err() {
                    debug!("Report receiver dropped.");
                }
            }
        };

        info!(?scan_interval, "Session started.");
        loop {
            tokio::select! {
                biased;

                event = events.recv() => {
                    let Some(event) = event else {
                        info!("All senders dropped.");
                        break;
                    };
                    debug!(?event, "Received event.");
                    match event {
                        Event::PointerMoved { x, y } => {
                            publish(engine.pointer_moved(x, y, PointerOrigin::Manual))
                        }
                        Event::StartScan(direction) => {
                            publish(engine.start_scan(direction));
                            ticker.reset();
                        }
                        Event::CancelScan => {
                            engine.cancel_scan();
                        }
                        Event::SetCursorRadius(radius) => engine.set_cursor_radius(radius),
                        Event::SetMuted(muted) => engine.set_muted(muted),
                        Event::AttachSurface { width, height } => {
                            engine.attach_surface(width, height)
                        }
                        Event::DetachSurface => engine.detach_surface(),
                        Event::Close => break,
                    }
                }
                _ = ticker.tick(), if engine.is_scanning() => {
                    publish(engine.scan_step());
                }
            }
        }

        engine.cancel_scan();
        engine.silence();
        info!("Session closed.");
        engine
    }
}
