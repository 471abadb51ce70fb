//! Per-bike event stream generator.
//!
//! Each subscription spawns one Tokio task that sleeps for the configured
//! interval, stamps a [`BikeEvent`] with the current time and forwards it
//! over a bounded channel. The consumer side is a [`BikeEventStream`].
//!
//! The task stops when:
//!
//! - the [`BikeEventStream`] is dropped (the HTTP client disconnected), or
//! - the shared [`CancellationToken`] fires (the server is shutting down).
//!
//! It never stops on its own and cannot fail. The first event arrives one
//! full interval after subscribing, never immediately. Each event carries
//! the wall-clock time it was produced, strictly later than the previous
//! event on the same stream.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use flux_flix_types::{BikeEvent, BikeId};
use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Capacity of each subscription's channel.
///
/// One slot: a slow consumer delays the next tick instead of letting
/// events pile up.
const EVENT_CHANNEL_CAPACITY: usize = 1;

/// Wall-clock source for event timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub enum EventClock {
    /// Read the system clock on every tick.
    #[default]
    System,
    /// A wall-clock reading taken once, advanced by Tokio's clock.
    ///
    /// Follows paused and auto-advanced test time exactly, so gaps between
    /// events equal the configured interval.
    Anchored {
        /// Wall time at the anchor.
        wall: DateTime<Utc>,
        /// Tokio time at the anchor.
        mono: Instant,
    },
}

impl EventClock {
    /// Anchor a clock at the current time.
    pub fn anchored() -> Self {
        Self::Anchored {
            wall: Utc::now(),
            mono: Instant::now(),
        }
    }

    /// The current time according to this clock.
    pub fn now(&self) -> DateTime<Utc> {
        match *self {
            Self::System => Utc::now(),
            Self::Anchored { wall, mono } => {
                let elapsed = Instant::now().saturating_duration_since(mono);
                TimeDelta::from_std(elapsed)
                    .ok()
                    .and_then(|delta| wall.checked_add_signed(delta))
                    .unwrap_or(wall)
            }
        }
    }
}

/// `now`, or one microsecond past `last` if the clock has not moved past it.
///
/// Keeps a stream's timestamps strictly increasing when the system clock is
/// stepped back or two ticks read the same instant.
fn stamp_after(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match last {
        Some(prev) if now <= prev => prev
            .checked_add_signed(TimeDelta::microseconds(1))
            .unwrap_or(prev),
        _ => now,
    }
}

/// The receiving end of one bike's event subscription.
///
/// Yields events forever until the generator is cancelled, after which it
/// ends. Dropping it stops the generator task.
#[derive(Debug)]
pub struct BikeEventStream {
    bike_id: BikeId,
    rx: mpsc::Receiver<BikeEvent>,
}

impl BikeEventStream {
    /// The bike this stream was opened for.
    pub const fn bike_id(&self) -> &BikeId {
        &self.bike_id
    }
}

impl Stream for BikeEventStream {
    type Item = BikeEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Open a new event subscription for `bike_id`.
///
/// Spawns the generator task on the current Tokio runtime. The bike id is
/// not checked against the store.
pub fn spawn_event_stream(
    bike_id: BikeId,
    interval: Duration,
    clock: EventClock,
    shutdown: CancellationToken,
) -> BikeEventStream {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(run_generator(bike_id.clone(), interval, clock, tx, shutdown));
    BikeEventStream { bike_id, rx }
}

/// Generator loop. Returns when the receiver is gone or `shutdown` fires.
pub(crate) async fn run_generator(
    bike_id: BikeId,
    interval: Duration,
    clock: EventClock,
    tx: mpsc::Sender<BikeEvent>,
    shutdown: CancellationToken,
) {
    debug!(%bike_id, interval_ms = interval.as_millis(), "Event stream opened");
    let mut emitted: u64 = 0;
    let mut last: Option<DateTime<Utc>> = None;

    loop {
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = tx.closed() => break,
            () = shutdown.cancelled() => break,
        }

        let stamp = stamp_after(last, clock.now());
        last = Some(stamp);
        let event = BikeEvent::new(bike_id.clone(), stamp);

        tokio::select! {
            result = tx.send(event) => {
                if result.is_err() {
                    break;
                }
            }
            () = shutdown.cancelled() => break,
        }

        emitted = emitted.saturating_add(1);
    }

    debug!(%bike_id, emitted, "Event stream closed");
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use futures::StreamExt;

    use super::*;

    const INTERVAL: Duration = Duration::from_secs(1);

    fn open(bike_id: BikeId) -> (BikeEventStream, CancellationToken) {
        let shutdown = CancellationToken::new();
        let stream =
            spawn_event_stream(bike_id, INTERVAL, EventClock::anchored(), shutdown.clone());
        (stream, shutdown)
    }

    #[tokio::test(start_paused = true)]
    async fn events_carry_subscribed_id_and_increasing_timestamps() {
        let bike_id = BikeId::new();
        let (stream, _shutdown) = open(bike_id.clone());

        let events: Vec<BikeEvent> = stream.take(5).collect().await;

        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.bike_id == bike_id));
        for pair in events.windows(2) {
            assert!(pair[1].date_released > pair[0].date_released);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_event_waits_one_full_interval() {
        let (mut stream, _shutdown) = open(BikeId::new());
        let start = Instant::now();

        let early = tokio::time::timeout(Duration::from_millis(999), stream.next()).await;
        assert!(early.is_err(), "no event may arrive before the first interval");

        stream.next().await.unwrap();
        assert_eq!(start.elapsed(), INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_events_are_one_interval_apart() {
        let clock = EventClock::anchored();
        let stream = spawn_event_stream(BikeId::new(), INTERVAL, clock, CancellationToken::new());

        let events: Vec<BikeEvent> = stream.take(3).collect().await;

        for pair in events.windows(2) {
            let gap = pair[1].date_released - pair[0].date_released;
            assert_eq!(gap, TimeDelta::seconds(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn three_and_a_half_intervals_yield_three_events() {
        let bike_id = BikeId::new();
        let (mut stream, _shutdown) = open(bike_id.clone());
        let deadline = Instant::now() + Duration::from_millis(3500);

        let mut events = Vec::new();
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, stream.next()).await {
            events.push(event);
        }

        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.bike_id == bike_id));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_receiver_stops_the_generator() {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task = tokio::spawn(run_generator(
            BikeId::new(),
            INTERVAL,
            EventClock::anchored(),
            tx,
            CancellationToken::new(),
        ));

        let mut stream = BikeEventStream {
            bike_id: BikeId::new(),
            rx,
        };
        stream.next().await.unwrap();
        stream.next().await.unwrap();
        drop(stream);

        // Well under one interval: the task must not wait for its next tick.
        tokio::time::timeout(Duration::from_millis(10), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_ends_the_stream() {
        let (mut stream, shutdown) = open(BikeId::new());
        stream.next().await.unwrap();

        shutdown.cancel();

        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn subscriptions_have_independent_timers() {
        let bike_id = BikeId::new();
        let shutdown = CancellationToken::new();
        let clock = EventClock::anchored();

        let mut first = spawn_event_stream(bike_id.clone(), INTERVAL, clock, shutdown.clone());
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mut second = spawn_event_stream(bike_id, INTERVAL, clock, shutdown.clone());

        let a = first.next().await.unwrap();
        let b = second.next().await.unwrap();

        assert_eq!(b.date_released - a.date_released, TimeDelta::milliseconds(500));
        assert_eq!(first.bike_id(), second.bike_id());
    }

    #[tokio::test(start_paused = true)]
    async fn anchored_clock_advances_with_tokio_time() {
        let clock = EventClock::anchored();
        let before = clock.now();
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(clock.now() - before, TimeDelta::seconds(90));
    }

    #[tokio::test(start_paused = true)]
    async fn system_clock_stamps_track_real_time() {
        let stream = spawn_event_stream(
            BikeId::from("abc"),
            INTERVAL,
            EventClock::System,
            CancellationToken::new(),
        );

        let events: Vec<BikeEvent> = stream.take(3).collect().await;

        assert!(events.iter().all(|e| e.bike_id.as_str() == "abc"));
        assert!((Utc::now() - events[0].date_released).num_seconds().abs() < 5);
        for pair in events.windows(2) {
            assert!(pair[1].date_released > pair[0].date_released);
        }
    }

    #[test]
    fn stamp_after_moves_past_a_stepped_back_clock() {
        let prev = Utc::now();
        let stepped_back = prev - TimeDelta::seconds(30);

        let stamp = stamp_after(Some(prev), stepped_back);
        assert!(stamp > prev);
        assert_eq!(stamp_after(Some(prev), prev), stamp);

        let later = prev + TimeDelta::seconds(1);
        assert_eq!(stamp_after(Some(prev), later), later);
        assert_eq!(stamp_after(None, stepped_back), stepped_back);
    }
}
