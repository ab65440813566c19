//! Observation delivery from a hand tracker.
//!
//! A [`HandTracker`] produces one observation per video frame: either a
//! detected hand or `None`. [`spawn_tracker`] runs it on its own thread and
//! hands observations to the render thread through a one-slot mailbox. A new
//! observation replaces one the render thread hasn't picked up yet, so the
//! render thread always sees the latest frame and latency never builds a
//! backlog.

use crate::error::TrackingError;
use crate::landmarks::HandLandmarks;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// One tracking result. `None` means no hand in the frame.
pub type Observation = Option<HandLandmarks>;

/// Anything that can produce observations, one per frame.
pub trait HandTracker: Send + 'static {
    /// Block until the next frame has been processed.
    ///
    /// Returns `None` when the stream has ended.
    fn next_observation(&mut self) -> Option<Observation>;
}

/// Slot shared between the tracker thread and the render thread.
#[derive(Default)]
struct Mailbox {
    pending: Mutex<Option<Observation>>,
    /// Observations overwritten before they were read.
    superseded: AtomicU64,
    /// Set once the tracker has returned its last observation.
    closed: AtomicBool,
}

impl Mailbox {
    fn slot(&self) -> MutexGuard<'_, Option<Observation>> {
        // The slot holds plain data, a panicking writer can't leave it half-set
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn post(&self, observation: Observation) {
        if self.slot().replace(observation).is_some() {
            let total = self.superseded.fetch_add(1, Ordering::Relaxed) + 1;
            log::trace!("Pending observation replaced before it was read ({} total)", total);
        }
    }
}

/// Receiving end of a spawned tracker.
pub struct ObservationReceiver {
    mailbox: Arc<Mailbox>,
    finished: bool,
}

impl ObservationReceiver {
    /// Take the latest observation, if one has arrived since the last call.
    pub fn poll(&mut self) -> Option<Observation> {
        // Read the flag first: everything posted before it was set is then visible
        let closed = self.mailbox.closed.load(Ordering::Acquire);
        let observation = self.mailbox.slot().take();
        if observation.is_none() && closed && !self.finished {
            log::info!("Hand tracker stream ended");
            self.finished = true;
        }
        observation
    }

    /// Observations replaced by a newer one before they were picked up.
    pub fn dropped(&self) -> u64 {
        self.mailbox.superseded.load(Ordering::Relaxed)
    }

    /// Whether the tracker has stopped and its last observation was taken.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Run a tracker on its own thread.
///
/// The thread stops when the tracker ends or the receiver is dropped.
pub fn spawn_tracker<T: HandTracker>(mut tracker: T) -> ObservationReceiver {
    let mailbox = Arc::new(Mailbox::default());
    let producer = Arc::clone(&mailbox);

    thread::spawn(move || {
        while let Some(observation) = tracker.next_observation() {
            if Arc::strong_count(&producer) == 1 {
                return;
            }
            producer.post(observation);
        }
        producer.closed.store(true, Ordering::Release);
    });

    ObservationReceiver {
        mailbox,
        finished: false,
    }
}

/// Replays a recorded landmark stream at a fixed frame rate.
///
/// The recording is JSON lines, one frame per line: `null` for no hand, or
/// an array of 21 `[x, y, z]` triples. Blank lines are ignored.
#[derive(Debug, Clone)]
pub struct ReplayTracker {
    frames: Vec<Observation>,
    cursor: usize,
    interval: Duration,
    looped: bool,
}

impl ReplayTracker {
    /// Replay `frames` at `fps`.
    ///
    /// A rate with no representable frame interval (zero, negative, or so
    /// small that `1 / fps` overflows) replays unpaced.
    pub fn new(frames: Vec<Observation>, fps: f32, looped: bool) -> Self {
        let interval = if fps > 0.0 {
            Duration::try_from_secs_f32(1.0 / fps).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        Self {
            frames,
            cursor: 0,
            interval,
            looped,
        }
    }

    /// Load a recording from disk.
    pub fn open(path: impl AsRef<Path>, fps: f32, looped: bool) -> Result<Self, TrackingError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TrackingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let frames = parse_recording(BufReader::new(file)).map_err(|e| match e {
            TrackingError::Io { source, .. } => TrackingError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded {} frames from {}", frames.len(), path.display());
        Ok(Self::new(frames, fps, looped))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl HandTracker for ReplayTracker {
    fn next_observation(&mut self) -> Option<Observation> {
        if self.cursor >= self.frames.len() {
            if !self.looped || self.frames.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
        let observation = self.frames[self.cursor].clone();
        self.cursor += 1;
        Some(observation)
    }
}

/// Parse a JSON-lines landmark recording.
pub fn parse_recording<R: BufRead>(reader: R) -> Result<Vec<Observation>, TrackingError> {
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|source| TrackingError::Io {
            path: Default::default(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let raw: Option<Vec<[f32; 3]>> = serde_json::from_str(line)
            .map_err(|source| TrackingError::Parse { line: line_no, source })?;
        let observation = raw
            .map(HandLandmarks::try_from)
            .transpose()
            .map_err(|source| TrackingError::Landmarks { line: line_no, source })?;
        frames.push(observation);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LandmarkError;
    use crate::landmarks::{Landmark, LANDMARK_COUNT};
    use std::time::Instant;

    fn hand_line(x: f32) -> String {
        let points: Vec<[f32; 3]> = (0..21).map(|_| [x, 0.5, 0.0]).collect();
        serde_json::to_string(&points).unwrap()
    }

    #[test]
    fn test_parse_recording_mixes_hands_and_gaps() {
        let text = format!("{}\nnull\n\n{}\n", hand_line(0.2), hand_line(0.8));
        let frames = parse_recording(text.as_bytes()).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_some());
        assert!(frames[1].is_none());
        assert_eq!(frames[2].as_ref().unwrap().wrist().x, 0.8);
    }

    #[test]
    fn test_parse_recording_rejects_short_hand() {
        let text = "null\n[[0.1, 0.2, 0.0]]\n";
        match parse_recording(text.as_bytes()) {
            Err(TrackingError::Landmarks { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, LandmarkError::WrongLength { expected: 21, actual: 1 });
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_recording_reports_bad_json_line() {
        let text = "null\nnot json\n";
        assert!(matches!(
            parse_recording(text.as_bytes()),
            Err(TrackingError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_replay_ends_unless_looped() {
        let mut once = ReplayTracker::new(vec![None, None], 0.0, false);
        assert_eq!(once.next_observation(), Some(None));
        assert_eq!(once.next_observation(), Some(None));
        assert_eq!(once.next_observation(), None);

        let mut looped = ReplayTracker::new(vec![None], 0.0, true);
        for _ in 0..5 {
            assert_eq!(looped.next_observation(), Some(None));
        }
    }

    #[test]
    fn test_replay_with_unrepresentable_rate_runs_unpaced() {
        for fps in [1e-39, 1e-30, f32::NAN] {
            let mut tracker = ReplayTracker::new(vec![None], fps, false);
            assert_eq!(tracker.interval, Duration::ZERO);
            assert_eq!(tracker.next_observation(), Some(None));
        }
    }

    /// Produces `remaining` observations as fast as possible. Only the
    /// last one carries a hand.
    struct Burst {
        remaining: usize,
    }

    impl HandTracker for Burst {
        fn next_observation(&mut self) -> Option<Observation> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            if self.remaining == 0 {
                let hand = HandLandmarks::new([Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT]);
                Some(Some(hand.unwrap()))
            } else {
                Some(None)
            }
        }
    }

    #[test]
    fn test_mailbox_keeps_latest_instead_of_queueing() {
        let mut rx = spawn_tracker(Burst { remaining: 1000 });

        // Wait for the producer to finish without consuming anything
        let start = Instant::now();
        while !rx.mailbox.closed.load(Ordering::Acquire) && start.elapsed() < Duration::from_secs(5) {
            thread::sleep(Duration::from_millis(1));
        }

        // Only one observation was ever held, and it is the newest
        assert_eq!(rx.dropped(), 999);
        assert!(!rx.is_finished());
        assert!(matches!(rx.poll(), Some(Some(_))));
        assert_eq!(rx.poll(), None);
        assert!(rx.is_finished());
    }
}
