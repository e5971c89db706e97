//! Tracker handle for multi-threaded hosts.
//!
//! Under a single frame loop the tracker needs no locking. When frames are
//! applied on one thread and snapshots read on others, the slot collection
//! sits behind a reader-writer lock: one writer, many readers.

use std::sync::{Arc, RwLock};

use smilecount_common::error::{SmileError, SmileResult};
use smilecount_face_model::blendshape::DetectionResult;
use smilecount_face_model::snapshot::SlotSnapshot;

use crate::frame_processor::{FrameProcessor, FrameReport};
use crate::tracker::{SmileTracker, TrackerOptions};

/// Clonable, lock-protected tracker.
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<RwLock<SmileTracker>>,
}

impl SharedTracker {
    pub fn new(options: TrackerOptions) -> SmileResult<Self> {
        Ok(Self::from_tracker(SmileTracker::new(options)?))
    }

    pub fn from_tracker(tracker: SmileTracker) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tracker)),
        }
    }

    /// Apply one frame under the write lock.
    pub fn apply_frame(
        &self,
        processor: &FrameProcessor,
        result: &DetectionResult,
    ) -> SmileResult<FrameReport> {
        let mut tracker = self
            .inner
            .write()
            .map_err(|_| SmileError::Other(anyhow::anyhow!("smile tracker lock poisoned")))?;
        Ok(processor.process(&mut tracker, result))
    }

    /// Read every slot under the read lock.
    pub fn snapshot(&self) -> SmileResult<Vec<SlotSnapshot>> {
        let tracker = self
            .inner
            .read()
            .map_err(|_| SmileError::Other(anyhow::anyhow!("smile tracker lock poisoned")))?;
        Ok(tracker.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_apply_and_snapshot() {
        let shared = SharedTracker::new(TrackerOptions::default()).unwrap();
        let processor = FrameProcessor::default();
        shared
            .apply_frame(&processor, &DetectionResult::from_smile_scores(&[0.9, 0.1]))
            .unwrap();

        let snap = shared.snapshot().unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].count, 1);
    }

    #[test]
    fn test_concurrent_readers_see_whole_frames() {
        let shared = SharedTracker::new(TrackerOptions::default()).unwrap();
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                let processor = FrameProcessor::default();
                for i in 0..200 {
                    let score = if i % 2 == 0 { 0.9 } else { 0.1 };
                    shared
                        .apply_frame(
                            &processor,
                            &DetectionResult::from_smile_scores(&[score, score]),
                        )
                        .unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = shared.snapshot().unwrap();
                        if snap.len() == 2 {
                            // Both faces are always updated together.
                            assert_eq!(snap[0].count, snap[1].count);
                            assert_eq!(snap[0].score, snap[1].score);
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.snapshot().unwrap()[0].count, 100);
    }
}
