use rayon::prelude::*;

/// Time-keyed store of precomputed frames.
///
/// Frames are kept sorted by time. A lookup answers with the frame whose
/// time is nearest to the request, provided it lies within `tolerance`
/// milliseconds.
#[derive(Debug, Clone)]
pub struct FrameCache<T> {
    frames: Vec<(f32, T)>,
    tolerance: f32,
}

impl<T> FrameCache<T> {
    #[must_use]
    pub fn new(tolerance: f32) -> Self {
        Self {
            frames: Vec::new(),
            tolerance,
        }
    }

    #[inline]
    #[must_use]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn invalidate(&mut self) {
        if !self.frames.is_empty() {
            log::trace!("Frame cache invalidated ({} frames)", self.frames.len());
        }
        self.frames.clear();
    }

    /// Nearest cached frame within tolerance.
    #[must_use]
    pub fn lookup(&self, t: f32) -> Option<&T> {
        let idx = self.frames.partition_point(|(time, _)| *time < t);

        let below = idx.checked_sub(1).and_then(|i| self.frames.get(i));
        let above = self.frames.get(idx);
        let nearest = match (below, above) {
            (Some(b), Some(a)) => {
                if t - b.0 <= a.0 - t {
                    b
                } else {
                    a
                }
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => return None,
        };

        if (nearest.0 - t).abs() <= self.tolerance {
            log::trace!("Frame cache hit: {t} ms -> {} ms", nearest.0);
            Some(&nearest.1)
        } else {
            None
        }
    }

    /// Stores a frame, keeping the time order.
    pub fn insert(&mut self, t: f32, frame: T) {
        let idx = self.frames.partition_point(|(time, _)| *time < t);
        self.frames.insert(idx, (t, frame));
    }
}

impl<T: Send> FrameCache<T> {
    /// Computes frames for `times` in parallel batches of `batch_size`.
    ///
    /// Each batch is joined before the next one starts.
    pub fn warm_up<F>(&mut self, times: &[f32], batch_size: usize, sample: F)
    where
        F: Fn(f32) -> T + Sync,
    {
        for batch in times.chunks(batch_size.max(1)) {
            let frames: Vec<(f32, T)> = batch.par_iter().map(|&t| (t, sample(t))).collect();
            self.frames.extend(frames);
        }
        self.frames.sort_by(|a, b| a.0.total_cmp(&b.0));
        log::debug!("Frame cache warmed: {} frames", self.frames.len());
    }
}
