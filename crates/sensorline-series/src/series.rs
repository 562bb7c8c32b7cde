use std::collections::VecDeque;

use serde::Serialize;

use crate::error::{Result, SeriesError};
use crate::sample::Sample;

/// Default window capacity.
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity FIFO window over chronological samples.
///
/// Appending to a full series evicts the single oldest sample. There is no
/// removal or in-place update; readers get owned [`Snapshot`]s.
#[derive(Debug, Clone)]
pub struct BoundedSeries {
    samples: VecDeque<Sample>,
    capacity: usize,
    total_appended: u64,
    evicted: u64,
}

impl Default for BoundedSeries {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(DEFAULT_CAPACITY + 1),
            capacity: DEFAULT_CAPACITY,
            total_appended: 0,
            evicted: 0,
        }
    }
}

impl BoundedSeries {
    /// Create an empty series holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SeriesError::ZeroCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            total_appended: 0,
            evicted: 0,
        })
    }

    /// Append a sample, evicting the oldest if the window overflows.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        self.total_appended = self.total_appended.saturating_add(1);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
            self.evicted = self.evicted.saturating_add(1);
        }
    }

    /// Copy of the current window, oldest first.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            samples: self.samples.iter().copied().collect(),
        }
    }

    /// Most recently appended sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples appended over the series lifetime, evicted ones included.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    /// Samples dropped from the front so far.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

/// Inclusive `[min, max]` bounds of one channel over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    /// Bounds widened by `margin` on both sides, for axis scaling.
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// An immutable copy of a series window, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    samples: Vec<Sample>,
}

impl Snapshot {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Range of the first channel; `None` for an empty window.
    pub fn range_a(&self) -> Option<ValueRange> {
        ValueRange::of(self.samples.iter().map(Sample::value_a))
    }

    /// Range of the second channel; `None` for an empty window.
    pub fn range_b(&self) -> Option<ValueRange> {
        ValueRange::of(self.samples.iter().map(Sample::value_b))
    }

    /// Timestamps of the oldest and newest samples.
    pub fn time_range(&self) -> Option<ValueRange> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some(ValueRange {
                min: first.timestamp(),
                max: last.timestamp(),
            }),
            _ => None,
        }
    }

    pub fn into_vec(self) -> Vec<Sample> {
        self.samples
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
