use crate::shared::label_map::LabelMap;

/// Turns an output score vector into the labels whose scores cross the threshold.
pub struct DetectionDecoder {
    labels: LabelMap,
    threshold: f32,
}

impl DetectionDecoder {
    pub fn new(labels: LabelMap, threshold: f32) -> Self {
        Self { labels, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Yields, in ascending index order, the label of every labeled index
    /// whose score is strictly greater than the threshold.
    ///
    /// Duplicate labels at different indices are each yielded.
    pub fn decode<'a>(&'a self, scores: &'a [f32]) -> impl Iterator<Item = &'a str> + 'a {
        scores.iter().enumerate().filter_map(move |(i, &score)| {
            self.labels.get(i).filter(|_| score > self.threshold)
        })
    }

    /// Reports whether an output vector of `len` scores has more entries than
    /// there are labels. Logged once per session by the caller.
    pub fn exceeds_labels(&self, len: usize) -> bool {
        len > self.labels.len()
    }
}
