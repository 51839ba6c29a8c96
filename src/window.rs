use std::collections::VecDeque;

/// One plotted sample: a wall-clock label and the displayed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

impl Point {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Fixed-capacity FIFO of the most recent points of one series.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    points: VecDeque<Point>,
}

impl RollingWindow {
    /// A window already holding `capacity` copies of `value`.
    pub fn filled(capacity: usize, label: &str, value: f64) -> Self {
        let mut points = VecDeque::with_capacity(capacity + 1);
        points.extend((0..capacity).map(|_| Point::new(label, value)));
        Self { capacity, points }
    }

    /// A window holding the last `capacity` of `points`, in order.
    pub fn from_points(capacity: usize, points: &[Point]) -> Self {
        let skip = points.len().saturating_sub(capacity);
        Self {
            capacity,
            points: points.iter().skip(skip).cloned().collect(),
        }
    }

    /// Append a point, evicting the single oldest one when over capacity.
    pub fn push(&mut self, label: impl Into<String>, value: f64) -> Option<Point> {
        self.points.push_back(Point::new(label, value));
        if self.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    /// Swap the whole contents for a freshly filled window.
    pub fn replace_filled(&mut self, label: &str, value: f64) {
        *self = Self::filled(self.capacity, label, value);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.iter().map(|p| p.value).collect()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.iter().cloned().collect()
    }

    pub fn oldest(&self) -> Option<&Point> {
        self.points.front()
    }

    pub fn latest(&self) -> Option<&Point> {
        self.points.back()
    }

    pub fn min(&self) -> Option<f64> {
        self.iter().map(|p| p.value).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.iter().map(|p| p.value).reduce(f64::max)
    }
}
