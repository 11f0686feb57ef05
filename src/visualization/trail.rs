//! Bounded position history per particle, oldest first

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct Trail<T> {
    capacity: usize,
    points: VecDeque<T>,
}

impl<T: Copy> Trail<T> {
    /// Trail keeping at most `capacity` points; 0 keeps nothing
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Append `point`, dropping the oldest one when full
    pub fn push(&mut self, point: T) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.points.iter().copied()
    }
}
