//! The snake body

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction};

/// Ordered body (head first) plus deferred growth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
    /// Ticks left during which the tail is kept instead of removed
    pub pending_growth: u32,
}

impl Snake {
    /// Straight snake with its head at `head`, trailing away from `direction`
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let back = direction.reversed();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut cell = head;
        body.push_back(cell);
        for _ in 1..length {
            cell = cell.step(back);
            body.push_back(cell);
        }
        Self {
            body,
            pending_growth: 0,
        }
    }

    /// Build from explicit segments, head first. Returns None for an empty body.
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            body,
            pending_growth: 0,
        })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true: the body always keeps its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether `cell` hits the body, optionally ignoring the tail that is about to move
    pub fn occupies(&self, cell: Cell, skip_tail: bool) -> bool {
        let end = if skip_tail {
            self.body.len() - 1
        } else {
            self.body.len()
        };
        self.body.iter().take(end).any(|&c| c == cell)
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    /// Remove the tail or spend one pending growth. Never shrinks below one segment.
    /// Returns true if the snake grew this tick.
    pub fn settle_tail(&mut self) -> bool {
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            return true;
        }
        if self.body.len() > 1 {
            self.body.pop_back();
        }
        false
    }

    /// Cut `count` segments off the tail, keeping at least the head
    pub fn amputate(&mut self, count: usize) -> usize {
        let removable = count.min(self.body.len() - 1);
        self.body.truncate(self.body.len() - removable);
        removable
    }
}
