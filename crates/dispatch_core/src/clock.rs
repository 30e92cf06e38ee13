//! Ordered dispatch moments.

use std::collections::VecDeque;

use crate::error::SimError;
use crate::model::Timestamp;

/// Dispatch moments in strictly ascending order, each popped exactly once.
#[derive(Debug, Clone, Default)]
pub struct DispatchSchedule {
    now: Option<Timestamp>,
    moments: VecDeque<Timestamp>,
    total: usize,
}

impl DispatchSchedule {
    /// Rejects negative moments and any moment not strictly after its
    /// predecessor (duplicates included).
    pub fn new(moments: Vec<Timestamp>) -> Result<Self, SimError> {
        let mut previous: Option<Timestamp> = None;
        for &moment in &moments {
            if moment < 0 {
                return Err(SimError::NegativeDispatchMoment(moment));
            }
            if let Some(previous) = previous {
                if moment <= previous {
                    return Err(SimError::NonMonotonicDispatchMoment {
                        previous,
                        next: moment,
                    });
                }
            }
            previous = Some(moment);
        }
        Ok(Self {
            now: None,
            total: moments.len(),
            moments: moments.into(),
        })
    }

    /// Most recently popped moment.
    pub fn now(&self) -> Option<Timestamp> {
        self.now
    }

    pub fn first(&self) -> Option<Timestamp> {
        self.moments.front().copied()
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.moments.back().copied().or(self.now)
    }

    pub fn pop_next(&mut self) -> Option<Timestamp> {
        let moment = self.moments.pop_front()?;
        self.now = Some(moment);
        Some(moment)
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.moments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moments.is_empty()
    }
}
