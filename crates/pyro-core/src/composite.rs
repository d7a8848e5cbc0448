//! Composite control flow
//!
//! [`Chain`] drives sequential, repeat and loop nodes with one state
//! machine: it remembers when the current child began (`offset`) and hands
//! that child windows relative to its own start. When a child finishes
//! early, the unused time is fed straight into the next child within the
//! same call, up to the stage's continuation limit.
//!
//! [`Lanes`] drives parallel nodes: every unfinished child sees the very
//! same window as the parent.

use crate::behavior::{Behavior, Status};
use crate::field::Stage;
use crate::particle::Particle;

/// Which child a chain is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// No run has started yet
    Idle,
    At(usize),
    Exhausted,
}

#[derive(Debug, Clone)]
enum Plan {
    Sequence(Vec<Behavior>),
    Repeat { body: Box<Behavior>, limit: f64 },
    Loop(Box<Behavior>),
}

impl Plan {
    fn cursor(&self, i: usize) -> Cursor {
        let more = match self {
            Plan::Sequence(children) => i < children.len(),
            Plan::Repeat { limit, .. } => (i as f64) < *limit,
            Plan::Loop(_) => true,
        };
        if more {
            Cursor::At(i)
        } else {
            Cursor::Exhausted
        }
    }

    fn child(&mut self, i: usize) -> Option<&mut Behavior> {
        match self {
            Plan::Sequence(children) => children.get_mut(i),
            Plan::Repeat { body, .. } | Plan::Loop(body) => Some(body),
        }
    }
}

/// Shared state machine of sequential, repeat and loop nodes
#[derive(Debug, Clone)]
pub(crate) struct Chain {
    plan: Plan,
    /// Time, relative to the chain, at which the current child began
    offset: f64,
    cursor: Cursor,
}

impl Chain {
    fn new(plan: Plan) -> Self {
        Self {
            plan,
            offset: 0.0,
            cursor: Cursor::Idle,
        }
    }

    pub(crate) fn sequence(children: Vec<Behavior>) -> Self {
        Self::new(Plan::Sequence(children))
    }

    pub(crate) fn repeat(body: Behavior, limit: f64) -> Self {
        Self::new(Plan::Repeat {
            body: Box::new(body),
            limit,
        })
    }

    pub(crate) fn looping(body: Behavior) -> Self {
        Self::new(Plan::Loop(Box::new(body)))
    }

    pub(crate) fn update(
        &mut self,
        stage: &mut Stage<'_>,
        particle: &mut Particle,
        lifespan: f64,
        mut start: f64,
        end: f64,
    ) -> Status {
        if start == 0.0 || self.cursor == Cursor::Idle {
            self.offset = 0.0;
            self.cursor = self.plan.cursor(0);
        }

        let term = lifespan.min(end);
        for _ in 0..stage.continuation_limit() {
            let Cursor::At(i) = self.cursor else {
                break;
            };
            if start >= term {
                break;
            }
            let (from, to) = (start - self.offset, term - self.offset);
            let Some(child) = self.plan.child(i) else {
                self.cursor = Cursor::Exhausted;
                break;
            };
            match child.update(stage, particle, from, to) {
                Status::Running => break,
                Status::Done { leftover } => {
                    start = term - leftover;
                    self.offset = start;
                    self.cursor = self.plan.cursor(i.saturating_add(1));
                }
            }
        }

        match self.cursor {
            Cursor::At(_) => Behavior::settle(lifespan, start, end),
            Cursor::Idle | Cursor::Exhausted => Status::from_leftover(end - start),
        }
    }
}

/// Children of a parallel node with their completion sentinels
#[derive(Debug, Clone)]
pub(crate) struct Lanes {
    children: Vec<Behavior>,
    /// `None` until the child reports completion in the current run
    remaining: Vec<Option<f64>>,
}

impl Lanes {
    pub(crate) fn new(children: Vec<Behavior>) -> Self {
        let remaining = vec![None; children.len()];
        Self {
            children,
            remaining,
        }
    }

    /// Completes only when every child has; reports the smallest leftover
    /// among children finishing in this window and the node's own default
    /// completion. Children finished in earlier windows ended before
    /// `start`, which the default term already accounts for.
    pub(crate) fn update(
        &mut self,
        stage: &mut Stage<'_>,
        particle: &mut Particle,
        lifespan: f64,
        start: f64,
        end: f64,
    ) -> Status {
        if start == 0.0 {
            self.remaining.iter_mut().for_each(|r| *r = None);
        }

        let mut leftover = end - lifespan.max(start);
        let mut running = false;
        for (child, remaining) in self.children.iter_mut().zip(self.remaining.iter_mut()) {
            if remaining.is_some() {
                continue;
            }
            match child.update(stage, particle, start, end) {
                Status::Running => running = true,
                Status::Done { leftover: l } => {
                    *remaining = Some(l);
                    leftover = leftover.min(l);
                }
            }
        }

        if running {
            Status::Running
        } else {
            Status::from_leftover(leftover)
        }
    }
}
