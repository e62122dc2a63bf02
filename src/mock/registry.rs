//! The ordered queue of pending expectations.

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::criteria::Criteria;
use crate::command::{Invocation, OutputSpec};

/// Process-wide registry read by the fake spawner.
static PENDING: Mutex<Registry> = parking_lot::const_mutex(Registry::new());

/// One registered criteria/result pair awaiting a single matching invocation.
#[derive(Debug, Clone)]
pub(crate) struct Expectation {
    criteria: Criteria,
    output: OutputSpec,
}

impl Expectation {
    pub(crate) fn new(criteria: Criteria, output: OutputSpec) -> Self {
        Self { criteria, output }
    }

    pub(crate) fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub(crate) fn into_parts(self) -> (Criteria, OutputSpec) {
        (self.criteria, self.output)
    }
}

/// Expectations in insertion order, which is also match priority.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    pending: Vec<Expectation>,
}

impl Registry {
    pub(crate) const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, expectation: Expectation) {
        self.pending.push(expectation);
    }

    /// Remove and return the first expectation matching `invocation`.
    pub(crate) fn take_match(&mut self, invocation: &Invocation) -> Option<Expectation> {
        let index = self.pending.iter().position(|expectation| {
            let matched = expectation.criteria.matches(invocation);
            if !matched {
                trace!(criteria = ?expectation.criteria, ?invocation, "expectation skipped");
            }
            matched
        })?;
        Some(self.pending.remove(index))
    }

    pub(crate) fn drain(&mut self) -> Vec<Expectation> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

pub(crate) fn register(expectation: Expectation) {
    debug!(criteria = ?expectation.criteria, "registered command expectation");
    PENDING.lock().push(expectation);
}

pub(crate) fn take_match(invocation: &Invocation) -> Option<Expectation> {
    let expectation = PENDING.lock().take_match(invocation)?;
    debug!(criteria = ?expectation.criteria, ?invocation, "consumed command expectation");
    Some(expectation)
}

pub(crate) fn drain() -> Vec<Expectation> {
    PENDING.lock().drain()
}

pub(crate) fn len() -> usize {
    PENDING.lock().len()
}
