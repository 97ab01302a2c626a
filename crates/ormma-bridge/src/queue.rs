// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-in-flight native call queue.
//
// At most one address is outstanding with the host. Anything submitted while
// a call is in flight waits here until the host reports completion. Waiting
// calls leave the queue from the END: the most recently queued call is sent
// next.

use tracing::debug;

/// Pending addresses plus the in-flight flag.
#[derive(Debug, Default)]
pub struct CallQueue {
    pending: Vec<String>,
    in_flight: bool,
}

impl CallQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an address for dispatch.
    ///
    /// Returns `Some(address)` when the caller must send it right away (the
    /// queue is now in flight), or `None` when it was parked behind the
    /// outstanding call.
    pub fn submit(&mut self, address: String) -> Option<String> {
        if self.in_flight {
            debug!(%address, depth = self.pending.len() + 1, "native call queued");
            self.pending.push(address);
            None
        } else {
            self.in_flight = true;
            Some(address)
        }
    }

    /// Record a host completion.
    ///
    /// Returns the next address to send, leaving the queue in flight, or
    /// `None` after clearing the flag when nothing is waiting.
    pub fn complete(&mut self) -> Option<String> {
        match self.pending.pop() {
            Some(next) => {
                self.in_flight = true;
                Some(next)
            }
            None => {
                self.in_flight = false;
                None
            }
        }
    }

    /// Clear the in-flight flag after an immediate send that never reached
    /// the host. Only valid while nothing is waiting.
    pub fn abandon_in_flight(&mut self) {
        debug_assert!(self.pending.is_empty(), "abandoning with calls still queued");
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Waiting addresses in submission order (the last one is sent next).
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_submission_goes_straight_out() {
        let mut queue = CallQueue::new();
        assert_eq!(queue.submit("a".into()).as_deref(), Some("a"));
        assert!(queue.is_in_flight());
        assert!(queue.is_empty());
    }

    #[test]
    fn submissions_while_in_flight_are_parked() {
        let mut queue = CallQueue::new();
        queue.submit("a".into());
        assert!(queue.submit("b".into()).is_none());
        assert!(queue.submit("c".into()).is_none());
        assert_eq!(queue.pending(), ["b", "c"]);
    }

    #[test]
    fn completion_pops_most_recent_first() {
        let mut queue = CallQueue::new();
        queue.submit("a".into());
        queue.submit("b".into());
        queue.submit("c".into());

        assert_eq!(queue.complete().as_deref(), Some("c"));
        assert!(queue.is_in_flight());
        assert_eq!(queue.complete().as_deref(), Some("b"));
        assert!(queue.is_in_flight());
        assert_eq!(queue.complete(), None);
        assert!(!queue.is_in_flight());
    }

    #[test]
    fn completion_with_nothing_in_flight_is_harmless() {
        let mut queue = CallQueue::new();
        assert_eq!(queue.complete(), None);
        assert!(!queue.is_in_flight());
    }

    #[test]
    fn completion_that_hands_out_a_call_is_in_flight() {
        let mut queue = CallQueue::new();
        queue.submit("a".into());
        queue.submit("b".into());
        queue.in_flight = false;

        assert_eq!(queue.complete().as_deref(), Some("b"));
        assert!(queue.is_in_flight());
    }

    #[test]
    fn abandoning_allows_immediate_dispatch_again() {
        let mut queue = CallQueue::new();
        queue.submit("a".into());
        queue.abandon_in_flight();
        assert_eq!(queue.submit("b".into()).as_deref(), Some("b"));
    }
}
