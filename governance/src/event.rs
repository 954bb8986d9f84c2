//! Observable governance events.

use vota_types::{Address, Checkpoint, LevelMultipliers, ProposalId};

use crate::choice::ChoiceMask;
use crate::params::ParameterChange;

/// Emitted after each successful state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        snapshot: Checkpoint,
        deadline: Checkpoint,
        choice_count: usize,
        description_ref: String,
    },
    ProposalCanceled {
        id: ProposalId,
        by: Address,
        reason: Option<String>,
    },
    ProposalExecuted {
        id: ProposalId,
        by: Address,
        comment: Option<String>,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        choices: ChoiceMask,
        weight: u128,
        reason: Option<String>,
    },
    ParameterChanged(ParameterChange),
    LevelMultipliersUpdated {
        old: Option<LevelMultipliers>,
        new: LevelMultipliers,
        effective_from: Checkpoint,
    },
}

type Listener = Box<dyn Fn(&GovernanceEvent) + Send + Sync>;

/// Synchronous fan-out to every subscriber, in subscription order.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn created() -> GovernanceEvent {
        GovernanceEvent::ProposalCreated {
            id: ProposalId::ZERO,
            proposer: Address::new([1; 20]),
            snapshot: Checkpoint::new(2),
            deadline: Checkpoint::new(12),
            choice_count: 2,
            description_ref: "ipfs://x".into(),
        }
    }

    #[test]
    fn emit_reaches_every_listener() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&created());
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listeners_can_filter_by_variant() {
        let votes = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::default();
        let v = Arc::clone(&votes);
        bus.subscribe(Box::new(move |event| {
            if matches!(event, GovernanceEvent::VoteCast { .. }) {
                v.fetch_add(1, Ordering::SeqCst);
            }
        }));

        bus.emit(&created());
        bus.emit(&GovernanceEvent::VoteCast {
            id: ProposalId::ZERO,
            voter: Address::new([2; 20]),
            choices: ChoiceMask::single(0),
            weight: 10_000,
            reason: None,
        });
        assert_eq!(votes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_bus_is_noop() {
        let bus = EventBus::default();
        assert_eq!(bus.listener_count(), 0);
        bus.emit(&created());
    }
}
