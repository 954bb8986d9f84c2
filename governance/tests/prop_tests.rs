use proptest::prelude::*;

use vota_governance::{ChoiceMask, GovernanceConfig, GovernanceEngine, NewProposal, Role};
use vota_nullables::{NullAuthorizer, NullClock, NullCredentialLedger};
use vota_types::{Address, Checkpoint, ChoiceLabel, NodeLevel};

const PROPOSER: Address = Address::new([0xB0; 20]);

fn engine() -> GovernanceEngine<NullCredentialLedger, NullClock, NullAuthorizer> {
    GovernanceEngine::new(
        &GovernanceConfig::default(),
        NullCredentialLedger::new(),
        NullClock::new(0),
        NullAuthorizer::new().with(Role::Proposer, PROPOSER),
    )
    .unwrap()
}

fn level(index: usize) -> NodeLevel {
    NodeLevel::ALL[index % NodeLevel::ALL.len()]
}

proptest! {
    /// Per-choice totals always sum to the weight cast, whatever the ballots.
    #[test]
    fn choice_totals_sum_to_cast_weight(
        ballots in prop::collection::vec((0usize..7, 1u32..32, 1usize..4), 1..12),
    ) {
        let mut engine = engine();
        let choices: Vec<ChoiceLabel> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|l| ChoiceLabel::new(l).unwrap())
            .collect();
        let request = NewProposal {
            snapshot: Checkpoint::new(1),
            duration: 10,
            choices,
            max_selection: 5,
            min_selection: 1,
            description_ref: "ipfs://prop".into(),
        };
        let id = engine.propose(&PROPOSER, request).unwrap();

        for (n, (level_index, _, credentials)) in ballots.iter().enumerate() {
            let voter = Address::new([n as u8 + 1; 20]);
            for _ in 0..*credentials {
                engine.ledger().mint(level(*level_index), voter, Checkpoint::new(0));
            }
        }
        engine.clock().set(1);

        let mut cast = 0u128;
        for (n, (_, bits, _)) in ballots.iter().enumerate() {
            let voter = Address::new([n as u8 + 1; 20]);
            cast += engine.cast_vote(&voter, &id, ChoiceMask::from_bits(*bits), None).unwrap();
        }

        let per_choice: u128 = engine.choice_weights(&id).unwrap().iter().sum();
        prop_assert_eq!(per_choice, cast);
        prop_assert_eq!(engine.total_votes(&id).unwrap(), cast);
    }

    /// Delegation moves weight between owner and delegate; it never creates or destroys it.
    #[test]
    fn delegation_conserves_weight(
        owner_levels in prop::collection::vec(0usize..7, 1..6),
        delegated in prop::collection::vec(any::<bool>(), 6),
        at in 1u64..50,
    ) {
        let engine = engine();
        let owner = Address::new([1; 20]);
        let delegate = Address::new([2; 20]);
        let ids: Vec<_> = owner_levels
            .iter()
            .map(|l| engine.ledger().mint(level(*l), owner, Checkpoint::new(0)))
            .collect();
        for (id, moved) in ids.iter().zip(&delegated) {
            if *moved {
                engine.ledger().delegate(*id, delegate, Checkpoint::new(at)).unwrap();
            }
        }

        let sum = |cp: u64| {
            engine.get_vote_weight_at(&owner, Checkpoint::new(cp), None).unwrap()
                + engine.get_vote_weight_at(&delegate, Checkpoint::new(cp), None).unwrap()
        };
        prop_assert_eq!(sum(at - 1), sum(at));
        prop_assert_eq!(
            engine.get_vote_weight_at(&delegate, Checkpoint::new(at - 1), None).unwrap(),
            0
        );
    }

    /// Masks accepted by validation only ever select indices inside the ballot.
    #[test]
    fn valid_masks_stay_in_range(bits in any::<u32>(), count in 1usize..=32, max in 1u8..=32) {
        let mask = ChoiceMask::from_bits(bits);
        if mask.is_valid_for(count, 1, max) {
            prop_assert!(mask.indices().all(|i| (i as usize) < count));
            prop_assert!(mask.count() >= 1 && mask.count() <= max as u32);
        }
    }
}
