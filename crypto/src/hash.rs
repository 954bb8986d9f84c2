//! Blake2b hashing and content-derived proposal identity.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use vota_types::{Address, Checkpoint, ChoiceLabel, ProposalId};

type Blake2b256 = Blake2b<U32>;

/// Domain separator mixed into every proposal id.
const PROPOSAL_DOMAIN: &[u8] = b"vota/proposal/v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derive the id of a proposal from its canonical content.
///
/// Variable-length fields are length-prefixed so that no two distinct inputs
/// share an encoding. Identical inputs always produce the same id.
pub fn proposal_id(
    proposer: &Address,
    snapshot: Checkpoint,
    duration: u64,
    choices: &[ChoiceLabel],
    description_ref: &str,
    max_selection: u8,
    min_selection: u8,
) -> ProposalId {
    let mut hasher = Blake2b256::new();
    hasher.update(PROPOSAL_DOMAIN);
    hasher.update(proposer.as_bytes());
    hasher.update(snapshot.as_u64().to_le_bytes());
    hasher.update(duration.to_le_bytes());
    hasher.update((choices.len() as u32).to_le_bytes());
    for choice in choices {
        hasher.update(choice.as_bytes());
    }
    hasher.update((description_ref.len() as u64).to_le_bytes());
    hasher.update(description_ref.as_bytes());
    hasher.update([max_selection, min_selection]);
    ProposalId::new(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<ChoiceLabel> {
        names.iter().map(|n| ChoiceLabel::new(n).unwrap()).collect()
    }

    fn base_id() -> ProposalId {
        proposal_id(
            &Address::new([1u8; 20]),
            Checkpoint::new(10),
            100,
            &labels(&["yes", "no"]),
            "ipfs://desc",
            1,
            1,
        )
    }

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello vota");
        let h2 = blake2b_256(b"hello vota");
        assert_eq!(h1, h2);
    }

    #[test]
    fn proposal_id_is_deterministic() {
        assert_eq!(base_id(), base_id());
        assert!(!base_id().is_zero());
    }

    #[test]
    fn proposal_id_changes_with_every_field() {
        let base = base_id();
        let proposer = Address::new([1u8; 20]);
        let choices = labels(&["yes", "no"]);
        let variants = [
            proposal_id(&Address::new([2u8; 20]), Checkpoint::new(10), 100, &choices, "ipfs://desc", 1, 1),
            proposal_id(&proposer, Checkpoint::new(11), 100, &choices, "ipfs://desc", 1, 1),
            proposal_id(&proposer, Checkpoint::new(10), 101, &choices, "ipfs://desc", 1, 1),
            proposal_id(&proposer, Checkpoint::new(10), 100, &labels(&["no", "yes"]), "ipfs://desc", 1, 1),
            proposal_id(&proposer, Checkpoint::new(10), 100, &choices, "ipfs://other", 1, 1),
            proposal_id(&proposer, Checkpoint::new(10), 100, &choices, "ipfs://desc", 2, 1),
            proposal_id(&proposer, Checkpoint::new(10), 100, &choices, "ipfs://desc", 2, 2),
        ];
        for variant in variants {
            assert_ne!(variant, base);
        }
    }
}
