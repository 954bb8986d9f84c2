#![no_main]

use libfuzzer_sys::fuzz_target;

use vota_governance::Checkpoints;
use vota_types::Checkpoint;

// Arbitrary push sequences followed by lookups. Accepted pushes must keep the
// history ordered, and every lookup must agree with a linear scan.
fuzz_target!(|data: &[u8]| {
    let mut history = Checkpoints::<u64>::new();
    let mut chunks = data.chunks_exact(16);
    for chunk in &mut chunks {
        let at = u64::from_le_bytes(chunk[..8].try_into().unwrap());
        let value = u64::from_le_bytes(chunk[8..].try_into().unwrap());
        let _ = history.push(Checkpoint::new(at % 1_000), value);
    }

    let keys: Vec<Checkpoint> = history.iter().map(|(k, _)| *k).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "history out of order");

    for probe in chunks.remainder().iter().map(|b| *b as u64 * 4) {
        let at = Checkpoint::new(probe);
        let expected = history
            .iter()
            .filter(|(k, _)| *k <= at)
            .last()
            .map(|(_, v)| v);
        assert_eq!(history.lookup(at), expected);
    }
});
