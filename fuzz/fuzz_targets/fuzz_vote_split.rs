#![no_main]

use libfuzzer_sys::fuzz_target;

use vota_governance::tally::split_weight;
use vota_governance::ChoiceMask;

fuzz_target!(|data: &[u8]| {
    if data.len() < 22 {
        return;
    }
    let bits = u32::from_le_bytes(data[..4].try_into().unwrap());
    let weight = u128::from_le_bytes(data[4..20].try_into().unwrap());
    let choice_count = data[20] as usize % 33;
    let max = data[21] % 33;

    let mask = ChoiceMask::from_bits(bits);
    if mask.is_valid_for(choice_count, 1, max) {
        let split = split_weight(weight, mask);
        assert_eq!(split.len() as u32, mask.count());
        assert!(split.iter().all(|(i, _)| (*i as usize) < choice_count));
        let total: u128 = split.iter().map(|(_, w)| *w).sum();
        assert_eq!(total, weight, "split must conserve weight");
    }
});
