#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Persisted state comes back from a host's store; decoding must never panic.
    let _ = vota_governance::GovernanceState::decode(data);

    let _ = bincode::deserialize::<vota_governance::Proposal>(data);
    let _ = bincode::deserialize::<vota_governance::Vote>(data);
    let _ = bincode::deserialize::<vota_governance::GovernanceParams>(data);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = text.parse::<vota_types::Address>();
        let _ = vota_governance::GovernanceConfig::from_toml_str(text);
    }
});
