#![no_main]

use libfuzzer_sys::fuzz_target;
use yeet_core::RecordSet;

fn now_from(data: &[u8]) -> i64 {
    let mut buf = [0u8; 8];
    let take = data.len().min(8);
    buf[..take].copy_from_slice(&data[..take]);
    i64::from_le_bytes(buf)
}

fuzz_target!(|data: &[u8]| {
    let Ok(records) = serde_json::from_slice::<RecordSet>(data) else {
        return;
    };

    // Re-encoding is lossless once a document has been accepted.
    let encoded = serde_json::to_vec(&records).expect("accepted document re-encodes");
    let decoded: RecordSet =
        serde_json::from_slice(&encoded).expect("re-encoded document parses");
    assert_eq!(decoded, records);

    let now = now_from(data);
    let mut kept = records.clone();
    let expired = kept.split_expired(now);

    assert_eq!(expired.len() + kept.len(), records.len());
    assert!(expired.iter().all(|r| r.expires_at <= now));
    assert!(kept.iter().all(|r| r.expires_at > now));

    let order: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let kept_order: Vec<&str> = kept.iter().map(|r| r.name.as_str()).collect();
    let expected: Vec<&str> = order
        .iter()
        .copied()
        .filter(|name| kept.contains(name))
        .collect();
    assert_eq!(kept_order, expected);
});
