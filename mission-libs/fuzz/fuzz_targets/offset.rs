#![no_main]
use libfuzzer_sys::fuzz_target;
use mission_libs::{normalize, resolve_offset, TimeOfDay};

fuzz_target!(|data: (String, TimeOfDay)| {
    let (label, local) = data;
    let offset = resolve_offset(&label);

    if !label.contains("UTC") {
        assert_eq!(offset, 0, "Labels without UTC should not resolve: {:?}", label);
    }

    assert!(
        offset.abs() <= 99 * 60 + 99,
        "Offset {} out of the label's range for {:?}",
        offset,
        label
    );

    let minute = normalize(local, offset);
    assert!(minute < 1440, "{} at {} normalized to {}", local, offset, minute);
});
