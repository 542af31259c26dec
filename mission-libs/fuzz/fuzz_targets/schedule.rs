#![no_main]
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use mission_libs::{build_grid, suggest_best, Participant, Roster};

fuzz_target!(|data: (Vec<Participant>, u32)| {
    #[cfg(feature = "log")]
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply();

    let (people, anchor_secs) = data;
    let roster: Roster = people.into_iter().collect();
    let anchor = match Utc.timestamp_opt(anchor_secs as i64, 0).single() {
        Some(anchor) => anchor,
        None => return,
    };

    let rows = build_grid(&roster, anchor).collect::<Vec<_>>();
    assert_eq!(rows.len(), 24, "Grid should always have 24 rows");
    assert!(
        rows.iter().all(|row| row.cells.len() == roster.len()),
        "Every row needs a cell per participant"
    );

    let max = rows.iter().map(|row| row.available_count()).max().unwrap_or(0);
    match suggest_best(&roster, anchor) {
        None => assert_eq!(max, 0, "Missed a slot with {} available", max),
        Some(best) => {
            let first = rows
                .iter()
                .find(|row| row.available_count() == max)
                .expect("max comes from a row");
            assert_eq!(best, first.instant, "Suggestion is not the first best slot");
        }
    }
});
