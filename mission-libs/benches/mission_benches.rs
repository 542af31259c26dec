use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mission_libs::{build_grid, resolve_offset, suggest_best, Roster, SubmitForm};

fn roster(size: usize) -> Roster {
    (0..size)
        .map(|i| {
            let offset = (i % 27) as i32 - 12;
            let sign = if offset < 0 { '-' } else { '+' };
            let start = 6 + i % 8;
            SubmitForm::new(
                &format!("user-{}", i),
                &format!("UTC{}{:02}:00", sign, offset.abs()),
                &format!("{:02}:00", start),
                &format!("{:02}:30", start + 4),
            )
            .validate()
            .expect("generated form is valid")
        })
        .collect()
}

fn grid_and_suggest(c: &mut Criterion) {
    let anchor = Utc.with_ymd_and_hms(2026, 10, 16, 7, 42, 0).unwrap();

    c.bench_function("resolve_offset", |b| {
        b.iter(|| black_box(resolve_offset(black_box("(UTC+05:30) Chennai, Kolkata"))))
    });

    for size in [5, 50] {
        let roster = roster(size);

        c.bench_function(&format!("build_grid {}", size), |b| {
            b.iter(|| black_box(build_grid(&roster, anchor).count()))
        });

        c.bench_function(&format!("suggest_best {}", size), |b| {
            b.iter(|| black_box(suggest_best(&roster, anchor)))
        });
    }
}

criterion_group!(benches, grid_and_suggest);
criterion_main!(benches);
