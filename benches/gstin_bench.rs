use chrono::{NaiveDate, NaiveDateTime};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gstin_tracker::api::{PublicGstinInfo, normalize_public};
use gstin_tracker::core::*;
use gstin_tracker::status::{check_gstin_info, refresh_decision};

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn now() -> NaiveDateTime {
    test_date().and_hms_opt(12, 0, 0).unwrap()
}

fn cancelled_record() -> GstinRecord {
    GstinRecord::builder("27AAPFU0939F1ZV")
        .status(GstinStatus::Cancelled)
        .registration_date(NaiveDate::from_ymd_opt(2017, 7, 1).unwrap())
        .cancelled_date(NaiveDate::from_ymd_opt(2023, 3, 31).unwrap())
        .last_updated_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
        .build()
}

fn bench_validate_gstin(c: &mut Criterion) {
    c.bench_function("validate_gstin", |b| {
        b.iter(|| black_box(validate_gstin(black_box("27aapfu0939f1zv"))));
    });
}

fn bench_check_digit_1000(c: &mut Criterion) {
    let bodies: Vec<String> = (0..1000)
        .map(|i| format!("27AAPFU{i:04}F1Z"))
        .collect();
    c.bench_function("check_char_1000", |b| {
        b.iter(|| {
            for body in &bodies {
                black_box(gstin_check_char(black_box(body)));
            }
        });
    });
}

fn bench_normalize_public(c: &mut Criterion) {
    let info = PublicGstinInfo {
        gstin: "27AAPFU0939F1ZV".into(),
        rgdt: Some("01/07/2017".into()),
        cxdt: Some("31/03/2023".into()),
        sts: "Cancelled".into(),
        ..Default::default()
    };
    c.bench_function("normalize_public", |b| {
        b.iter(|| black_box(normalize_public(black_box(info.clone()))));
    });
}

fn bench_validation_pipeline(c: &mut Criterion) {
    let record = cancelled_record();
    let settings = GstSettings {
        enable_api: true,
        api_secret: Some("secret".into()),
        ..Default::default()
    };
    c.bench_function("refresh_and_validate", |b| {
        b.iter(|| {
            let decision = refresh_decision(
                black_box(&settings),
                Some(&record),
                Some(test_date()),
                false,
                now(),
            );
            black_box(decision);
            black_box(check_gstin_info(black_box(&record), test_date()))
        });
    });
}

criterion_group!(
    benches,
    bench_validate_gstin,
    bench_check_digit_1000,
    bench_normalize_public,
    bench_validation_pipeline,
);
criterion_main!(benches);
