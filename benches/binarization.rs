use barscan::detector::BinarizationBank;
use barscan::utils::binarization::{adaptive_binarize, gradient_binarize, otsu_binarize};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};

/// Working-resolution frame with a band of 2px bars
fn synthetic_frame() -> GrayImage {
    GrayImage::from_fn(320, 240, |x, y| {
        let inside = (100..220).contains(&x) && (90..150).contains(&y);
        if inside && ((x - 100) / 2) % 2 == 0 {
            Luma([20])
        } else {
            Luma([230])
        }
    })
}

fn bench_otsu(c: &mut Criterion) {
    let gray = synthetic_frame();
    c.bench_function("otsu_320x240", |b| b.iter(|| otsu_binarize(black_box(&gray))));
}

fn bench_adaptive(c: &mut Criterion) {
    let gray = synthetic_frame();
    c.bench_function("adaptive_21_320x240", |b| {
        b.iter(|| adaptive_binarize(black_box(&gray), black_box(21), black_box(5.0)))
    });
    c.bench_function("adaptive_31_320x240", |b| {
        b.iter(|| adaptive_binarize(black_box(&gray), black_box(31), black_box(10.0)))
    });
}

fn bench_gradient(c: &mut Criterion) {
    let gray = synthetic_frame();
    c.bench_function("gradient_320x240", |b| {
        b.iter(|| gradient_binarize(black_box(&gray), black_box(50.0)))
    });
}

fn bench_bank(c: &mut Criterion) {
    let gray = synthetic_frame();
    let bank = BinarizationBank::standard();
    c.bench_function("bank_standard_320x240", |b| b.iter(|| bank.binarize(black_box(&gray))));
}

criterion_group!(benches, bench_otsu, bench_adaptive, bench_gradient, bench_bank);
criterion_main!(benches);
