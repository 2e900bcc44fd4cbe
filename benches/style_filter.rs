use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ghibli_studio::{filter::StyleFilter, raster::RasterImage};

fn gradient(width: u32, height: u32) -> RasterImage {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).flat_map(move |x| {
                [
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    ((x + y) % 256) as u8,
                ]
            })
        })
        .collect();
    RasterImage::from_raw(width, height, 3, data).expect("valid gradient")
}

fn bench_filter(c: &mut Criterion) {
    let filter = StyleFilter::default();
    let mut group = c.benchmark_group("style_filter");

    for &(w, h) in &[(256u32, 256u32), (1024, 768)] {
        let image = gradient(w, h);
        group.bench_with_input(BenchmarkId::new("apply", format!("{}x{}", w, h)), &image, |b, image| {
            b.iter(|| filter.apply(black_box(image)).expect("filter"))
        });
        group.bench_with_input(BenchmarkId::new("grade", format!("{}x{}", w, h)), &image, |b, image| {
            b.iter(|| filter.grade(black_box(image)).expect("grade"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
