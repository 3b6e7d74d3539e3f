use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{ImageFormat, Rgba, RgbaImage};
use img_slim::{
    to_lossless_level, to_lossy_quality_fraction, BatchRunner, BatchSettings,
    CompressionOrchestrator, OutputFormat, QualityRequest, SourceImage,
};
use std::io::Cursor;
use tokio::runtime::Runtime;

fn create_test_image(width: u32, height: u32) -> SourceImage {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    });
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    SourceImage::new("bench.png", "image/png", buffer.into_inner())
}

fn bench_quality_mapping(c: &mut Criterion) {
    c.bench_function("quality_mapping", |b| {
        b.iter(|| {
            for q in 1..=100u8 {
                let quality = QualityRequest::new(black_box(q)).unwrap();
                black_box(to_lossless_level(quality));
                black_box(to_lossy_quality_fraction(quality));
            }
        })
    });
}

fn bench_single_image(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let orchestrator = CompressionOrchestrator::default();
    let mut group = c.benchmark_group("single_image");
    group.sample_size(10);

    for size in [Small, Medium] {
        let (width, height) = match size {
            Small => (320, 240),
            Medium => (1280, 720),
        };
        let image = create_test_image(width, height);

        for format in OutputFormat::ALL {
            let settings = BatchSettings::new(80, format).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format.extension(), format!("{}x{}", width, height)),
                &image,
                |b, image| {
                    b.to_async(&runtime).iter(|| {
                        orchestrator.try_compress(black_box(image), settings, None)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_batch_processing(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let images: Vec<_> = (0..8).map(|_| create_test_image(400, 300)).collect();
    let settings = BatchSettings::new(75, OutputFormat::WebP).unwrap();
    let mut group = c.benchmark_group("batch_processing");
    group.sample_size(10);

    for concurrency in [1, 4] {
        let runner = BatchRunner::default().with_concurrency(concurrency);
        group.bench_with_input(
            BenchmarkId::new("webp", concurrency),
            &images,
            |b, images| b.to_async(&runtime).iter(|| runner.run(black_box(images), settings)),
        );
    }

    group.finish();
}

enum ImageSize {
    Small,
    Medium,
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_quality_mapping,
    bench_single_image,
    bench_batch_processing
);
criterion_main!(benches);
