use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use scribble_drawing::{replay, Point, RecordingCanvas, SharedDrawing};
use yrs::Doc;

fn drawing_with(strokes: usize, points: usize) -> SharedDrawing {
    let drawing = SharedDrawing::new(Doc::new());
    for s in 0..strokes {
        let y = s as f64 / strokes as f64;
        let path = drawing.begin_stroke("#333", Point::new(0.0, y));
        for p in 0..points {
            drawing.extend_stroke(&path, Point::new(p as f64 / points as f64, y));
        }
    }
    drawing
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("Replay");

    for strokes in [10usize, 100] {
        let drawing = drawing_with(strokes, 50);

        group.bench_with_input(BenchmarkId::new("read_strokes", strokes), &drawing, |b, drawing| {
            b.iter(|| black_box(drawing.strokes()))
        });

        let snapshot = drawing.strokes();
        group.bench_with_input(BenchmarkId::new("replay", strokes), &snapshot, |b, snapshot| {
            let mut canvas = RecordingCanvas::new(2000.0);
            b.iter(|| {
                canvas.take_commands();
                replay(&mut canvas, black_box(snapshot));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
