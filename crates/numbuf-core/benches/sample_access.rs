use criterion::{Criterion, black_box, criterion_group, criterion_main};
use numbuf_core::{ByteOrder, NumericBuffer, SampleRead, TypeDescriptor};

fn bench_sample_value(c: &mut Criterion) {
    let samples: Vec<f32> = (0..65_536).map(|i| i as f32 * 0.5).collect();
    let native = NumericBuffer::from_samples(&samples, None).unwrap();
    let swapped_order = if ByteOrder::native() == ByteOrder::BigEndian {
        ByteOrder::LittleEndian
    } else {
        ByteOrder::BigEndian
    };
    let swapped = NumericBuffer::new(
        native.bytes(),
        TypeDescriptor::float(4).with_byte_order(swapped_order),
        None,
    )
    .unwrap();

    c.bench_function("sample_value_f32_native_64k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..native.num_samples() {
                acc += native.sample_value(black_box(i)).unwrap().as_f64();
            }
            acc
        })
    });

    c.bench_function("sample_value_f32_swapped_64k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..swapped.num_samples() {
                acc += swapped.sample_value(black_box(i)).unwrap().as_f64();
            }
            acc
        })
    });

    c.bench_function("to_f64_vec_f32_64k", |b| {
        b.iter(|| black_box(native.to_f64_vec().unwrap()))
    });
}

criterion_group!(benches, bench_sample_value);
criterion_main!(benches);
