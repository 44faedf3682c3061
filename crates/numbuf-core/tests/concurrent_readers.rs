//! Concurrent read access to a shared immutable buffer.
//!
//! `NumericBuffer` is `Send + Sync` with no interior mutability, so any number
//! of threads may read it at once and must all observe identical samples.

use std::sync::{Arc, Barrier};

use numbuf_core::{MutableNumericBuffer, NumericBuffer, SampleRead, SampleValue, SampleWrite, Shape};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn buffers_are_send_and_sync() {
    assert_send_sync::<NumericBuffer>();
    assert_send_sync::<MutableNumericBuffer>();
}

#[test]
fn concurrent_reads_16_threads_deterministic() {
    let _ = tracing_subscriber::fmt::try_init();

    let samples: Vec<i32> = (0..4096).map(|i| i * 7 - 10_000).collect();
    let buffer = NumericBuffer::from_samples(&samples, Some(Shape::new(vec![64, 64]))).unwrap();
    let expected: f64 = samples.iter().map(|&s| s as f64).sum();

    let n_threads = 16;
    let barrier = Arc::new(Barrier::new(n_threads));
    let sums: Vec<f64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..n_threads)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let shared = buffer.clone();
                s.spawn(move || {
                    barrier.wait();
                    shared.to_f64_vec().unwrap().iter().sum::<f64>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(sums.iter().all(|&s| s == expected));
}

#[test]
fn writer_copy_does_not_disturb_readers() {
    let buffer = NumericBuffer::from_samples(&[1u8, 2, 3, 4], None).unwrap();
    std::thread::scope(|s| {
        let reader = s.spawn(|| {
            (0..1000)
                .map(|_| buffer.sample_value(0).unwrap())
                .all(|v| v == SampleValue::U8(1))
        });
        let mut copy = buffer.to_mutable();
        for i in 0..1000u32 {
            copy.set_sample(0, SampleValue::U32(i % 256)).unwrap();
        }
        assert!(reader.join().unwrap());
    });
    assert_eq!(buffer.sample_value(0).unwrap(), SampleValue::U8(1));
}
