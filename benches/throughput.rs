use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use packring::{Full, Packet, PacketQueue};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const MESSAGES: u64 = 1_000_000;
const BATCH_SIZE: usize = 4096;

fn enqueue_spinning(queue: &PacketQueue<Packet>, mut packet: Packet) {
    loop {
        match queue.enqueue(packet) {
            Ok(()) => return,
            Err(Full(p)) => {
                packet = p;
                std::hint::spin_loop();
            }
        }
    }
}

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(MESSAGES));

    group.bench_function("single_item", |b| {
        b.iter(|| {
            let queue = Arc::new(PacketQueue::new(8192).unwrap());

            let producer = {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for id in 0..MESSAGES {
                        enqueue_spinning(&queue, Packet::with_id(id));
                    }
                })
            };

            let mut received = 0u64;
            while received < MESSAGES {
                match queue.dequeue() {
                    Some(packet) => {
                        black_box(packet.id);
                        received += 1;
                    }
                    None => std::hint::spin_loop(),
                }
            }

            producer.join().unwrap();
        });
    });

    group.bench_function("batch", |b| {
        b.iter(|| {
            let queue = Arc::new(PacketQueue::new(8192).unwrap());

            let producer = {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut sent = 0u64;
                    while sent < MESSAGES {
                        let want = BATCH_SIZE.min((MESSAGES - sent) as usize);
                        let burst: Vec<Packet> =
                            (sent..sent + want as u64).map(Packet::with_id).collect();
                        let mut placed = 0;
                        while placed < burst.len() {
                            let n = queue.enqueue_batch(&burst[placed..]);
                            if n == 0 {
                                std::hint::spin_loop();
                            }
                            placed += n;
                        }
                        sent += want as u64;
                    }
                })
            };

            let mut out = vec![Packet::default(); BATCH_SIZE];
            let mut received = 0u64;
            while received < MESSAGES {
                let n = queue.dequeue_batch(&mut out);
                if n == 0 {
                    std::hint::spin_loop();
                }
                for packet in &out[..n] {
                    black_box(packet.id);
                }
                received += n as u64;
            }

            producer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_mpmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc");

    for threads in [2usize, 4].iter() {
        let total = MESSAGES;
        let per_producer = total / *threads as u64;
        group.throughput(Throughput::Elements(per_producer * *threads as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{threads}P_{threads}C")),
            threads,
            |b, &n| {
                b.iter(|| {
                    let queue = Arc::new(PacketQueue::new(8192).unwrap());
                    let consumed = Arc::new(AtomicUsize::new(0));
                    let target = (per_producer * n as u64) as usize;
                    let mut handles = Vec::new();

                    for p in 0..n as u64 {
                        let queue = Arc::clone(&queue);
                        handles.push(thread::spawn(move || {
                            for i in 0..per_producer {
                                enqueue_spinning(
                                    &queue,
                                    Packet::with_id(p * 10_000_000 + i),
                                );
                            }
                        }));
                    }

                    for _ in 0..n {
                        let queue = Arc::clone(&queue);
                        let consumed = Arc::clone(&consumed);
                        handles.push(thread::spawn(move || loop {
                            match queue.dequeue() {
                                Some(packet) => {
                                    black_box(packet.id);
                                    consumed.fetch_add(1, Ordering::Relaxed);
                                }
                                None => {
                                    if consumed.load(Ordering::Relaxed) >= target {
                                        break;
                                    }
                                    std::hint::spin_loop();
                                }
                            }
                        }));
                    }

                    for h in handles {
                        h.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_try_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(1));

    group.bench_function("try_enqueue_try_dequeue", |b| {
        let queue = PacketQueue::new(1024).unwrap();
        b.iter(|| {
            queue.try_enqueue(Packet::with_id(1)).unwrap();
            black_box(queue.try_dequeue().unwrap());
        });
    });

    group.bench_function("enqueue_dequeue", |b| {
        let queue = PacketQueue::new(1024).unwrap();
        b.iter(|| {
            queue.enqueue(Packet::with_id(1)).unwrap();
            black_box(queue.dequeue().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc, bench_mpmc, bench_try_variants);
criterion_main!(benches);
