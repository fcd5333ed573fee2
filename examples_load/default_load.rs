use std::io;
use std::thread;
use std::time::Instant;
use tracing::{error, info, info_span};

use tracing_json_layout::init::{init_tracing_with_config, LayerConfig};

fn main() {
    init_tracing_with_config(io::sink, LayerConfig::default()).expect("install json layout");

    let threads: u64 = 10;
    let per_thread: u64 = 10_000;
    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            thread::Builder::new()
                .name(format!("logging-thread-{}", t))
                .spawn(move || {
                    let span = info_span!("worker", pool = t % 3);
                    let _guard = span.enter();
                    for i in 0..per_thread {
                        info!(txn = i, "msg {} from thread {}", i, t);
                    }
                    error!(exception = "Exception: something bad happened here", "bad exception");
                })
                .expect("spawn logging thread")
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }

    let n = threads * (per_thread + 1);
    let elapsed = start.elapsed();
    println!("default config: encoded {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
