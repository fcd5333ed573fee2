use std::thread;
use std::time::Instant;
use tracing::{error, info, info_span, Level};

use tracing_json_layout::config::LayoutOptions;
use tracing_json_layout::init::{init_tracing_with_config, LayerConfig};

fn main() {
    let layer_config = LayerConfig {
        max_level: Level::DEBUG,
        options: LayoutOptions {
            env_property_list: "HOME, USER".to_string(),
            jvm_property_list: "os.name,process.id".to_string(),
            include_host: "true".to_string(),
            log_slow_properties: "true".to_string(),
            pretty: true,
        },
    };

    init_tracing_with_config(std::io::stdout, layer_config).expect("install json layout");

    let n: u64 = 4;
    let start = Instant::now();

    let handle = thread::Builder::new()
        .name("custom-load".to_string())
        .spawn(move || {
            let span = info_span!("batch", job = "custom");
            let _guard = span.enter();
            for i in 0..n {
                info!(iteration = i, "custom load test event");
            }
            let err = std::io::Error::other("custom load failure");
            error!(error = &err as &(dyn std::error::Error + 'static), "custom load test error");
        })
        .expect("spawn logging thread");
    let _ = handle.join();

    let elapsed = start.elapsed();
    eprintln!("custom config: encoded {} events in {:?}", n + 1, elapsed);
}
