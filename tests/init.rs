use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::info;
use tracing_json_layout::env::{
    JSON_LAYOUT_JVM_PROPERTY_LIST_ENV, JSON_LAYOUT_LOG_SLOW_PROPERTIES_ENV,
};
use tracing_json_layout::init::{init_tracing, init_tracing_with_config, InitError, LayerConfig};

#[derive(Clone, Debug, Default)]
struct TestWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestWriter {
    fn records(&self) -> Vec<Value> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TestWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// The global subscriber can be set once per process, so this binary holds a
// single test.
#[test]
fn global_layout_is_installed_once_from_env() {
    std::env::set_var(JSON_LAYOUT_JVM_PROPERTY_LIST_ENV, "os.name");
    std::env::set_var(JSON_LAYOUT_LOG_SLOW_PROPERTIES_ENV, "true");

    let config = LayerConfig::from_env();
    assert_eq!(config.max_level, tracing::Level::INFO);
    assert_eq!(config.options.jvm_property_list, "os.name");
    assert_eq!(config.options.log_slow_properties, "true");

    let writer = TestWriter::default();
    init_tracing_with_config(writer.clone(), config).unwrap();

    info!(request = "r-1", "installed globally");
    tracing::debug!("below max level");

    let records = writer.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["message"], "installed globally");
    assert_eq!(record["request"], "r-1");
    assert_eq!(record["jvm_os.name"], std::env::consts::OS);
    assert!(record["file"].as_str().unwrap().ends_with("init.rs"));

    let again = init_tracing_with_config(TestWriter::default(), LayerConfig::default());
    assert!(matches!(again, Err(InitError::AlreadySet(_))));
    assert!(matches!(init_tracing(), Err(InitError::AlreadySet(_))));
}
