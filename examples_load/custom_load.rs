use std::io::Cursor;
use std::time::Instant;

use flux_log_adapter::convention::Convention;
use flux_log_adapter::noop_sink::NoopSink;
use flux_log_adapter::{copy, Converter};

fn main() {
    let converter = Converter::new(Convention::Legacy, "custom-load");

    // Every third line is plain text, the rest have no message key and go
    // through the key="value" fallback.
    let n: u64 = 100_000;
    let mut input = String::new();
    for i in 0..n {
        if i % 3 == 0 {
            input.push_str(&format!("plain text line {i}\n"));
        } else {
            input.push_str(&format!(
                "{{\"ts\":{i},\"caller\":\"warming.go:192\",\"component\":\"warmer\",\"image\":\"podinfo:{i}\",\"fetched\":{i}}}\n"
            ));
        }
    }

    let mut sink = NoopSink::default();
    let start = Instant::now();

    let stats = match copy(Cursor::new(input), converter, &mut sink) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("custom load failed: {e}");
            return;
        }
    };

    let elapsed = start.elapsed();
    println!("custom config: {} converted, {} passed through in {:?} (~{:.0} lines/s)",
        stats.converted,
        stats.passed_through,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
