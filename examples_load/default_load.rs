use std::io::Cursor;
use std::time::Instant;

use flux_log_adapter::noop_sink::NoopSink;
use flux_log_adapter::{copy, Converter};

fn main() {
    let n: u64 = 100_000;
    let mut input = String::new();
    for i in 0..n {
        input.push_str(&format!(
            "{{\"ts\":\"2020-05-04T10:00:00Z\",\"caller\":\"loop.go:{i}\",\"component\":\"sync-loop\",\"msg\":\"default load line\",\"iteration\":{i}}}\n"
        ));
    }

    let mut sink = NoopSink::default();
    let start = Instant::now();

    let stats = match copy(Cursor::new(input), Converter::default(), &mut sink) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("default load failed: {e}");
            return;
        }
    };

    let elapsed = start.elapsed();
    println!("default config: converted {} lines ({} bytes) in {:?} (~{:.0} lines/s)",
        stats.converted,
        sink.bytes,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
