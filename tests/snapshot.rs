use flux_log_adapter::sink::WriterSink;
use flux_log_adapter::{copy, Converter};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn convert_fixture() -> Vec<u8> {
    let source = File::open(fixture("fluxlogs-source.ndjson")).unwrap();
    let mut sink = WriterSink::new(Vec::new());
    let stats = copy(BufReader::new(source), Converter::default(), &mut sink).unwrap();
    let out = sink.into_inner();

    assert!(stats.bytes_written > 0);
    assert_eq!(stats.bytes_written, out.len() as u64);
    assert_eq!(stats.lines, 13);
    assert_eq!(stats.converted, 10);
    assert_eq!(stats.passed_through, 3);
    out
}

#[test]
fn fluxlogs_snapshot() {
    let expected = std::fs::read(fixture("fluxlogs-expected.ndjson")).unwrap();
    let actual = convert_fixture();
    assert_eq!(
        String::from_utf8(actual).unwrap(),
        String::from_utf8(expected).unwrap(),
        "converted output no longer matches tests/fixtures/fluxlogs-expected.ndjson"
    );
}

#[test]
fn fluxlogs_snapshot_is_stable() {
    assert_eq!(convert_fixture(), convert_fixture());
}

#[test]
fn every_entry_keeps_the_fixed_key_order() {
    let out = String::from_utf8(convert_fixture()).unwrap();
    for line in out.split_inclusive('\n').filter(|l| l.starts_with('{')) {
        let line = line.strip_suffix("\r\n").unwrap();
        let severity = line.find("\"severity\":").unwrap();
        let timestamp = line.find("\"timestamp\":").unwrap();
        let message = line.find("\"message\":").unwrap();
        let context = line.find("\"serviceContext\":").unwrap();
        assert_eq!(severity, 1, "{line}");
        assert!(severity < timestamp && timestamp < message && message < context);
        assert!(!line.contains("\"ts\":"), "{line}");
        assert!(!line.contains("\"caller\":"), "{line}");
        if let Some(pos) = line.find("\"logging.googleapis.com/sourceLocation\":") {
            assert!(line[pos..].ends_with("\"function\":\"unknown\"}}"), "{line}");
        }
    }
}
