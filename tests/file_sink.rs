use flux_log_adapter::convention::Convention;
use flux_log_adapter::sink::WriterSink;
use flux_log_adapter::{copy, ConvertError, Converter};
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Write};

#[test]
fn converts_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("flux.log");
    let output_path = dir.path().join("stackdriver.ndjson");

    let mut input = File::create(&input_path).unwrap();
    writeln!(input, "starting").unwrap();
    writeln!(input, r#"{{"ts":"T","caller":"file.go:42","err":"boom","warn":"careful"}}"#).unwrap();
    drop(input);

    let reader = BufReader::new(File::open(&input_path).unwrap());
    let sink = WriterSink::new(File::create(&output_path).unwrap());
    copy(reader, Converter::new(Convention::Legacy, "helm-operator"), sink).unwrap();

    let out = fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        out,
        concat!(
            "starting\n",
            r#"{"severity":"ERROR","timestamp":"T","message":"boom","serviceContext":{"service":"helm-operator"},"caller":"file.go:42","err":"boom","warn":"careful","logging.googleapis.com/sourceLocation":{"file":"file.go","line":"42","function":"unknown"}}"#,
            "\r\n",
        )
    );
}

#[test]
fn malformed_line_fails_the_copy() {
    let mut sink = WriterSink::new(tempfile::tempfile().unwrap());
    let err = copy(
        Cursor::new("ok\n{invalid json\n"),
        Converter::default(),
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::MalformedLine { line: 2, .. }));
}

#[test]
fn severity_priority_per_convention() {
    let line = "{\"warn\":\"a\",\"err\":\"b\",\"msg\":\"c\"}\n";

    let flux = Converter::new(Convention::Flux, "fluxcd").convert_line(line.as_bytes()).unwrap();
    let flux = std::str::from_utf8(&flux).unwrap();
    assert!(flux.starts_with(r#"{"severity":"WARNING","timestamp":null,"message":"a","#));

    let legacy = Converter::new(Convention::Legacy, "fluxcd").convert_line(line.as_bytes()).unwrap();
    let legacy = std::str::from_utf8(&legacy).unwrap();
    assert!(legacy.starts_with(r#"{"severity":"ERROR","timestamp":null,"message":"b","#));
}
