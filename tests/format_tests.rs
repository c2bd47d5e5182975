use std::fs;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use metatable::{ColumnId, MetadataTable, ReadOptions, TableError, WriteOptions};

fn sample() -> MetadataTable {
    let mut table = MetadataTable::new();
    table
        .insert_column(vec!["s1".into(), "s2".into()], Some("sample".into()))
        .unwrap();
    table
        .insert_column(vec!["reads_1.fq".into(), "reads_2.fq".into()], Some("path".into()))
        .unwrap();
    table
}

#[test]
fn test_gzip_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.tsv.gz");
    let table = sample();

    table
        .write(&path, &WriteOptions::new().with_compression_level(9))
        .unwrap();
    let raw = fs::read(&path).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);

    let mut copy = MetadataTable::new();
    copy.read(&path, &ReadOptions::new()).unwrap();
    assert_eq!(copy.column_names(), table.column_names());
    assert_eq!(copy.column(&"path".into()).unwrap(), vec!["reads_1.fq", "reads_2.fq"]);
}

#[test]
fn test_read_externally_compressed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("external.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::fast());
    encoder.write_all(b"a\tb\n# comment\n1\t2\n").unwrap();
    encoder.finish().unwrap();

    let mut table = MetadataTable::new();
    table.read(&path, &ReadOptions::new()).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.column(&"b".into()).unwrap(), vec!["2"]);
}

#[test]
fn test_corrupt_gzip_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tsv.gz");
    fs::write(&path, "definitely not gzip\n").unwrap();

    let mut table = MetadataTable::new();
    let err = table.read(&path, &ReadOptions::new()).unwrap_err();
    assert!(matches!(err, TableError::Io(_)));
    assert_eq!(table.column_count(), 0);
}

#[test]
fn test_plain_level_ignores_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.tsv");
    sample().write(&path, &WriteOptions::new()).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "sample\tpath\ns1\treads_1.fq\ns2\treads_2.fq\n"
    );
}

#[test]
fn test_headerless_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positional.csv");
    fs::write(&path, "a,b,c\r\nd,e,f\n").unwrap();

    let options = ReadOptions::new().with_header(false).with_separator(',');
    let mut table = MetadataTable::new();
    table.read(&path, &options).unwrap();
    assert_eq!(
        table.column_names(),
        vec![ColumnId::Index(0), ColumnId::Index(1), ColumnId::Index(2)]
    );
    assert_eq!(table.column(&2usize.into()).unwrap(), vec!["c", "f"]);

    let out = dir.path().join("positional_out.csv");
    table
        .write(&out, &WriteOptions::new().with_separator(','))
        .unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "0,1,2\na,b,c\nd,e,f\n");
}

#[test]
fn test_bad_row_width_names_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.tsv");
    fs::write(&path, "a\tb\n1\t2\n\n3\n").unwrap();

    let mut table = MetadataTable::new();
    let err = table.read(&path, &ReadOptions::new()).unwrap_err();
    match err {
        TableError::Format { line, expected, found } => {
            assert_eq!(line, 3);
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_latin1_cell_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.tsv");
    fs::write(&path, b"id\tname\n1\tJos\xe9\n").unwrap();

    let mut table = MetadataTable::new();
    let err = table.read(&path, &ReadOptions::new()).unwrap_err();
    assert!(matches!(err, TableError::Encoding { line: 1, offset: 5 }));
    assert_eq!(table.column_count(), 0);
}
