//! Random access over an independent handle

use mbox_rs::{
    count_messages, read_header_at, read_message_body, read_raw_message, HeaderConfig,
    LineReader, Loader, MboxError,
};
use std::io::{BufReader, Cursor, Seek, SeekFrom, Write};

const MBOX: &str = "\
From alice@example.com Mon Apr 27 12:56:18 2009
Message-Id: <1@example.com>
Subject: first

From sea to shining sea.
From bob@bob.com Mon Apr 27 12:56:19 2009
Message-Id: <2@example.com>
Subject: second
  continued

last body
";

#[test]
fn test_walk_and_read_every_message() {
    let boundaries: Vec<u64> = Loader::new(LineReader::new(Cursor::new(MBOX)))
        .map(|b| b.unwrap().offset)
        .collect();
    assert_eq!(boundaries.len(), 2);

    let mut handle = Cursor::new(MBOX);
    let config = HeaderConfig::default();

    let first = read_header_at(&mut handle, boundaries[0], &config).unwrap();
    assert_eq!(first.get("Message-Id"), Some("1@example.com"));
    assert_eq!(first.get("Subject"), Some("first"));

    let second = read_header_at(&mut handle, boundaries[1], &config).unwrap();
    assert_eq!(second.get("Message-Id"), Some("2@example.com"));
    assert_eq!(second.get("Subject"), Some("second continued"));

    // Random access works backwards too
    let again = read_header_at(&mut handle, boundaries[0], &config).unwrap();
    assert_eq!(again, first);
}

#[test]
fn test_bodies() {
    let second = MBOX.find("From bob@").unwrap() as u64;
    assert_eq!(
        read_message_body(Cursor::new(MBOX), 0).unwrap(),
        b"From sea to shining sea.\n"
    );
    assert_eq!(
        read_message_body(Cursor::new(MBOX), second).unwrap(),
        b"last body\n"
    );
}

#[test]
fn test_raw_messages_cover_stream() {
    let offsets: Vec<u64> = Loader::new(LineReader::new(Cursor::new(MBOX)))
        .map(|b| b.unwrap().offset)
        .collect();
    let mut joined = Vec::new();
    for offset in offsets {
        joined.extend(read_raw_message(Cursor::new(MBOX), offset).unwrap());
    }
    assert_eq!(joined, MBOX.as_bytes());
}

#[test]
fn test_invalid_offset() {
    let err = read_raw_message(Cursor::new(MBOX), 5).unwrap_err();
    assert!(matches!(err, MboxError::InvalidOffset(5)));
    assert_eq!(err.to_string(), "No envelope line at offset 5");
}

#[test]
fn test_count_messages() {
    assert_eq!(count_messages(LineReader::new(Cursor::new(MBOX))).unwrap(), 2);
}

#[test]
fn test_file_backed_mailbox() {
    let path = std::env::temp_dir().join(format!("mbox-rs-test-{}.mbox", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(MBOX.as_bytes()).unwrap();
    }

    let scan = BufReader::new(std::fs::File::open(&path).unwrap());
    let offsets: Vec<u64> = Loader::new(LineReader::new(scan))
        .map(|b| b.unwrap().offset)
        .collect();

    let mut handle = BufReader::new(std::fs::File::open(&path).unwrap());
    let h = read_header_at(&mut handle, offsets[1], &HeaderConfig::default()).unwrap();
    assert_eq!(h.get("Subject"), Some("second continued"));

    handle.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(count_messages(LineReader::new(handle)).unwrap(), 2);

    std::fs::remove_file(&path).unwrap();
}
