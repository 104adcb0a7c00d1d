//! Envelope line classification tests

use mbox_rs::boundary::{classify, has_envelope_prefix, is_timestamp, sender_token};
use mbox_rs::{is_boundary, parse_envelope, Rejection};

#[test]
fn test_genuine_envelope_lines() {
    let lines: [&[u8]; 5] = [
        b"From sup-talk-bounces@rubyforge.org Mon Apr 27 12:56:18 2009\n",
        b"From bob@bob.com Mon Apr 27 12:56:19 2009\n",
        b"From MAILER-DAEMON Fri Jul  8 12:08:34 2011\r\n",
        b"From bob@bob.com Mon Apr 27 12:56:19 PDT 2009",
        b"From bob@bob.com Sat Jan  3 01:05:34 +0000 1996",
    ];
    for line in lines {
        assert!(is_boundary(line), "{:?}", String::from_utf8_lossy(line));
    }
}

#[test]
fn test_body_prose_rejected() {
    let lines: [&[u8]; 6] = [
        b"From sea to shining sea\n",
        b"From bob@bob.com I get only spam.\n",
        b"From bob@bob.com   \n",
        b"From bob@bob.com\n",
        b"From the desk of Bob, Mon Apr 27 12:56:18 2009\n",
        b"From: Bob <bob@bob.com>\n",
    ];
    for line in lines {
        assert!(!is_boundary(line), "{:?}", String::from_utf8_lossy(line));
    }
}

#[test]
fn test_sub_checks_compose() {
    let line = b"From bob@bob.com Mon Apr 27 12:56:19 2009";
    assert!(has_envelope_prefix(line));
    let (sender, tail) = sender_token(&line[5..]).unwrap();
    assert_eq!(sender, b"bob@bob.com");
    assert!(is_timestamp(tail));
}

#[test]
fn test_rejection_reasons() {
    assert_eq!(classify(b"Hello there friend."), Err(Rejection::NoPrefix));
    assert_eq!(classify(b"From bob@bob.com"), Err(Rejection::NoSender));
    assert_eq!(classify(b"From bob@bob.com I get only spam."), Err(Rejection::NoTimestamp));
}

#[test]
fn test_arbitrary_bytes() {
    let mut line = b"From ".to_vec();
    line.extend((0u8..=255).rev());
    assert!(!is_boundary(&line));
    assert!(parse_envelope(&line).is_none());
}

#[test]
fn test_envelope_sender_and_date() {
    let env = parse_envelope(b"From sup-talk-bounces@rubyforge.org Mon Apr 27 12:56:18 2009\n")
        .unwrap();
    assert_eq!(env.sender, "sup-talk-bounces@rubyforge.org");
    assert_eq!(
        env.date.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2009-04-27 12:56:18"
    );
}
