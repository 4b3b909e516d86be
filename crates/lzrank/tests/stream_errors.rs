//! Failure handling: transport faults, sticky errors and malformed streams.

use std::io;

use lzrank::transport::{WordBuffer, WordTransport};
use lzrank::{CodecError, ErrorCode, Session, compress_to_vec, decompress_to_vec};
use proptest::prelude::*;
use test_support::{FaultyTransport, data};

#[test]
fn write_failure_poisons_the_session() {
    let transport = FaultyTransport::new(WordBuffer::new())
        .fail_writes_after(3)
        .with_kind(io::ErrorKind::BrokenPipe);
    let mut session = Session::new(transport);
    let input = data::random_data(4096, 1);

    session.write_header(input.len() as u64, 10).unwrap();
    let err = session.compress(&input, 10).unwrap_err();
    assert!(matches!(err, CodecError::Transport(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert_eq!(
        session.error(),
        Some(ErrorCode::Transport(io::ErrorKind::BrokenPipe))
    );
    assert_eq!(session.bytes_written(), 8);

    let calls = session.transport().calls();
    assert!(matches!(
        session.write_header(1, 10),
        Err(CodecError::Poisoned(ErrorCode::Transport(io::ErrorKind::BrokenPipe)))
    ));
    assert!(session.compress(b"x", 10).is_err());
    assert_eq!(session.transport().calls(), calls);
}

#[test]
fn read_failure_poisons_the_session() {
    let encoded = compress_to_vec(&data::english_text(2000), 10).unwrap();
    let buffer = WordBuffer::from_bytes(&encoded).unwrap();
    let transport = FaultyTransport::new(buffer).fail_reads_after(4);
    let mut session = Session::new(transport);

    let header = session.read_header().unwrap();
    let mut output = vec![0u8; header.length as usize];
    let err = session
        .decompress(&mut output, header.window_bits.get())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Transport(io::ErrorKind::Other));
    assert!(session.is_poisoned());
    assert!(matches!(
        session.read_header(),
        Err(CodecError::Poisoned(_))
    ));
}

#[test]
fn reset_recovers_a_poisoned_session() {
    let mut session = Session::new(WordBuffer::new());
    assert!(session.compress(b"abc", 30).is_err());
    assert!(session.is_poisoned());

    session.reset();
    assert_eq!(session.error(), None);
    session.write_header(3, 10).unwrap();
    session.compress(b"abc", 10).unwrap();
    assert_eq!(session.bytes_written(), 8);
}

#[test]
fn truncated_stream_is_reported() {
    let encoded = compress_to_vec(&data::english_text(4000), 11).unwrap();
    let truncated = &encoded[..encoded.len() - 8];
    let err = decompress_to_vec(truncated).unwrap_err();
    assert!(matches!(err, CodecError::Transport(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
}

#[test]
fn header_with_bad_window_is_rejected() {
    let mut buffer = WordBuffer::new();
    buffer.write_word(5).unwrap();
    buffer.write_word(25).unwrap();
    let mut session = Session::new(buffer);
    assert!(matches!(
        session.read_header(),
        Err(CodecError::InvalidWindowBits(25))
    ));
    assert_eq!(session.error(), Some(ErrorCode::InvalidArgument));
}

#[test]
fn decompress_errors_convert_to_io() {
    let mut bytes = compress_to_vec(b"", 10).unwrap();
    bytes.truncate(12);
    let err: io::Error = decompress_to_vec(&bytes).unwrap_err().into();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn garbage_bodies_never_panic(
        body in proptest::collection::vec(any::<u64>(), 0..16),
        length in 0usize..256,
    ) {
        let mut session = Session::new(WordBuffer::from_words(body));
        let mut output = vec![0u8; length];
        let result = session.decompress(&mut output, 10);
        prop_assert_eq!(result.is_err(), session.is_poisoned());
    }
}
