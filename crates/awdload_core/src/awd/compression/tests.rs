use std::borrow::Cow;

use awdload_testkit::{AwdWriter, blocks, types};

use crate::awd::compression::open_body;
use crate::awd::{AwdHeader, Compression, ParseErrorKind};

const LIMIT: usize = 1 << 20;

#[test]
fn uncompressed_body_is_borrowed() {
	let mut writer = AwdWriter::new();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let bytes = writer.finish();

	let header = AwdHeader::parse(&bytes).expect("header parses");
	let body = open_body(&bytes, &header, LIMIT).expect("body opens");
	assert!(matches!(body, Cow::Borrowed(_)));
	assert_eq!(&body[..], &bytes[AwdHeader::SIZE..]);
}

#[test]
fn deflate_body_inflates_to_plain_body() {
	let mut plain = AwdWriter::new();
	plain.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let packed_bytes = plain.clone().deflate().finish();
	let plain = plain.finish();

	let header = AwdHeader::parse(&packed_bytes).expect("header parses");
	assert_eq!(header.compression, Compression::Deflate);
	let body = open_body(&packed_bytes, &header, LIMIT).expect("body inflates");
	assert_eq!(&body[..], &plain[AwdHeader::SIZE..]);
}

#[test]
fn inflate_respects_output_limit() {
	let mut writer = AwdWriter::new().deflate();
	writer.block(types::METADATA, 0, &vec![0_u8; 4096]);
	let bytes = writer.finish();

	let header = AwdHeader::parse(&bytes).expect("header parses");
	let err = open_body(&bytes, &header, 64).expect_err("limit exceeded");
	assert!(matches!(err.kind, ParseErrorKind::Decompress { .. }));
}

#[test]
fn lzma_body_is_unsupported() {
	let bytes = AwdWriter::new().compression(2).finish();
	let header = AwdHeader::parse(&bytes).expect("header parses");
	let err = open_body(&bytes, &header, LIMIT).expect_err("lzma rejected");
	assert_eq!(err.kind, ParseErrorKind::UnsupportedCompression { compression: 2 });
}

#[test]
fn short_plain_body_is_streamed_as_present() {
	let mut writer = AwdWriter::new();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let mut bytes = writer.finish();
	bytes.truncate(bytes.len() - 3);

	let header = AwdHeader::parse(&bytes).expect("header parses");
	let body = open_body(&bytes, &header, LIMIT).expect("short plain body opens");
	assert_eq!(&body[..], &bytes[AwdHeader::SIZE..]);
}

#[test]
fn short_deflate_body_is_truncated_at_end_of_input() {
	let mut writer = AwdWriter::new().deflate();
	writer.block(types::METADATA, 0, &blocks::metadata("gen", "1"));
	let mut bytes = writer.finish();
	bytes.truncate(bytes.len() - 3);

	let header = AwdHeader::parse(&bytes).expect("header parses");
	let err = open_body(&bytes, &header, LIMIT).expect_err("short body");
	assert_eq!(err.offset, bytes.len());
	assert!(matches!(err.kind, ParseErrorKind::TruncatedBlock { .. }));
}
