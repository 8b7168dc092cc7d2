use crate::awd::bytes::Cursor;
use crate::awd::{ParseError, Result};

/// One raw key/value entry of a property list.
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
	/// Numeric property key.
	pub key: u16,
	/// Raw value bytes.
	pub value: &'a [u8],
	/// Absolute offset of the first value byte.
	pub offset: usize,
}

impl<'a> Property<'a> {
	fn cursor(&self) -> Cursor<'a> {
		Cursor::with_base(self.value, self.offset)
	}

	fn expect_len(&self, len: usize, what: &str) -> Result<()> {
		if self.value.len() != len {
			return Err(ParseError::malformed(
				format!("property {} should be {what} ({len} bytes), got {} bytes", self.key, self.value.len()),
				self.offset,
			));
		}
		Ok(())
	}
}

/// Length-prefixed list of keyed property values.
///
/// Unknown keys are kept and ignored by typed getters; when a key repeats the
/// first entry wins.
#[derive(Debug, Clone, Default)]
pub struct PropertyList<'a> {
	entries: Vec<Property<'a>>,
}

impl<'a> PropertyList<'a> {
	/// Read a `u32`-length-prefixed property list.
	pub fn parse(cursor: &mut Cursor<'a>) -> Result<Self> {
		let mut region = cursor.slice_prefixed()?;
		let mut entries = Vec::new();
		while !region.is_empty() {
			let key = region.read_u16()?;
			let len = region.read_u32()? as usize;
			let offset = region.offset();
			let value = region.read_exact(len)?;
			entries.push(Property { key, value, offset });
		}
		Ok(Self { entries })
	}

	/// Return all entries in stream order.
	pub fn entries(&self) -> &[Property<'a>] {
		&self.entries
	}

	/// Look up the first entry for `key`.
	pub fn get(&self, key: u16) -> Option<&Property<'a>> {
		self.entries.iter().find(|item| item.key == key)
	}

	/// Read `key` as a `u32`.
	pub fn u32(&self, key: u16) -> Result<Option<u32>> {
		let Some(prop) = self.get(key) else {
			return Ok(None);
		};
		prop.expect_len(4, "u32")?;
		prop.cursor().read_u32().map(Some)
	}

	/// Read `key` as a float of the given width.
	pub fn float(&self, key: u16, wide: bool) -> Result<Option<f32>> {
		let Some(prop) = self.get(key) else {
			return Ok(None);
		};
		prop.expect_len(if wide { 8 } else { 4 }, if wide { "f64" } else { "f32" })?;
		prop.cursor().read_float(wide).map(Some)
	}

	/// Read `key` as a one-byte boolean.
	pub fn bool(&self, key: u16) -> Result<Option<bool>> {
		let Some(prop) = self.get(key) else {
			return Ok(None);
		};
		prop.expect_len(1, "bool")?;
		prop.cursor().read_bool().map(Some)
	}

	/// Read `key` as an unprefixed UTF-8 string spanning the whole value.
	pub fn string(&self, key: u16) -> Result<Option<String>> {
		let Some(prop) = self.get(key) else {
			return Ok(None);
		};
		let text = std::str::from_utf8(prop.value)
			.map_err(|_| ParseError::malformed(format!("property {key} is not valid UTF-8"), prop.offset))?;
		Ok(Some(text.to_owned()))
	}
}

/// Skip a `u32`-length-prefixed user attribute list.
pub fn skip_attributes(cursor: &mut Cursor<'_>) -> Result<()> {
	cursor.read_blob().map(|_| ())
}
