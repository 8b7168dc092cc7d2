use crate::awd::bytes::Cursor;
use crate::awd::decoders::{DecodeContext, read_matrix, read_ref};
use crate::awd::props::{PropertyList, skip_attributes};
use crate::awd::{AnimationFrame, AnimationRecord, BlockRecord, Joint, ParseError, PoseRecord, Result, SkeletonRecord};

/// Decode a joint hierarchy.
///
/// Joint ids are 1-based and sequential; a parent id of `0` marks a root, and
/// every other parent must be an earlier joint.
pub fn decode_skeleton(cursor: &mut Cursor<'_>, ctx: &DecodeContext) -> Result<BlockRecord> {
	let name = cursor.read_string()?;
	let count = cursor.read_u16()?;
	PropertyList::parse(cursor)?;

	let mut joints = Vec::with_capacity(usize::from(count));
	for expected in 1..=count {
		let at = cursor.offset();
		let id = cursor.read_u16()?;
		if id != expected {
			return Err(ParseError::malformed(format!("joint id {id} out of sequence (expected {expected})"), at));
		}

		let parent = match cursor.read_u16()? {
			0 => None,
			parent if parent < id => Some(usize::from(parent - 1)),
			parent => return Err(ParseError::malformed(format!("joint {id} has non-preceding parent {parent}"), at)),
		};
		let joint_name = cursor.read_string()?;
		let inverse_bind = read_matrix(cursor, ctx.precision.wide_matrices)?;
		PropertyList::parse(cursor)?;
		skip_attributes(cursor)?;

		joints.push(Joint {
			name: joint_name,
			parent,
			inverse_bind,
		});
	}

	skip_attributes(cursor)?;
	Ok(BlockRecord::Skeleton(SkeletonRecord { name, joints }))
}

/// Decode per-joint local transforms.
pub fn decode_skeleton_pose(cursor: &mut Cursor<'_>, ctx: &DecodeContext) -> Result<BlockRecord> {
	let name = cursor.read_string()?;
	let count = cursor.read_u16()?;
	PropertyList::parse(cursor)?;

	let mut transforms = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let transform = if cursor.read_bool()? {
			Some(read_matrix(cursor, ctx.precision.wide_matrices)?)
		} else {
			None
		};
		transforms.push(transform);
	}

	skip_attributes(cursor)?;
	Ok(BlockRecord::SkeletonPose(PoseRecord { name, transforms }))
}

/// Decode a timed sequence of pose references.
pub fn decode_skeleton_animation(cursor: &mut Cursor<'_>, _ctx: &DecodeContext) -> Result<BlockRecord> {
	let name = cursor.read_string()?;
	let count = cursor.read_u16()?;
	PropertyList::parse(cursor)?;

	let mut frames = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let at = cursor.offset();
		let pose = read_ref(cursor)?.ok_or_else(|| ParseError::malformed("animation frame has no pose", at))?;
		let duration_ms = cursor.read_u16()?;
		frames.push(AnimationFrame { pose, duration_ms });
	}

	skip_attributes(cursor)?;
	Ok(BlockRecord::Animation(AnimationRecord { name, frames }))
}
