mod block;
mod builder;
mod bytes;
mod compression;
mod decoders;
mod error;
mod header;
mod loader;
mod props;
mod record;
mod registry;
mod scene;
mod warning;

/// Block header, raw block view, and block stream iterator.
pub use block::{BlockHeader, BlockIter, RawBlock};
/// Backward-only record table and graph assembly.
pub use builder::SceneBuilder;
/// Bounded byte cursor handed to decoders.
pub use bytes::Cursor;
/// Body compression scheme and body opener.
pub use compression::{Compression, open_body};
/// Inputs shared by block decoders.
pub use decoders::DecodeContext;
/// Error and result aliases.
pub use error::{ParseError, ParseErrorKind, Result};
/// File header representation.
pub use header::{AwdHeader, Precision};
/// Loader driver, options, and one-shot entry points.
pub use loader::{LoadOptions, LoadState, Loader, TruncationPolicy, load, load_with};
/// Decoded block records.
pub use record::{
	AnimationFrame, AnimationRecord, BlockRecord, BlockRef, Joint, MaterialKind, MaterialRecord, Matrix3x4, MeshRecord, MetadataRecord,
	NamespaceRecord, PoseRecord, RecordKind, SceneNodeRecord, SkeletonRecord, SubMesh, TextureRecord, TextureSource,
};
/// Block type to decoder mapping.
pub use registry::{BlockDecoder, BlockRegistry, DecodeFn};
/// Finished scene graph and its typed ids.
pub use scene::{Animation, Frame, Material, MaterialId, MeshId, NodeId, PoseId, SceneGraph, SceneNode, TextureId};
/// Recoverable load conditions.
pub use warning::{LoadWarning, WarningKind};
