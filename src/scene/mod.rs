//! Scene store seam.
//!
//! Reconstruction drives an external drawable-object store through
//! [`SceneStore`]; [`MemorySceneStore`] is the in-crate reference
//! implementation and the surface tests assert against.

mod memory;

pub use memory::{MemorySceneStore, StoredAsset};

use crate::error::Result;
use crate::types::{AssetId, DrawableObject, ObjectId};

/// External drawable-object store.
///
/// The driver serializes all calls within a run and issues them in tier
/// order; implementations never see concurrent writes from one
/// reconstruction.
pub trait SceneStore {
    /// Create one drawable object and return its id.
    ///
    /// # Errors
    /// Implementation-defined. A failure skips the element being emitted,
    /// never the run.
    fn create_object(&mut self, object: DrawableObject) -> Result<ObjectId>;

    /// Register encoded pixel bytes as a reusable asset.
    ///
    /// # Errors
    /// Implementation-defined, handled like `create_object` failures.
    fn register_pixel_asset(
        &mut self,
        bytes: &[u8],
        mime_type: &str,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<AssetId>;

    /// Asset previously registered with byte-identical content, if any.
    fn find_asset_by_content(&self, bytes: &[u8]) -> Option<AssetId>;
}
