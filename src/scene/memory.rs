//! In-memory scene store.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::SceneStore;
use crate::error::Result;
use crate::types::{AssetId, DrawableObject, ObjectId};

/// A registered pixel asset with its source bytes retained for content
/// comparison.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub id: AssetId,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub natural_width: u32,
    pub natural_height: u32,
}

/// [`SceneStore`] that records the exact command sequence in memory.
///
/// Object and asset ids are issued in insertion order, so tests can assert
/// on ordering as well as content. Content lookup goes through a hash index
/// confirmed by byte comparison; a hash collision can never alias two
/// distinct images.
#[derive(Debug, Default)]
pub struct MemorySceneStore {
    objects: Vec<DrawableObject>,
    assets: Vec<StoredAsset>,
    by_content: HashMap<u64, Vec<usize>>,
}

impl MemorySceneStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitted objects in creation order.
    #[must_use]
    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    /// Registered assets in registration order.
    #[must_use]
    pub fn assets(&self) -> &[StoredAsset] {
        &self.assets
    }

    /// Object previously issued under `id`.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.objects.get(usize::try_from(id.0).ok()?)
    }
}

fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

impl SceneStore for MemorySceneStore {
    fn create_object(&mut self, object: DrawableObject) -> Result<ObjectId> {
        let id = ObjectId(self.objects.len() as u64);
        self.objects.push(object);
        Ok(id)
    }

    fn register_pixel_asset(
        &mut self,
        bytes: &[u8],
        mime_type: &str,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<AssetId> {
        let index = self.assets.len();
        let id = AssetId(index as u64);
        self.by_content
            .entry(content_hash(bytes))
            .or_default()
            .push(index);
        self.assets.push(StoredAsset {
            id,
            bytes: bytes.to_vec(),
            mime_type: mime_type.to_string(),
            natural_width,
            natural_height,
        });
        Ok(id)
    }

    fn find_asset_by_content(&self, bytes: &[u8]) -> Option<AssetId> {
        let candidates = self.by_content.get(&content_hash(bytes))?;
        candidates.iter().find_map(|&index| {
            let asset = self.assets.get(index)?;
            (asset.bytes == bytes).then_some(asset.id)
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{DashStyle, FillMode, Rect, RectangleObject, SceneColor};

    fn rectangle(x: f64) -> DrawableObject {
        DrawableObject::Rectangle(RectangleObject {
            geometry: Rect::new(x, 0.0, 10.0, 10.0),
            fill: FillMode::Solid,
            color: SceneColor::Grey,
            dash: DashStyle::Solid,
        })
    }

    #[test]
    fn test_object_ids_follow_creation_order() {
        let mut store = MemorySceneStore::new();
        let first = store.create_object(rectangle(1.0)).unwrap();
        let second = store.create_object(rectangle(2.0)).unwrap();

        assert_eq!(first, ObjectId(0));
        assert_eq!(second, ObjectId(1));
        assert_eq!(store.objects().len(), 2);
        assert_eq!(store.object(first).unwrap().geometry().x, 1.0);
        assert_eq!(store.object(second).unwrap().geometry().x, 2.0);
    }

    #[test]
    fn test_asset_registration_keeps_metadata() {
        let mut store = MemorySceneStore::new();
        let id = store
            .register_pixel_asset(b"png-bytes", "image/png", 640, 480)
            .unwrap();

        let asset = &store.assets()[0];
        assert_eq!(asset.id, id);
        assert_eq!(asset.mime_type, "image/png");
        assert_eq!(asset.natural_width, 640);
        assert_eq!(asset.natural_height, 480);
        assert_eq!(asset.bytes, b"png-bytes");
    }

    #[test]
    fn test_find_asset_by_content() {
        let mut store = MemorySceneStore::new();
        let first = store
            .register_pixel_asset(b"one", "image/png", 1, 1)
            .unwrap();
        let second = store
            .register_pixel_asset(b"two", "image/png", 2, 2)
            .unwrap();

        assert_eq!(store.find_asset_by_content(b"one"), Some(first));
        assert_eq!(store.find_asset_by_content(b"two"), Some(second));
        assert_eq!(store.find_asset_by_content(b"three"), None);
    }

    #[test]
    fn test_find_returns_earliest_identical_registration() {
        let mut store = MemorySceneStore::new();
        let first = store
            .register_pixel_asset(b"same", "image/png", 1, 1)
            .unwrap();
        let second = store
            .register_pixel_asset(b"same", "image/png", 1, 1)
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(store.find_asset_by_content(b"same"), Some(first));
    }
}
