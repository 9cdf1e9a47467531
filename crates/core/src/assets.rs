use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use lookdev_scene::{InstanceId, ObjectContent, ObjectHandle, Residence, SceneObject};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ASSET_NAMESPACE: Uuid = Uuid::from_u128(0x6c6f_6f6b_6465_7600_8000_0000_0000_0001);

/// Content-addressed asset identifier. The nil UUID is the empty GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetGuid(Uuid);

impl AssetGuid {
    pub const EMPTY: AssetGuid = AssetGuid(Uuid::nil());

    pub fn from_path(path: &str) -> Self {
        Self(Uuid::new_v5(&ASSET_NAMESPACE, path.as_bytes()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for AssetGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for AssetGuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Editor asset database and live-object lookup.
pub trait AssetDatabase {
    fn asset_path(&self, object: &SceneObject) -> Option<String>;
    fn path_to_guid(&self, path: &str) -> Option<AssetGuid>;
    fn guid_to_path(&self, guid: &AssetGuid) -> Option<String>;
    fn load_at_path(&self, path: &str) -> Option<ObjectHandle>;
    fn instance_to_object(&self, id: InstanceId) -> Option<ObjectHandle>;
    fn is_alive(&self, id: InstanceId) -> bool;
}

#[derive(Default)]
struct AssetStore {
    objects: HashMap<InstanceId, ObjectHandle>,
    paths: HashMap<String, InstanceId>,
    guids: HashMap<AssetGuid, String>,
}

/// In-process asset database backing the standalone viewer and headless runs.
pub struct MemoryAssetDatabase {
    store: Mutex<AssetStore>,
    next_id: AtomicI32,
}

impl Default for MemoryAssetDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAssetDatabase {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(AssetStore::default()),
            next_id: AtomicI32::new(1),
        }
    }

    fn allocate_id(&self) -> InstanceId {
        InstanceId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers an asset at `path`, replacing any asset previously stored there.
    pub fn import_asset(&self, path: &str, name: &str, content: ObjectContent) -> ObjectHandle {
        let object = Arc::new(SceneObject {
            id: self.allocate_id(),
            name: name.to_string(),
            residence: Residence::Asset {
                path: path.to_string(),
            },
            content,
        });
        let mut store = self.store.lock().expect("asset store lock");
        if let Some(previous) = store.paths.insert(path.to_string(), object.id) {
            store.objects.remove(&previous);
        }
        store
            .guids
            .insert(AssetGuid::from_path(path), path.to_string());
        store.objects.insert(object.id, object.clone());
        tracing::debug!("imported asset {} as {:?}", path, object.id);
        object
    }

    pub fn spawn_in_scene(&self, scene: &str, name: &str, content: ObjectContent) -> ObjectHandle {
        let object = Arc::new(SceneObject {
            id: self.allocate_id(),
            name: name.to_string(),
            residence: Residence::Scene {
                scene: scene.to_string(),
            },
            content,
        });
        self.store
            .lock()
            .expect("asset store lock")
            .objects
            .insert(object.id, object.clone());
        object
    }

    /// Destroys a live object. Handles held elsewhere stay readable but report as dead.
    pub fn destroy(&self, id: InstanceId) -> bool {
        let mut store = self.store.lock().expect("asset store lock");
        let Some(object) = store.objects.remove(&id) else {
            return false;
        };
        if let Some(path) = object.asset_path() {
            store.paths.remove(path);
            store.guids.remove(&AssetGuid::from_path(path));
        }
        true
    }
}

impl AssetDatabase for MemoryAssetDatabase {
    fn asset_path(&self, object: &SceneObject) -> Option<String> {
        let path = object.asset_path()?;
        let store = self.store.lock().expect("asset store lock");
        store.paths.contains_key(path).then(|| path.to_string())
    }

    fn path_to_guid(&self, path: &str) -> Option<AssetGuid> {
        let store = self.store.lock().expect("asset store lock");
        store
            .paths
            .contains_key(path)
            .then(|| AssetGuid::from_path(path))
    }

    fn guid_to_path(&self, guid: &AssetGuid) -> Option<String> {
        if guid.is_empty() {
            return None;
        }
        let store = self.store.lock().expect("asset store lock");
        store.guids.get(guid).cloned()
    }

    fn load_at_path(&self, path: &str) -> Option<ObjectHandle> {
        let store = self.store.lock().expect("asset store lock");
        let id = store.paths.get(path)?;
        store.objects.get(id).cloned()
    }

    fn instance_to_object(&self, id: InstanceId) -> Option<ObjectHandle> {
        if id.is_none() {
            return None;
        }
        let store = self.store.lock().expect("asset store lock");
        store.objects.get(&id).cloned()
    }

    fn is_alive(&self, id: InstanceId) -> bool {
        let store = self.store.lock().expect("asset store lock");
        store.objects.contains_key(&id)
    }
}
