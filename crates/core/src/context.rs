use lookdev_scene::{InstanceId, ObjectHandle};
use serde::{Deserialize, Deserializer, Serialize};

use crate::assets::{AssetDatabase, AssetGuid};
use crate::camera::CameraState;
use crate::gizmo::ComparisonGizmoState;
use crate::stage::StageObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewIndex {
    First = 0,
    Second = 1,
}

impl ViewIndex {
    pub const ALL: [ViewIndex; 2] = [ViewIndex::First, ViewIndex::Second];

    pub fn other(self) -> ViewIndex {
        match self {
            ViewIndex::First => ViewIndex::Second,
            ViewIndex::Second => ViewIndex::First,
        }
    }
}

/// A view slot, or a point in the combined output not yet resolved to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewCompositionIndex {
    First,
    Second,
    Composite,
}

impl ViewCompositionIndex {
    pub fn as_view(self) -> Option<ViewIndex> {
        match self {
            ViewCompositionIndex::First => Some(ViewIndex::First),
            ViewCompositionIndex::Second => Some(ViewIndex::Second),
            ViewCompositionIndex::Composite => None,
        }
    }
}

impl From<ViewIndex> for ViewCompositionIndex {
    fn from(index: ViewIndex) -> Self {
        match index {
            ViewIndex::First => ViewCompositionIndex::First,
            ViewIndex::Second => ViewCompositionIndex::Second,
        }
    }
}

// Variant names double as style identifiers in the display window; renaming one breaks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layout {
    #[default]
    FullFirstView,
    FullSecondView,
    HorizontalSplit,
    VerticalSplit,
    CustomSplit,
    CustomCircular,
}

impl Layout {
    pub const ALL: [Layout; 6] = [
        Layout::FullFirstView,
        Layout::FullSecondView,
        Layout::HorizontalSplit,
        Layout::VerticalSplit,
        Layout::CustomSplit,
        Layout::CustomCircular,
    ];

    pub fn style_name(self) -> &'static str {
        match self {
            Layout::FullFirstView => "FullFirstView",
            Layout::FullSecondView => "FullSecondView",
            Layout::HorizontalSplit => "HorizontalSplit",
            Layout::VerticalSplit => "VerticalSplit",
            Layout::CustomSplit => "CustomSplit",
            Layout::CustomCircular => "CustomCircular",
        }
    }

    pub fn from_style_name(name: &str) -> Option<Layout> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.style_name().eq_ignore_ascii_case(name))
    }

    /// Views that contribute pixels to the composite under this layout.
    pub fn active_views(self) -> &'static [ViewIndex] {
        match self {
            Layout::FullFirstView => &[ViewIndex::First],
            Layout::FullSecondView => &[ViewIndex::Second],
            _ => &ViewIndex::ALL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutContext {
    pub view_layout: Layout,
    pub show_environment_panel: bool,
    pub(crate) gizmo_state: ComparisonGizmoState,
}

impl LayoutContext {
    pub fn is_simple_view(&self) -> bool {
        matches!(
            self.view_layout,
            Layout::FullFirstView | Layout::FullSecondView
        )
    }

    pub fn is_multi_view(&self) -> bool {
        matches!(
            self.view_layout,
            Layout::HorizontalSplit | Layout::VerticalSplit
        )
    }

    pub fn is_combined_view(&self) -> bool {
        matches!(
            self.view_layout,
            Layout::CustomSplit | Layout::CustomCircular
        )
    }

    pub fn gizmo_state(&self) -> &ComparisonGizmoState {
        &self.gizmo_state
    }
}

/// Durable reference to an object. Asset references survive editor restarts;
/// scene instance ids only survive a reload within the same session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ViewedObjectRef {
    #[default]
    None,
    Asset(AssetGuid),
    Scene(InstanceId),
}

impl ViewedObjectRef {
    fn classify(object: &ObjectHandle, assets: &dyn AssetDatabase) -> ViewedObjectRef {
        if object.is_scene_resident() {
            return ViewedObjectRef::Scene(object.id);
        }
        match assets
            .asset_path(object)
            .and_then(|path| assets.path_to_guid(&path))
        {
            Some(guid) if !guid.is_empty() => ViewedObjectRef::Asset(guid),
            _ => {
                tracing::warn!("{} has no asset path, it will not survive a reload", object.name);
                ViewedObjectRef::None
            }
        }
    }

    fn resolve(self, assets: &dyn AssetDatabase) -> Option<ObjectHandle> {
        match self {
            ViewedObjectRef::None => None,
            ViewedObjectRef::Asset(guid) => {
                let path = assets.guid_to_path(&guid)?;
                assets.load_at_path(&path)
            }
            ViewedObjectRef::Scene(id) => assets.instance_to_object(id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewContext {
    viewed_object: ViewedObjectRef,
    environment: ViewedObjectRef,
    #[serde(skip)]
    viewed_object_reference: Option<ObjectHandle>,
    #[serde(skip)]
    environment_reference: Option<ObjectHandle>,
    #[serde(skip)]
    pub(crate) viewed_instance_in_preview: Option<StageObjectId>,
}

impl ViewContext {
    pub fn viewed_object(&self) -> ViewedObjectRef {
        self.viewed_object
    }

    pub fn asset_guid(&self) -> Option<AssetGuid> {
        match self.viewed_object {
            ViewedObjectRef::Asset(guid) => Some(guid),
            _ => None,
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        match self.viewed_object {
            ViewedObjectRef::Scene(id) => id,
            _ => InstanceId::NONE,
        }
    }

    /// Live handle of the object given for instantiation.
    pub fn viewed_object_reference(&self) -> Option<&ObjectHandle> {
        self.viewed_object_reference.as_ref()
    }

    /// Stage copy of the viewed object, set when scene changes are pushed to the renderer.
    pub fn viewed_instance_in_preview(&self) -> Option<StageObjectId> {
        self.viewed_instance_in_preview
    }

    pub fn environment(&self) -> ViewedObjectRef {
        self.environment
    }

    pub fn environment_reference(&self) -> Option<&ObjectHandle> {
        self.environment_reference.as_ref()
    }

    pub fn update_viewed_object(&mut self, object: Option<&ObjectHandle>, assets: &dyn AssetDatabase) {
        self.viewed_object = ViewedObjectRef::None;
        self.viewed_object_reference = None;
        let Some(object) = object.filter(|object| assets.is_alive(object.id)) else {
            return;
        };
        self.viewed_object = ViewedObjectRef::classify(object, assets);
        self.viewed_object_reference = Some(object.clone());
    }

    /// Returns false and leaves the view untouched when `object` is not an environment.
    pub fn update_environment(&mut self, object: Option<&ObjectHandle>, assets: &dyn AssetDatabase) -> bool {
        if let Some(object) = object {
            if object.environment().is_none() {
                tracing::warn!("{} is not an environment, ignoring", object.name);
                return false;
            }
        }
        self.environment = ViewedObjectRef::None;
        self.environment_reference = None;
        let Some(object) = object.filter(|object| assets.is_alive(object.id)) else {
            return true;
        };
        self.environment = ViewedObjectRef::classify(object, assets);
        self.environment_reference = Some(object.clone());
        true
    }

    pub fn reload_data_on_scripts_reload(&mut self, assets: &dyn AssetDatabase) {
        self.viewed_object_reference = self.viewed_object.resolve(assets);
        self.environment_reference = self.environment.resolve(assets);
        self.viewed_instance_in_preview = None;
    }

    /// Resolves a view read from disk. Scene instance ids are only valid within
    /// the session that wrote them and are dropped.
    pub fn reload_data_on_load(&mut self, assets: &dyn AssetDatabase) {
        if matches!(self.viewed_object, ViewedObjectRef::Scene(_)) {
            self.viewed_object = ViewedObjectRef::None;
        }
        if matches!(self.environment, ViewedObjectRef::Scene(_)) {
            self.environment = ViewedObjectRef::None;
        }
        self.reload_data_on_scripts_reload(assets);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    layout: LayoutContext,
    #[serde(deserialize_with = "nullable_vec")]
    views: Vec<ViewContext>,
    #[serde(deserialize_with = "nullable_vec")]
    cameras: Vec<CameraState>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            layout: LayoutContext::default(),
            views: vec![ViewContext::default(), ViewContext::default()],
            cameras: vec![CameraState::default(), CameraState::default()],
        }
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Context {
    /// Parses a persisted context and repairs it.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Context> {
        let mut context: Context = serde_json::from_slice(data)?;
        context.validate();
        Ok(context)
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn layout(&self) -> &LayoutContext {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutContext {
        &mut self.layout
    }

    pub fn view_content(&self, index: ViewIndex) -> &ViewContext {
        &self.views[index as usize]
    }

    pub fn view_content_mut(&mut self, index: ViewIndex) -> &mut ViewContext {
        &mut self.views[index as usize]
    }

    pub fn camera_state(&self, index: ViewIndex) -> &CameraState {
        &self.cameras[index as usize]
    }

    pub fn camera_state_mut(&mut self, index: ViewIndex) -> &mut CameraState {
        &mut self.cameras[index as usize]
    }

    pub fn validate(&mut self) {
        if self.views.len() != 2 {
            tracing::warn!("repairing context views (found {})", self.views.len());
            self.views = vec![ViewContext::default(), ViewContext::default()];
        }
        if self.cameras.len() != 2 {
            tracing::warn!("repairing context cameras (found {})", self.cameras.len());
            self.cameras = vec![CameraState::default(), CameraState::default()];
        }
    }

    pub fn reload_data_on_scripts_reload(&mut self, assets: &dyn AssetDatabase) {
        for view in &mut self.views {
            view.reload_data_on_scripts_reload(assets);
        }
    }

    pub fn reload_data_on_load(&mut self, assets: &dyn AssetDatabase) {
        for view in &mut self.views {
            view.reload_data_on_load(assets);
        }
    }
}

#[cfg(test)]
mod tests {
    use lookdev_scene::{EnvironmentMap, ObjectContent, SceneMesh};

    use super::*;
    use crate::assets::MemoryAssetDatabase;

    fn cube() -> ObjectContent {
        ObjectContent::Mesh(SceneMesh::unit_cube([0.5, 0.5, 0.5]))
    }

    #[test]
    fn validate_repairs_any_array_length() {
        for (views, cameras) in [("null", "null"), ("[]", "[]"), ("[{}]", "[{}]"), ("[{},{},{}]", "[{}]")] {
            let json = format!(r#"{{"views": {views}, "cameras": {cameras}}}"#);
            let mut context: Context = serde_json::from_str(&json).unwrap();
            context.validate();
            assert_eq!(context.views.len(), 2);
            assert_eq!(context.cameras.len(), 2);
            context.validate();
            assert_eq!(context.views.len(), 2);
            assert_eq!(context.cameras.len(), 2);
        }
    }

    #[test]
    fn validate_keeps_healthy_context() {
        let db = MemoryAssetDatabase::new();
        let asset = db.import_asset("Assets/Chair.fbx", "Chair", cube());
        let mut context = Context::default();
        context
            .view_content_mut(ViewIndex::Second)
            .update_viewed_object(Some(&asset), &db);
        context.camera_state_mut(ViewIndex::First).distance = 7.0;
        context.validate();
        assert_eq!(context.camera_state(ViewIndex::First).distance, 7.0);
        assert!(context.view_content(ViewIndex::Second).asset_guid().is_some());
    }

    #[test]
    fn scene_object_resolves_after_reload() {
        let db = MemoryAssetDatabase::new();
        let object = db.spawn_in_scene("Main", "Cube", cube());
        let mut view = ViewContext::default();
        view.update_viewed_object(Some(&object), &db);
        assert_eq!(view.instance_id(), object.id);
        assert!(view.asset_guid().is_none());

        let json = serde_json::to_vec(&view).unwrap();
        let mut reloaded: ViewContext = serde_json::from_slice(&json).unwrap();
        assert!(reloaded.viewed_object_reference().is_none());
        reloaded.reload_data_on_scripts_reload(&db);
        assert_eq!(reloaded.viewed_object_reference().unwrap().id, object.id);
        assert!(reloaded.asset_guid().is_none());
    }

    #[test]
    fn asset_object_resolves_after_reload() {
        let db = MemoryAssetDatabase::new();
        let asset = db.import_asset("Assets/Chair.fbx", "Chair", cube());
        let mut view = ViewContext::default();
        view.update_viewed_object(Some(&asset), &db);
        assert_eq!(view.asset_guid(), Some(AssetGuid::from_path("Assets/Chair.fbx")));
        assert_eq!(view.instance_id(), InstanceId::NONE);

        let json = serde_json::to_vec(&view).unwrap();
        let mut reloaded: ViewContext = serde_json::from_slice(&json).unwrap();
        reloaded.reload_data_on_scripts_reload(&db);
        assert_eq!(reloaded.viewed_object_reference().unwrap().id, asset.id);
    }

    #[test]
    fn loading_from_disk_drops_scene_instances() {
        let db = MemoryAssetDatabase::new();
        let asset = db.import_asset("Assets/Chair.fbx", "Chair", cube());
        let object = db.spawn_in_scene("Main", "Cube", cube());
        let mut context = Context::default();
        context
            .view_content_mut(ViewIndex::First)
            .update_viewed_object(Some(&asset), &db);
        context
            .view_content_mut(ViewIndex::Second)
            .update_viewed_object(Some(&object), &db);

        let mut loaded = Context::from_json(&context.to_json().unwrap()).unwrap();
        loaded.reload_data_on_load(&db);
        let first = loaded.view_content(ViewIndex::First);
        assert_eq!(first.viewed_object_reference().unwrap().id, asset.id);
        let second = loaded.view_content(ViewIndex::Second);
        assert_eq!(second.viewed_object(), ViewedObjectRef::None);
        assert!(second.viewed_object_reference().is_none());
    }

    #[test]
    fn clearing_view_resets_all_identifiers() {
        let db = MemoryAssetDatabase::new();
        let asset = db.import_asset("Assets/Chair.fbx", "Chair", cube());
        let mut view = ViewContext::default();
        view.update_viewed_object(Some(&asset), &db);
        view.update_viewed_object(None, &db);
        assert_eq!(view.viewed_object(), ViewedObjectRef::None);
        assert!(view.asset_guid().is_none());
        assert_eq!(view.instance_id(), InstanceId::NONE);
        assert!(view.viewed_object_reference().is_none());
    }

    #[test]
    fn destroyed_object_clears_view() {
        let db = MemoryAssetDatabase::new();
        let object = db.spawn_in_scene("Main", "Cube", cube());
        db.destroy(object.id);
        let mut view = ViewContext::default();
        view.update_viewed_object(Some(&object), &db);
        assert_eq!(view.viewed_object(), ViewedObjectRef::None);
        assert!(view.viewed_object_reference().is_none());
    }

    #[test]
    fn missing_references_resolve_to_nothing() {
        let db = MemoryAssetDatabase::new();
        let asset = db.import_asset("Assets/Chair.fbx", "Chair", cube());
        let object = db.spawn_in_scene("Main", "Cube", cube());
        let mut context = Context::default();
        context
            .view_content_mut(ViewIndex::First)
            .update_viewed_object(Some(&asset), &db);
        context
            .view_content_mut(ViewIndex::Second)
            .update_viewed_object(Some(&object), &db);
        db.destroy(asset.id);
        db.destroy(object.id);
        context.reload_data_on_scripts_reload(&db);
        assert!(context.view_content(ViewIndex::First).viewed_object_reference().is_none());
        assert!(context.view_content(ViewIndex::Second).viewed_object_reference().is_none());
        assert!(context.view_content(ViewIndex::First).asset_guid().is_some());
    }

    #[test]
    fn environment_rejects_non_environment_objects() {
        let db = MemoryAssetDatabase::new();
        let studio = db.import_asset(
            "Assets/Studio.hdr",
            "Studio",
            ObjectContent::Environment(EnvironmentMap::default()),
        );
        let chair = db.import_asset("Assets/Chair.fbx", "Chair", cube());
        let mut view = ViewContext::default();
        assert!(view.update_environment(Some(&studio), &db));
        assert!(!view.update_environment(Some(&chair), &db));
        assert_eq!(view.environment_reference().unwrap().id, studio.id);
        assert!(view.update_environment(None, &db));
        assert_eq!(view.environment(), ViewedObjectRef::None);
    }

    #[test]
    fn layout_classification_is_exclusive_and_exhaustive() {
        for layout in Layout::ALL {
            let context = LayoutContext {
                view_layout: layout,
                ..LayoutContext::default()
            };
            let flags = [
                context.is_simple_view(),
                context.is_multi_view(),
                context.is_combined_view(),
            ];
            assert_eq!(flags.iter().filter(|flag| **flag).count(), 1, "{:?}", layout);
        }
    }

    #[test]
    fn layout_style_names_round_trip() {
        for layout in Layout::ALL {
            assert_eq!(Layout::from_style_name(layout.style_name()), Some(layout));
            let json = serde_json::to_string(&layout).unwrap();
            assert_eq!(json, format!("\"{}\"", layout.style_name()));
        }
        assert_eq!(Layout::from_style_name("customsplit"), Some(Layout::CustomSplit));
        assert!(Layout::from_style_name("Quad").is_none());
    }

    #[test]
    fn composition_index_maps_to_views() {
        assert_eq!(ViewCompositionIndex::First.as_view(), Some(ViewIndex::First));
        assert_eq!(ViewCompositionIndex::Second.as_view(), Some(ViewIndex::Second));
        assert_eq!(ViewCompositionIndex::Composite.as_view(), None);
        assert_eq!(ViewCompositionIndex::from(ViewIndex::Second), ViewCompositionIndex::Second);
        assert_eq!(ViewIndex::First.other(), ViewIndex::Second);
    }

    #[test]
    fn default_context_starts_empty() {
        let context = Context::from_json(b"{}").unwrap();
        assert_eq!(context.layout().view_layout, Layout::FullFirstView);
        for index in ViewIndex::ALL {
            assert_eq!(context.view_content(index).viewed_object(), ViewedObjectRef::None);
        }
    }
}
