use std::path::Path;

use rfd::FileDialog;

use super::LookDevApp;

impl LookDevApp {
    pub(super) fn load_config_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("LookDev config", &["json"])
            .pick_file()
        else {
            return;
        };
        if self.session.load_config(&path) {
            tracing::info!("look-dev config loaded from {:?}", path);
        } else {
            tracing::warn!("no usable look-dev config in {:?}", path);
        }
    }

    pub(super) fn save_config_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("LookDev config", &["json"])
            .set_file_name("LookDevConfig.json")
            .save_file()
        else {
            return;
        };
        if let Err(err) = self.session.save_config(&path) {
            tracing::error!("failed to save look-dev config: {}", err);
        }
    }

    pub(super) fn export_composite_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("lookdev.png")
            .save_file()
        else {
            return;
        };
        match self.export_composite(&path) {
            Ok(()) => tracing::info!("composite exported to {:?}", path),
            Err(err) => tracing::error!("failed to export composite: {}", err),
        }
    }

    fn export_composite(&self, path: &Path) -> Result<(), String> {
        let composite = self
            .session
            .compositer()
            .and_then(|compositer| compositer.composite())
            .ok_or_else(|| "nothing has been rendered yet".to_string())?;
        let size = composite.size();
        let image =
            image::RgbaImage::from_raw(size.width, size.height, composite.as_bytes().to_vec())
                .ok_or_else(|| "composite buffer has the wrong length".to_string())?;
        image.save(path).map_err(|err| err.to_string())
    }
}
