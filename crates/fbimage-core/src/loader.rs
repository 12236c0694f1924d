//! A reusable loader holding at most one decoded raster.

use std::path::Path;

use crate::composite::{composite, FramebufferView, Placement};
use crate::decode::{decode_png, inspect, DecodeOptions};
use crate::error::{ErrorCode, LoadError};
use crate::raster::RasterImage;

/// Loads one image at a time and blits it onto a framebuffer.
///
/// Each load is single-use: compositing releases the raster, so drawing the
/// same image again requires another [`ImageLoader::load`].
#[derive(Debug, Default)]
pub struct ImageLoader {
    raster: RasterImage,
    options: DecodeOptions,
}

impl ImageLoader {
    /// Create a loader with default decode options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom decode options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            raster: RasterImage::new(),
            options,
        }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The currently held raster (empty unless a load succeeded since the
    /// last release or composite).
    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    /// Take ownership of the held raster, leaving the loader empty.
    pub fn take_raster(&mut self) -> RasterImage {
        std::mem::take(&mut self.raster)
    }

    /// Decode `path`, replacing any previously held raster.
    ///
    /// The previous raster is released first. On error the loader is left
    /// empty; no partially decoded image is ever visible.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&RasterImage, LoadError> {
        let path = path.as_ref();
        self.release();
        match decode_png(path, &self.options) {
            Ok(raster) => {
                tracing::debug!(
                    path = %path.display(),
                    width = raster.width(),
                    height = raster.height(),
                    "image loaded"
                );
                self.raster = raster;
                Ok(&self.raster)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "image load failed");
                Err(err)
            }
        }
    }

    /// Read `(width, height)` from `path` without touching the held raster.
    pub fn inspect(&self, path: impl AsRef<Path>) -> Result<(u32, u32), LoadError> {
        inspect(path)
    }

    /// Alias of [`ImageLoader::inspect`].
    pub fn size(&self, path: impl AsRef<Path>) -> Result<(u32, u32), LoadError> {
        self.inspect(path)
    }

    /// Drop the held raster. A no-op when nothing is loaded.
    pub fn release(&mut self) {
        self.raster.release();
    }

    /// Blend the held raster onto `dest` at `placement` and release it.
    ///
    /// Clipped pixels are skipped silently, so this always reports
    /// [`ErrorCode::Ok`].
    pub fn composite(&mut self, dest: &mut FramebufferView<'_>, placement: Placement) -> ErrorCode {
        composite(&mut self.raster, dest, placement);
        ErrorCode::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::FramebufferGeometry;
    use crate::decode::fixtures;
    use crate::raster::ImageFormat;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fbimage_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, fixtures::rgba(width, height, data)).unwrap();
        path
    }

    #[test]
    fn test_load_then_inspect_agree() {
        let tmp = temp_dir("loader_agree");
        let path = write_png(&tmp, "a.png", 3, 5, &[200u8; 3 * 5 * 4]);

        let mut loader = ImageLoader::new();
        let dims = loader.inspect(&path).unwrap();
        let raster = loader.load(&path).unwrap();
        assert_eq!(raster.dimensions(), Some(dims));
        assert_eq!(loader.size(&path).unwrap(), (3, 5));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_inspect_does_not_touch_raster() {
        let tmp = temp_dir("loader_inspect_pure");
        let first = write_png(&tmp, "first.png", 2, 2, &[1u8; 16]);
        let second = write_png(&tmp, "second.png", 7, 1, &[2u8; 28]);

        let mut loader = ImageLoader::new();
        assert_eq!(loader.inspect(&first).unwrap(), (2, 2));
        assert_eq!(loader.raster().format(), ImageFormat::None);

        loader.load(&first).unwrap();
        assert_eq!(loader.inspect(&second).unwrap(), (7, 1));
        assert_eq!(loader.raster().dimensions(), Some((2, 2)));
        assert_eq!(loader.raster().pixel(0, 0), Some([1, 1, 1, 1]));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_reload_replaces_previous() {
        let tmp = temp_dir("loader_reload");
        let first = write_png(&tmp, "first.png", 2, 2, &[1u8; 16]);
        let second = write_png(&tmp, "second.png", 1, 3, &[9u8; 12]);

        let mut loader = ImageLoader::new();
        loader.load(&first).unwrap();
        loader.load(&second).unwrap();
        assert_eq!(loader.raster().dimensions(), Some((1, 3)));
        assert_eq!(loader.raster().rows().len(), 3);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_failed_load_leaves_loader_empty() {
        let tmp = temp_dir("loader_fail");
        let good = write_png(&tmp, "good.png", 2, 2, &[5u8; 16]);
        let bad = tmp.join("bad.png");
        std::fs::write(&bad, b"definitely not a png").unwrap();
        let empty = tmp.join("empty.png");
        std::fs::write(&empty, b"").unwrap();
        let missing = tmp.join("missing.png");

        let mut loader = ImageLoader::new();
        for (path, code) in [
            (&bad, ErrorCode::Format),
            (&empty, ErrorCode::Format),
            (&missing, ErrorCode::File),
        ] {
            loader.load(&good).unwrap();
            let err = loader.load(path).unwrap_err();
            assert_eq!(err.code(), code, "{}", path.display());
            assert!(!loader.raster().is_loaded());
            assert!(loader.raster().rows().is_empty());

            assert_eq!(loader.inspect(path).unwrap_err().code(), code);
        }

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_truncated_file_is_format_error() {
        let tmp = temp_dir("loader_truncated");
        let bytes = fixtures::rgba(8, 8, &[3u8; 256]);
        let path = tmp.join("cut.png");
        std::fs::write(&path, &bytes[..bytes.len() - 20]).unwrap();

        let mut loader = ImageLoader::new();
        let err = loader.load(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Format);
        assert!(!loader.raster().is_loaded());

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_release_is_idempotent() {
        let tmp = temp_dir("loader_release");
        let path = write_png(&tmp, "a.png", 2, 2, &[1u8; 16]);

        let mut loader = ImageLoader::new();
        loader.release();
        loader.load(&path).unwrap();
        loader.release();
        assert_eq!(loader.raster().dimensions(), None);
        loader.release();
        assert_eq!(loader.raster().format(), ImageFormat::None);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_composite_is_consuming() {
        let tmp = temp_dir("loader_composite");
        let path = write_png(&tmp, "a.png", 1, 1, &[0x10, 0x20, 0x30, 0xFF]);

        let mut buf = vec![0u8; 2 * 2 * 4];
        let mut view = FramebufferView::new(&mut buf, FramebufferGeometry::packed(2, 2)).unwrap();
        let mut loader = ImageLoader::new();

        loader.load(&path).unwrap();
        assert_eq!(loader.composite(&mut view, Placement::new(1, 1)), ErrorCode::Ok);
        assert_eq!(view.pixel(1, 1), Some(0x0010_2030));
        assert!(!loader.raster().is_loaded());

        // Nothing left to draw without a reload
        view.set_pixel(1, 1, 0);
        assert_eq!(loader.composite(&mut view, Placement::new(1, 1)), ErrorCode::Ok);
        assert_eq!(view.pixel(1, 1), Some(0));

        loader.load(&path).unwrap();
        loader.composite(&mut view, Placement::new(1, 1));
        assert_eq!(view.pixel(1, 1), Some(0x0010_2030));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_options_are_applied() {
        let tmp = temp_dir("loader_options");
        let path = write_png(&tmp, "big.png", 4, 4, &[0u8; 64]);

        let mut opts = DecodeOptions::default();
        opts.limits.max_width = Some(3);
        let mut loader = ImageLoader::with_options(opts);
        assert_eq!(loader.options().limits.max_width, Some(3));
        assert_eq!(loader.load(&path).unwrap_err().code(), ErrorCode::Format);

        // Header-only inspection is not subject to decode limits
        assert_eq!(loader.inspect(&path).unwrap(), (4, 4));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn test_take_raster() {
        let tmp = temp_dir("loader_take");
        let path = write_png(&tmp, "a.png", 2, 1, &[4u8; 8]);

        let mut loader = ImageLoader::new();
        loader.load(&path).unwrap();
        let raster = loader.take_raster();
        assert_eq!(raster.dimensions(), Some((2, 1)));
        assert!(!loader.raster().is_loaded());

        std::fs::remove_dir_all(&tmp).ok();
    }
}
