/// Image decode and encode for 8-bit texture maps.
use crate::error::PackerError;
use constants::texture::OPAQUE_ALPHA;
use image::buffer::ConvertBuffer;
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Container format selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFormat {
    #[default]
    Png,
    Jpg,
    Exr,
}

impl TextureFormat {
    /// Parses an extension case-insensitively, with or without a leading dot.
    pub fn parse(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(TextureFormat::Png),
            "jpg" => Some(TextureFormat::Jpg),
            "exr" => Some(TextureFormat::Exr),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn extension(self) -> &'static str {
        match self {
            TextureFormat::Png => "png",
            TextureFormat::Jpg => "jpg",
            TextureFormat::Exr => "exr",
        }
    }

    pub fn matches(self, path: &Path) -> bool {
        Self::from_path(path) == Some(self)
    }
}

/// Loads a map with alpha, expanding grayscale or RGB sources.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, PackerError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Loads a packed texture, discarding any alpha.
pub fn load_rgb(path: &Path) -> Result<RgbImage, PackerError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Saves a packed texture using the format implied by the path.
pub fn save_rgb(texture: &RgbImage, path: &Path) -> Result<(), PackerError> {
    match TextureFormat::from_path(path) {
        // The EXR encoder only accepts float buffers.
        Some(TextureFormat::Exr) => DynamicImage::ImageRgb8(texture.clone())
            .to_rgb32f()
            .save(path)?,
        _ => texture.save(path)?,
    }
    Ok(())
}

/// Whether any pixel carries information in alpha.
pub fn carries_alpha(texture: &RgbaImage) -> bool {
    texture.pixels().any(|pixel| pixel[3] != OPAQUE_ALPHA)
}

/// Saves a map with alpha using the format implied by the path.
/// JPEG has no alpha channel, so it is dropped there.
pub fn save_rgba(texture: &RgbaImage, path: &Path) -> Result<(), PackerError> {
    match TextureFormat::from_path(path) {
        Some(TextureFormat::Jpg) => {
            if carries_alpha(texture) {
                warn!(
                    "{} is saved as JPEG, which has no alpha channel. Smoothness stored in alpha is lost.",
                    path.display()
                );
            }
            let rgb: RgbImage = texture.convert();
            rgb.save(path)?
        }
        Some(TextureFormat::Exr) => DynamicImage::ImageRgba8(texture.clone())
            .to_rgba32f()
            .save(path)?,
        _ => texture.save(path)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};
    use tempfile::tempdir;

    #[test]
    fn parse_extension() {
        assert_eq!(TextureFormat::parse("PNG"), Some(TextureFormat::Png));
        assert_eq!(TextureFormat::parse(".jpg"), Some(TextureFormat::Jpg));
        assert_eq!(TextureFormat::parse(" exr "), Some(TextureFormat::Exr));
        assert_eq!(TextureFormat::parse("tga"), None);
        assert_eq!(TextureFormat::default(), TextureFormat::Png);
    }

    #[test]
    fn format_from_path_ignores_case() {
        assert!(TextureFormat::Png.matches(Path::new("dir/Brick_AO.PNG")));
        assert!(!TextureFormat::Png.matches(Path::new("dir/Brick_AO.jpg")));
        assert!(!TextureFormat::Exr.matches(Path::new("dir/no_extension")));
    }

    #[test]
    fn png_keeps_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metal.png");
        let texture = RgbaImage::from_pixel(3, 2, Rgba([30, 30, 30, 175]));

        save_rgba(&texture, &path).unwrap();
        let loaded = load_rgba(&path).unwrap();

        assert_eq!(loaded, texture);
    }

    #[test]
    fn load_rgb_drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orm.png");
        RgbaImage::from_pixel(1, 1, Rgba([200, 50, 10, 7]))
            .save(&path)
            .unwrap();

        assert_eq!(load_rgb(&path).unwrap().get_pixel(0, 0), &Rgb([200, 50, 10]));
    }

    #[test]
    fn exr_round_trip_preserves_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orm.exr");
        let texture = RgbImage::from_pixel(2, 2, Rgb([200, 50, 10]));

        save_rgb(&texture, &path).unwrap();

        assert_eq!(load_rgb(&path).unwrap(), texture);
    }

    #[test]
    fn opaque_maps_carry_no_alpha() {
        let opaque = RgbaImage::from_pixel(2, 2, Rgba([10, 10, 10, 255]));
        let mut smooth = opaque.clone();
        smooth.put_pixel(1, 1, Rgba([10, 10, 10, 205]));

        assert!(!carries_alpha(&opaque));
        assert!(carries_alpha(&smooth));
    }

    #[test]
    fn jpg_save_drops_alpha_but_succeeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Brick_Metallic.jpg");
        let texture = RgbaImage::from_pixel(4, 4, Rgba([30, 30, 30, 175]));

        save_rgba(&texture, &path).unwrap();

        let loaded = load_rgba(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert!(!carries_alpha(&loaded));
    }
}
