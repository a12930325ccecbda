//! Decoding a single file into image and mask tensors.

use crate::core::error::LoadError;
use crate::core::tensor::{ImageTensor, MaskTensor};
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader, Rgba32FImage};
use log::debug;
use ndarray::ShapeError;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A decoded image the loader can turn into tensors.
pub trait DecodedImage {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Whether the source carried an alpha channel.
    fn has_alpha(&self) -> bool;

    /// RGB tensor of shape `(1, H, W, 3)` in `[0, 1]`.
    fn to_image_tensor(&self) -> Result<ImageTensor, ShapeError>;

    /// Pixels as normalized RGBA.
    fn to_rgba(&self) -> Rgba32FImage;

    /// Inverted alpha of shape `(H, W)`, or zeros when there is no alpha.
    fn to_mask_tensor(&self) -> Result<MaskTensor, ShapeError> {
        if self.has_alpha() {
            MaskTensor::from_alpha(&self.to_rgba())
        } else {
            let (width, height) = self.dimensions();
            Ok(MaskTensor::zeros(height as usize, width as usize))
        }
    }
}

impl DecodedImage for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn has_alpha(&self) -> bool {
        self.color().has_alpha()
    }

    fn to_image_tensor(&self) -> Result<ImageTensor, ShapeError> {
        ImageTensor::from_rgb(self.to_rgb32f())
    }

    fn to_rgba(&self) -> Rgba32FImage {
        self.to_rgba32f()
    }
}

/// Decoded pixels plus whether the file itself stored an alpha channel.
///
/// Decoders expand transparency chunks (a PNG `tRNS` palette entry or
/// colour key) into RGBA, so the pixel layout alone over-reports alpha.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    alpha: bool,
}

impl SourceImage {
    /// Wrap decoded pixels with the alpha flag read from the source.
    pub fn new(image: DynamicImage, alpha: bool) -> Self {
        Self { image, alpha }
    }

    /// The decoded pixels.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        let alpha = image.color().has_alpha();
        Self { image, alpha }
    }
}

impl DecodedImage for SourceImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn has_alpha(&self) -> bool {
        self.alpha
    }

    fn to_image_tensor(&self) -> Result<ImageTensor, ShapeError> {
        self.image.to_image_tensor()
    }

    fn to_rgba(&self) -> Rgba32FImage {
        self.image.to_rgba32f()
    }
}

/// One successfully decoded file.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// RGB tensor `(1, H, W, 3)`
    pub image: ImageTensor,
    /// Inverted alpha `(H, W)`
    pub mask: MaskTensor,
    /// Absolute path of the source file
    pub file_path: String,
    /// Final path segment without its extension
    pub file_name: String,
}

/// Open and decode `path`, applying its EXIF orientation.
///
/// The format is sniffed from the file content, falling back to the
/// extension.
pub fn open_image(path: &Path) -> Result<SourceImage, LoadError> {
    #[cfg(feature = "jxl")]
    if is_jxl(path) {
        return open_jxl(path).map(SourceImage::from);
    }

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let decode_err = |source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let bytes = fs::read(path).map_err(io_err)?;
    let mut reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(io_err)?;
    if reader.format().is_none() {
        if let Some(format) = path.extension().and_then(ImageFormat::from_extension) {
            reader.set_format(format);
        }
    }

    let png_alpha = match reader.format() {
        Some(ImageFormat::Png) => png_alpha_channel(&bytes),
        _ => None,
    };
    let mut decoder = reader.into_decoder().map_err(decode_err)?;
    let alpha = png_alpha.unwrap_or_else(|| stores_alpha(decoder.original_color_type()));
    let orientation = decoder.orientation().map_err(decode_err)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    image.apply_orientation(orientation);

    Ok(SourceImage::new(image, alpha))
}

/// Alpha channel flag from a PNG `IHDR` colour type: 4 is grey with alpha,
/// 6 is RGBA. Palette and RGB images with `tRNS` report `false`.
fn png_alpha_channel(bytes: &[u8]) -> Option<bool> {
    if bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    bytes.get(25).map(|&color_type| color_type == 4 || color_type == 6)
}

fn stores_alpha(color: ExtendedColorType) -> bool {
    matches!(
        color,
        ExtendedColorType::A8
            | ExtendedColorType::La1
            | ExtendedColorType::La2
            | ExtendedColorType::La4
            | ExtendedColorType::La8
            | ExtendedColorType::La16
            | ExtendedColorType::Rgba1
            | ExtendedColorType::Rgba2
            | ExtendedColorType::Rgba4
            | ExtendedColorType::Rgba8
            | ExtendedColorType::Rgba16
            | ExtendedColorType::Rgba32F
            | ExtendedColorType::Bgra8
    )
}

#[cfg(feature = "jxl")]
fn is_jxl(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("jxl"))
        .unwrap_or(false)
}

#[cfg(feature = "jxl")]
fn open_jxl(path: &Path) -> Result<DynamicImage, LoadError> {
    use image::error::{DecodingError, ImageError, ImageFormatHint};
    use jxl_oxide::integration::JxlDecoder;
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_err = |source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let decoder = JxlDecoder::new(BufReader::new(file)).map_err(|err| {
        decode_err(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Name("JPEG XL".to_string()),
            err,
        )))
    })?;
    DynamicImage::from_decoder(decoder).map_err(decode_err)
}

/// Base name of `path`: the final segment with its extension stripped.
pub fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    crate::loader::sort::strip_extension(&name).to_string()
}

/// Decode `path` into a full record. `path` should already be absolute.
pub fn decode_record(path: &Path) -> Result<ImageRecord, LoadError> {
    let image = open_image(path)?;
    let shape_err = |source| LoadError::Shape {
        path: path.to_path_buf(),
        source,
    };

    let tensor = image.to_image_tensor().map_err(shape_err)?;
    let mask = image.to_mask_tensor().map_err(shape_err)?;
    let (width, height) = image.dimensions();
    debug!(
        "Decoded '{}' ({}x{}, alpha: {})",
        path.display(),
        width,
        height,
        image.has_alpha()
    );

    Ok(ImageRecord {
        image: tensor,
        mask,
        file_path: path.to_string_lossy().into_owned(),
        file_name: base_name(path),
    })
}

/// Absolute form of `path`, leaving it unchanged if that cannot be resolved.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rgb_png_has_zero_mask() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(4, 3, Rgb([255, 0, 0])).save(&path).unwrap();

        let record = decode_record(&path).unwrap();
        assert_eq!(record.image.shape(), [1, 3, 4, 3]);
        assert_eq!(record.mask.shape(), [3, 4]);
        assert!(record.mask.data().iter().all(|&v| v == 0.0));
        assert_eq!(record.image.data()[[0, 1, 2, 0]], 1.0);
        assert_eq!(record.image.data()[[0, 1, 2, 1]], 0.0);
        assert_eq!(record.file_name, "red");
    }

    #[test]
    fn test_alpha_is_inverted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("half.png");
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        img.save(&path).unwrap();

        let record = decode_record(&path).unwrap();
        assert_eq!(record.mask.data()[[0, 0]], 0.0);
        assert_eq!(record.mask.data()[[0, 1]], 1.0);
        assert_eq!(record.image.shape(), [1, 2, 2, 3]);
    }

    fn write_indexed_png(path: &Path, trns: Option<&[u8]>) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = png::Encoder::new(file, 2, 1);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
        if let Some(trns) = trns {
            encoder.set_trns(trns.to_vec());
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0, 1]).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_palette_transparency_has_zero_mask() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("palette.png");
        write_indexed_png(&path, Some(&[255, 0]));

        let source = open_image(&path).unwrap();
        assert!(source.image().color().has_alpha());
        assert!(!source.has_alpha());

        let record = decode_record(&path).unwrap();
        assert_eq!(record.mask.shape(), [1, 2]);
        assert_eq!(record.mask.data().iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0]);
        assert_eq!(record.image.data()[[0, 0, 0, 0]], 1.0);
        assert_eq!(record.image.data()[[0, 0, 1, 2]], 1.0);
    }

    #[test]
    fn test_color_key_transparency_has_zero_mask() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyed.png");
        let file = fs::File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(file, 2, 1);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        // Key out pure red, stored as three 16-bit samples
        encoder.set_trns(vec![0, 255, 0, 0, 0, 0]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[255, 0, 0, 0, 0, 255]).unwrap();
        writer.finish().unwrap();

        let record = decode_record(&path).unwrap();
        assert_eq!(record.image.shape(), [1, 1, 2, 3]);
        assert_eq!(record.mask.data().iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_gray_alpha_png_keeps_mask() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayAlphaImage::from_pixel(3, 1, image::LumaA([128, 0]))
            .save(&path)
            .unwrap();

        let source = open_image(&path).unwrap();
        assert!(source.has_alpha());
        let record = decode_record(&path).unwrap();
        assert!(record.mask.data().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_default_mask_follows_alpha() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let mask = DynamicImage::ImageRgba8(img).to_mask_tensor().unwrap();
        assert_eq!(mask.data()[[0, 0]], 0.0);
        assert_eq!(mask.data()[[0, 1]], 1.0);

        let opaque = DynamicImage::ImageRgb8(RgbImage::new(2, 1));
        assert!(opaque.to_mask_tensor().unwrap().data().iter().all(|&v| v == 0.0));
    }

    /// JPEG bytes with an Exif APP1 segment carrying `orientation`.
    fn jpeg_with_orientation(width: u32, height: u32, orientation: u8) -> Vec<u8> {
        let mut encoded = Vec::new();
        RgbImage::from_pixel(width, height, Rgb([90, 160, 30]))
            .write_to(&mut std::io::Cursor::new(&mut encoded), ImageFormat::Jpeg)
            .unwrap();

        let mut exif = b"Exif\0\0".to_vec();
        // Big-endian TIFF header, IFD0 at offset 8
        exif.extend_from_slice(b"MM\0\x2A\0\0\0\x08");
        exif.extend_from_slice(&[0, 1]);
        // Orientation tag, SHORT, count 1
        exif.extend_from_slice(&[0x01, 0x12, 0, 3, 0, 0, 0, 1, 0, orientation, 0, 0]);
        exif.extend_from_slice(&[0, 0, 0, 0]);

        let length = (exif.len() + 2) as u16;
        let mut bytes = encoded[..2].to_vec();
        bytes.extend_from_slice(&[0xFF, 0xE1]);
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes.extend_from_slice(&exif);
        bytes.extend_from_slice(&encoded[2..]);
        bytes
    }

    #[test]
    fn test_exif_orientation_rotates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rotated.jpg");
        fs::write(&path, jpeg_with_orientation(4, 2, 6)).unwrap();

        let record = decode_record(&path).unwrap();
        assert_eq!(record.image.shape(), [1, 4, 2, 3]);
        assert_eq!(record.mask.shape(), [4, 2]);
    }

    #[test]
    fn test_format_sniffed_from_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actually_png.jpg");
        RgbImage::from_pixel(2, 5, Rgb([0, 0, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let record = decode_record(&path).unwrap();
        assert_eq!(record.image.shape(), [1, 5, 2, 3]);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let err = decode_record(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.png");
        assert!(matches!(decode_record(&path), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/a/b/img01.png")), "img01");
        assert_eq!(base_name(Path::new("/a/b/my.photo.JPG")), "my.photo");
        assert_eq!(base_name(Path::new("/a/b/.png")), ".png");
    }
}
