//! Image payload access and header inspection.
//!
//! Pixel bytes reach the reconstruction through a [`PixelProvider`], keyed
//! by image identity; [`DocumentPixels`] serves the inline base64 payloads
//! most documents carry. Format sniffing and the natural-dimension probe
//! read only file headers, never a full decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::Result;
use crate::types::ImageRef;

/// Image format detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from magic bytes
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        // TIFF: II or MM
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Self::Tiff;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
            return Self::Webp;
        }

        Self::Unknown
    }

    /// Get MIME type for this image format
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Natural pixel dimensions read from the file header, when the format
/// carries them in a fixed place. Zero-sized claims are treated as absent.
#[must_use]
pub fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let dims = match ImageFormat::from_magic_bytes(data) {
        ImageFormat::Png => probe_png(data),
        ImageFormat::Jpeg => probe_jpeg(data),
        ImageFormat::Gif => probe_gif(data),
        ImageFormat::Bmp => probe_bmp(data),
        _ => None,
    }?;
    (dims.0 > 0 && dims.1 > 0).then_some(dims)
}

/// IHDR is required to be the first chunk; width and height sit at fixed
/// offsets 16 and 20.
fn probe_png(data: &[u8]) -> Option<(u32, u32)> {
    if data.get(12..16)? != b"IHDR" {
        return None;
    }
    Some((be_u32(data, 16)?, be_u32(data, 20)?))
}

/// Walk the marker stream to the first start-of-frame segment.
fn probe_jpeg(data: &[u8]) -> Option<(u32, u32)> {
    let mut offset = 2usize;
    while offset + 4 <= data.len() {
        if *data.get(offset)? != 0xFF {
            return None;
        }
        let marker = *data.get(offset + 1)?;
        if marker == 0xFF {
            // Fill byte
            offset += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            // Standalone marker, no length field
            offset += 2;
            continue;
        }
        if is_sof_marker(marker) {
            // marker(2) length(2) precision(1) height(2) width(2)
            let height = be_u16(data, offset + 5)?;
            let width = be_u16(data, offset + 7)?;
            return Some((width.into(), height.into()));
        }
        let len = usize::from(be_u16(data, offset + 2)?);
        if len < 2 {
            return None;
        }
        offset += 2 + len;
    }
    None
}

const fn is_sof_marker(marker: u8) -> bool {
    // C4 (DHT), C8 (JPG) and CC (DAC) are not frames
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Logical screen descriptor: u16-LE width and height at offsets 6 and 8.
fn probe_gif(data: &[u8]) -> Option<(u32, u32)> {
    Some((le_u16(data, 6)?.into(), le_u16(data, 8)?.into()))
}

/// BITMAPINFOHEADER: i32-LE width at 18, height at 22. A negative height
/// marks a top-down bitmap, not a negative size.
fn probe_bmp(data: &[u8]) -> Option<(u32, u32)> {
    let width = u32::try_from(le_i32(data, 18)?).ok()?;
    let height = le_i32(data, 22)?.unsigned_abs();
    Some((width, height))
}

fn be_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

fn be_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes: [u8; 2] = data.get(offset..offset + 2)?.try_into().ok()?;
    Some(u16::from_be_bytes(bytes))
}

fn le_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes: [u8; 2] = data.get(offset..offset + 2)?.try_into().ok()?;
    Some(u16::from_le_bytes(bytes))
}

fn le_i32(data: &[u8], offset: usize) -> Option<i32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(i32::from_le_bytes(bytes))
}

/// Side-channel pixel-byte extraction, keyed by image identity.
///
/// `Ok(None)` means the provider has nothing for this image; errors mean a
/// payload exists but cannot be decoded. The driver renders a placeholder
/// in both cases rather than failing the run.
pub trait PixelProvider {
    /// Raw encoded bytes for the given image, if available.
    ///
    /// # Errors
    /// Returns [`crate::XlsceneError::Image`] when a payload is present but
    /// undecodable.
    fn bytes_for(&self, image: &ImageRef) -> Result<Option<Vec<u8>>>;
}

/// Serves the inline base64 payloads carried by the document itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPixels;

impl PixelProvider for DocumentPixels {
    fn bytes_for(&self, image: &ImageRef) -> Result<Option<Vec<u8>>> {
        match image.source.data.as_deref() {
            Some(encoded) => Ok(Some(decode_payload(encoded)?)),
            None => Ok(None),
        }
    }
}

/// Decode an inline payload, tolerating a `data:` URL prefix.
fn decode_payload(encoded: &str) -> Result<Vec<u8>> {
    let body = match encoded.split_once(',') {
        Some((head, tail)) if head.starts_with("data:") => tail,
        _ => encoded,
    };
    Ok(STANDARD.decode(body.trim())?)
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
    use crate::error::XlsceneError;
    use crate::types::PixelSource;

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data
    }

    fn image_with_payload(data: Option<String>) -> ImageRef {
        ImageRef {
            name: "Picture 1".to_string(),
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            z: 0,
            anchor: None,
            source: PixelSource {
                source_width: None,
                source_height: None,
                data,
            },
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&png_header(1, 1)),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a\x01\x00"), ImageFormat::Gif);
        assert_eq!(ImageFormat::from_magic_bytes(b"BM\x00\x00"), ImageFormat::Bmp);
        assert_eq!(ImageFormat::from_magic_bytes(b"xx"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Unknown.mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_probe_png_dimensions() {
        assert_eq!(probe_dimensions(&png_header(256, 128)), Some((256, 128)));
        // Zero-sized claims read as absent
        assert_eq!(probe_dimensions(&png_header(0, 128)), None);
    }

    #[test]
    fn test_probe_jpeg_dimensions() {
        let mut data = vec![0xFF, 0xD8];
        // APP0, 16-byte segment
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(&[0u8; 14]);
        // SOF0: precision 8, height 100, width 200
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x64, 0x00, 0xC8, 0x03]);
        assert_eq!(probe_dimensions(&data), Some((200, 100)));
    }

    #[test]
    fn test_probe_gif_dimensions() {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&300u16.to_le_bytes());
        data.extend_from_slice(&150u16.to_le_bytes());
        data.push(0);
        assert_eq!(probe_dimensions(&data), Some((300, 150)));
    }

    #[test]
    fn test_probe_bmp_dimensions() {
        let mut data = b"BM".to_vec();
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&100i32.to_le_bytes());
        data.extend_from_slice(&(-10i32).to_le_bytes()); // top-down
        assert_eq!(probe_dimensions(&data), Some((100, 10)));
    }

    #[test]
    fn test_probe_rejects_truncated_data() {
        assert_eq!(probe_dimensions(&[0x89, 0x50, 0x4E, 0x47]), None);
        assert_eq!(probe_dimensions(&[0xFF, 0xD8, 0xFF]), None);
    }

    #[test]
    fn test_document_pixels_decodes_inline_payload() {
        let encoded = STANDARD.encode(b"pixels");
        let image = image_with_payload(Some(encoded));
        let bytes = DocumentPixels.bytes_for(&image).unwrap();
        assert_eq!(bytes.as_deref(), Some(b"pixels".as_slice()));
    }

    #[test]
    fn test_document_pixels_strips_data_url_prefix() {
        let encoded = format!("data:image/png;base64,{}", STANDARD.encode(b"pixels"));
        let image = image_with_payload(Some(encoded));
        let bytes = DocumentPixels.bytes_for(&image).unwrap();
        assert_eq!(bytes.as_deref(), Some(b"pixels".as_slice()));
    }

    #[test]
    fn test_document_pixels_without_payload() {
        let image = image_with_payload(None);
        assert!(DocumentPixels.bytes_for(&image).unwrap().is_none());
    }

    #[test]
    fn test_document_pixels_rejects_bad_base64() {
        let image = image_with_payload(Some("not!!base64".to_string()));
        let err = DocumentPixels.bytes_for(&image).unwrap_err();
        assert!(matches!(err, XlsceneError::Image(_)));
    }
}
