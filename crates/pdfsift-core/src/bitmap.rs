use std::io::Cursor;

use image::{DynamicImage, GrayImage, RgbImage};

/// An in-memory decoded bitmap pulled out of a PDF.
///
/// Carries no persisted identity; it lives exactly as long as the
/// [`ExtractionResult`](crate::ExtractionResult) that holds it.
#[derive(Debug, Clone)]
pub struct PageImage {
    bitmap: DynamicImage,
}

impl PageImage {
    pub fn new(bitmap: DynamicImage) -> Self {
        Self { bitmap }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &DynamicImage {
        &self.bitmap
    }

    /// Decode from an encoded container (JPEG for DCTDecode streams, JPEG2000
    /// for JPXDecode, or any format the `image` crate can sniff).
    pub fn from_encoded(data: &[u8]) -> Result<Self, image::ImageError> {
        Ok(Self::new(image::load_from_memory(data)?))
    }

    /// Build from the raw samples of a decompressed PDF image object.
    ///
    /// `components` is the color component count: 1 (gray), 3 (RGB), or
    /// 4 (CMYK, converted to RGB). Only 8 bits per component is supported;
    /// anything else returns `None` and the caller skips the image.
    pub fn from_raw_samples(
        width: u32,
        height: u32,
        components: u8,
        data: &[u8],
    ) -> Option<Self> {
        let expected = width as usize * height as usize * components as usize;
        if expected == 0 || data.len() < expected {
            return None;
        }
        let data = &data[..expected];

        let bitmap = match components {
            1 => DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, data.to_vec())?),
            3 => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, data.to_vec())?),
            4 => {
                let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
                for px in data.chunks_exact(4) {
                    let (c, m, y, k) = (px[0] as u32, px[1] as u32, px[2] as u32, px[3] as u32);
                    rgb.push(((255 - c) * (255 - k) / 255) as u8);
                    rgb.push(((255 - m) * (255 - k) / 255) as u8);
                    rgb.push(((255 - y) * (255 - k) / 255) as u8);
                }
                DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, rgb)?)
            }
            _ => return None,
        };
        Some(Self::new(bitmap))
    }

    /// Re-encode as PNG, for inlining into markdown output.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Vec::new();
        self.bitmap
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)?;
        Ok(out)
    }

    /// Decode a PDF image XObject stream into a bitmap.
    ///
    /// DCTDecode/JPXDecode streams go through the container decoder; anything
    /// else is treated as raw samples after stream decompression. Images this
    /// cannot handle (indexed palettes, 1-bit masks, exotic filters) yield
    /// `None` and the calling backend skips them.
    pub fn from_image_object(doc: &lopdf::Document, stream: &lopdf::Stream) -> Option<Self> {
        let dict = &stream.dict;
        let width = dict_u32(dict, b"Width")?;
        let height = dict_u32(dict, b"Height")?;

        let filters = filter_names(doc, dict);
        if filters.iter().any(|f| f == "DCTDecode" || f == "JPXDecode") {
            return match Self::from_encoded(&stream.content) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable embedded image");
                    None
                }
            };
        }

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);
        if bits != 8 {
            tracing::debug!(bits, "skipping embedded image with unsupported bit depth");
            return None;
        }

        let components = color_components(doc, dict.get(b"ColorSpace").ok(), 0)?;
        let data = if filters.is_empty() {
            stream.content.clone()
        } else {
            stream.decompressed_content().ok()?
        };
        Self::from_raw_samples(width, height, components, &data)
    }
}

fn dict_u32(dict: &lopdf::Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
}

fn filter_names(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> Vec<String> {
    let Ok(filter) = dict.get(b"Filter") else {
        return Vec::new();
    };
    let filter = resolve(doc, filter, 0).unwrap_or(filter);
    match filter {
        lopdf::Object::Name(name) => vec![String::from_utf8_lossy(name).into_owned()],
        lopdf::Object::Array(items) => items
            .iter()
            .filter_map(|o| match o {
                lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Color component count for a /ColorSpace entry: 1 gray, 3 RGB, 4 CMYK.
/// ICCBased spaces resolve their /N; indexed and separation spaces are
/// unsupported.
fn color_components(
    doc: &lopdf::Document,
    colorspace: Option<&lopdf::Object>,
    depth: u8,
) -> Option<u8> {
    if depth > 4 {
        return None;
    }
    let cs = resolve(doc, colorspace?, depth)?;
    match cs {
        lopdf::Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" => Some(1),
            b"DeviceRGB" | b"CalRGB" => Some(3),
            b"DeviceCMYK" => Some(4),
            _ => None,
        },
        lopdf::Object::Array(items) => match items.first() {
            Some(lopdf::Object::Name(name)) if name.as_slice() == b"ICCBased" => {
                let icc = resolve(doc, items.get(1)?, depth + 1)?;
                let lopdf::Object::Stream(s) = icc else {
                    return None;
                };
                s.dict
                    .get(b"N")
                    .ok()
                    .and_then(|o| o.as_i64().ok())
                    .and_then(|n| match n {
                        1 | 3 | 4 => Some(n as u8),
                        _ => None,
                    })
            }
            Some(lopdf::Object::Name(name)) if name.as_slice() == b"CalRGB" => Some(3),
            Some(lopdf::Object::Name(name)) if name.as_slice() == b"CalGray" => Some(1),
            _ => None,
        },
        _ => None,
    }
}

fn resolve<'a>(
    doc: &'a lopdf::Document,
    object: &'a lopdf::Object,
    depth: u8,
) -> Option<&'a lopdf::Object> {
    match object {
        lopdf::Object::Reference(id) if depth <= 4 => {
            let target = doc.get_object(*id).ok()?;
            resolve(doc, target, depth + 1)
        }
        lopdf::Object::Reference(_) => None,
        _ => Some(object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_rgb_samples_produce_declared_dimensions() {
        let data = vec![0u8; 2 * 3 * 3];
        let img = PageImage::from_raw_samples(2, 3, 3, &data).unwrap();
        assert_eq!((img.width(), img.height()), (2, 3));
    }

    #[test]
    fn raw_gray_and_cmyk_samples_decode() {
        assert!(PageImage::from_raw_samples(4, 4, 1, &vec![128u8; 16]).is_some());

        let cmyk = PageImage::from_raw_samples(1, 1, 4, &[0, 0, 0, 0]).unwrap();
        // Zero ink on all channels is white.
        assert_eq!(cmyk.bitmap().to_rgb8().get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn short_or_unsupported_samples_are_rejected() {
        assert!(PageImage::from_raw_samples(2, 2, 3, &[0u8; 5]).is_none());
        assert!(PageImage::from_raw_samples(2, 2, 2, &[0u8; 8]).is_none());
        assert!(PageImage::from_raw_samples(0, 0, 3, &[]).is_none());
    }

    #[test]
    fn png_round_trip_stays_decodable() {
        let img = PageImage::from_raw_samples(2, 2, 3, &vec![200u8; 12]).unwrap();
        let png = img.to_png().unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert!(PageImage::from_encoded(&png).is_ok());
    }

    #[test]
    fn garbage_bytes_fail_encoded_decode() {
        assert!(PageImage::from_encoded(b"not an image").is_err());
    }

    #[test]
    fn raw_rgb_image_object_decodes() {
        let doc = lopdf::Document::with_version("1.5");
        let dict = lopdf::dictionary! {
            "Type" => lopdf::Object::Name(b"XObject".to_vec()),
            "Subtype" => lopdf::Object::Name(b"Image".to_vec()),
            "Width" => 2,
            "Height" => 2,
            "BitsPerComponent" => 8,
            "ColorSpace" => lopdf::Object::Name(b"DeviceRGB".to_vec()),
        };
        let stream = lopdf::Stream::new(dict, vec![0u8; 12]);

        let img = PageImage::from_image_object(&doc, &stream).unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
    }

    #[test]
    fn indexed_colorspace_image_object_is_skipped() {
        let doc = lopdf::Document::with_version("1.5");
        let dict = lopdf::dictionary! {
            "Subtype" => lopdf::Object::Name(b"Image".to_vec()),
            "Width" => 2,
            "Height" => 2,
            "BitsPerComponent" => 8,
            "ColorSpace" => vec![
                lopdf::Object::Name(b"Indexed".to_vec()),
                lopdf::Object::Name(b"DeviceRGB".to_vec()),
                lopdf::Object::Integer(255),
            ],
        };
        let stream = lopdf::Stream::new(dict, vec![0u8; 4]);

        assert!(PageImage::from_image_object(&doc, &stream).is_none());
    }
}
