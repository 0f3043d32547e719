use std::path::Path;

use pdf_writer::{Filter, Pdf, Ref};

/// A decoded or pass-through logo ready for embedding.
pub struct Logo {
    data: LogoData,
}

enum LogoData {
    /// Baseline/progressive RGB JPEG, embedded as-is.
    Jpeg {
        bytes: Vec<u8>,
        width: u32,
        height: u32,
    },
    Raster(image::RgbaImage),
}

impl Logo {
    /// Load a PNG or JPEG logo. A missing or undecodable file is logged and
    /// yields `None`; the report is laid out without a logo.
    pub fn load(path: &Path) -> Option<Logo> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("Logo {} unavailable: {e}", path.display());
                return None;
            }
        };
        let logo = Logo::from_bytes(bytes);
        if logo.is_none() {
            log::warn!("Logo {} could not be decoded, continuing without it", path.display());
        }
        logo
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Option<Logo> {
        if let Some((width, height, 3)) = jpeg_frame(&bytes) {
            return Some(Logo {
                data: LogoData::Jpeg {
                    bytes,
                    width,
                    height,
                },
            });
        }
        let decoded = image::ImageReader::new(std::io::Cursor::new(&bytes))
            .with_guessed_format()
            .ok()?
            .decode()
            .ok()?;
        Some(Logo {
            data: LogoData::Raster(decoded.to_rgba8()),
        })
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        match &self.data {
            LogoData::Jpeg { width, height, .. } => (*width, *height),
            LogoData::Raster(img) => (img.width(), img.height()),
        }
    }
}

/// Width, height and component count from the first JPEG start-of-frame marker.
fn jpeg_frame(data: &[u8]) -> Option<(u32, u32, u8)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        if marker == 0xD9 {
            break;
        }
        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if (marker == 0xC0 || marker == 0xC1 || marker == 0xC2) && i + 9 < data.len() {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height, data[i + 9]));
        }
        i += 2 + len;
    }
    None
}

/// Write the logo as an image XObject, with an SMask when it has transparency.
pub(crate) fn embed_logo(pdf: &mut Pdf, logo: &Logo, alloc: &mut impl FnMut() -> Ref) -> Ref {
    let xobj_ref = alloc();
    match &logo.data {
        LogoData::Jpeg {
            bytes,
            width,
            height,
        } => {
            let mut xobj = pdf.image_xobject(xobj_ref, bytes);
            xobj.filter(Filter::DctDecode);
            xobj.width(*width as i32);
            xobj.height(*height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }
        LogoData::Raster(rgba) => {
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    xobj_ref
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn png_logo_decodes() {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 128]));
        let logo = Logo::from_bytes(png_bytes(&img)).unwrap();
        assert_eq!(logo.pixel_size(), (4, 3));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Logo::from_bytes(b"not an image".to_vec()).is_none());
        assert!(Logo::from_bytes(Vec::new()).is_none());
    }

    #[test]
    fn missing_file_is_none() {
        assert!(Logo::load(Path::new("/nonexistent/logo.png")).is_none());
    }
}
