use crate::loader::ResourceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,     // Standard 32-bit color (0-255)
    Rgba8UnormSrgb, // Same layout, sampled through the sRGB curve
}

/// Decoded bitmap, CPU side. The renderer uploads this once and then
/// only keeps the GPU copy.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureData {
    /// 1x1 solid-color texture. The renderer uses a white one as the
    /// universal sampler fallback so untextured materials share a
    /// pipeline with textured ones.
    pub fn solid(name: &str, rgba: [u8; 4]) -> Self {
        Self {
            name: name.to_owned(),
            pixels: rgba.to_vec(),
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8Unorm,
        }
    }
}

/// Decodes an encoded bitmap (png/jpeg/...) into straight RGBA8.
/// Runs on a blocking worker, never on the render thread.
pub fn decode_bitmap(name: &str, bytes: &[u8]) -> Result<TextureData, ResourceError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ResourceError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    Ok(TextureData {
        name: name.to_owned(),
        pixels: image.into_raw(),
        width,
        height,
        format: TextureFormat::Rgba8UnormSrgb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_bitmap("junk", &[0xde, 0xad, 0xbe, 0xef]).is_err());
    }

    #[test]
    fn solid_is_one_pixel() {
        let t = TextureData::solid("white", [255, 255, 255, 255]);
        assert_eq!((t.width, t.height), (1, 1));
        assert_eq!(t.pixels.len(), 4);
    }
}
