use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;
use id_arena::Id;
use image::{ColorType, DynamicImage, GenericImageView};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf, Ref};
use std::collections::HashMap;
use std::path::Path;
use usvg::Tree;

pub type ImageId = Id<Image>;

pub enum RasterImageType {
    /// RGB JPEGs are embedded as-is
    DirectlyEmbeddableJpeg(Vec<u8>),
    Image(DynamicImage),
}

pub enum ImageType {
    Raster(RasterImageType),
    SVG(Tree),
}

/// An image that can be drawn on any page of a document, typically a logo drawn by
/// stationery. Images are stored once per document and referenced by [ImageId].
pub struct Image {
    pub image: ImageType,
    /// Natural width, in points for SVGs and pixels for raster images
    pub width: f32,
    pub height: f32,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.image {
            ImageType::Raster(_) => "raster",
            ImageType::SVG(_) => "svg",
        };
        f.debug_struct("Image")
            .field("kind", &kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Load an image from disk, treating `.svg` files as vector graphics and anything
    /// else as a raster image
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image, PDFError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        let data = std::fs::read(path)?;
        if is_svg {
            Self::new_svg(&data)
        } else {
            Self::new_raster_from_bytes(&data)
        }
    }

    pub fn new_svg(data: &[u8]) -> Result<Image, PDFError> {
        let tree = Tree::from_data(data, &usvg::Options::default())?;
        let size = tree.size();
        let width = size.width();
        let height = size.height();

        Ok(Image {
            image: ImageType::SVG(tree),
            width,
            height,
        })
    }

    pub fn new_raster_from_bytes(data: &[u8]) -> Result<Image, PDFError> {
        let format = image::guess_format(data)?;
        let image = image::load_from_memory_with_format(data, format)?;

        match (format, image.color()) {
            (image::ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Image {
                width: image.width() as f32,
                height: image.height() as f32,
                image: ImageType::Raster(RasterImageType::DirectlyEmbeddableJpeg(data.to_vec())),
            }),
            _ => Ok(Self::new_raster(image)),
        }
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        let width = image.width() as f32;
        let height = image.height() as f32;
        Image {
            image: ImageType::Raster(RasterImageType::Image(image)),
            width,
            height,
        }
    }

    fn encode_raster(raster: &RasterImageType) -> EncodeOutput {
        match raster {
            RasterImageType::DirectlyEmbeddableJpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            RasterImageType::Image(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<_> = image.pixels().map(|p| (p.2).0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    /// Write the image as an XObject. Both kinds are written so that they fill the unit
    /// square, to be scaled into place by the content stream.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        image_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        match &self.image {
            ImageType::Raster(raster) => {
                let id = refs.gen(RefType::Image(image_index));
                let encoded = Self::encode_raster(raster);

                let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
                image.filter(encoded.filter);
                image.width(self.width as i32);
                image.height(self.height as i32);
                image.color_space().device_rgb();
                image.bits_per_component(8);

                let mask_id = encoded
                    .mask
                    .as_ref()
                    .map(|_| refs.gen(RefType::ImageMask(image_index)));
                if let Some(mask_id) = mask_id {
                    image.s_mask(mask_id);
                }
                image.finish();

                // add a transparency mask if we have one
                if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
                    let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
                    s_mask.filter(Filter::FlateDecode);
                    s_mask.width(self.width as i32);
                    s_mask.height(self.height as i32);
                    s_mask.color_space().device_gray();
                    s_mask.bits_per_component(8);
                }
            }
            ImageType::SVG(tree) => {
                let (chunk, root) =
                    svg2pdf::to_chunk(tree, svg2pdf::ConversionOptions::default())
                        .map_err(|e| PDFError::SvgConversion(format!("{e:?}")))?;

                // move the converted objects into our own id space
                let mut mapping: HashMap<Ref, Ref> = HashMap::new();
                let chunk = chunk.renumber(|old| {
                    *mapping.entry(old).or_insert_with(|| {
                        if old == root {
                            refs.gen(RefType::Image(image_index))
                        } else {
                            refs.bump()
                        }
                    })
                });
                writer.extend(&chunk);
            }
        }

        Ok(())
    }
}
