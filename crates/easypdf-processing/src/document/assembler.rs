//! PDF assembly from JPEG page images via lopdf

use crate::error::{CodecError, CodecResult};
use crate::traits::DocumentPage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

const IMAGE_RESOURCE: &[u8] = b"Im0";

/// Builds new PDF documents where each page draws a single JPEG image.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler;

impl DocumentAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble `pages` in order into a new PDF and return its bytes.
    pub fn assemble(&self, pages: &[DocumentPage]) -> CodecResult<Vec<u8>> {
        if pages.is_empty() {
            return Err(CodecError::Assemble("document has no pages".to_string()));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for page in pages {
            if page.pixel_width == 0 || page.pixel_height == 0 {
                return Err(CodecError::Assemble("page image has zero size".to_string()));
            }

            // Already DCT-encoded; flate on top would only cost CPU.
            let mut image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => page.pixel_width as i64,
                    "Height" => page.pixel_height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                page.jpeg.clone(),
            );
            image.allows_compression = false;
            let image_id = doc.add_object(image);

            let placement = page.placement;
            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::Real(placement.width),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Real(placement.height),
                            Object::Real(placement.x),
                            Object::Real(placement.y),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let encoded = content
                .encode()
                .map_err(|e| CodecError::Assemble(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width_pt),
                    Object::Real(page.height_pt),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        "Im0" => image_id,
                    },
                },
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| CodecError::Assemble(e.to_string()))?;

        tracing::debug!(
            pages = pages.len(),
            size_bytes = buffer.len(),
            "Assembled PDF document"
        );

        Ok(buffer)
    }
}
