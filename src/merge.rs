//! PDF merge assembler: concatenate captured pages into one document.
//!
//! Every artifact's pages are re-parented under a fresh page tree whose
//! Kids preserve input order. Page content streams are copied untouched
//! so merged pages stay byte-identical to their sources. Chrome's
//! print-to-PDF emits self-contained page objects, so nothing needs to
//! be inherited from the source page trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::CaptureError;
use crate::runner::PageArtifact;

/// Merge the artifacts, in ascending ordinal order, into `output`.
///
/// Returns the total page count of the merged document.
pub fn merge_artifacts(
    artifacts: &[PageArtifact],
    output: &Path,
) -> Result<usize, CaptureError> {
    let inputs: Vec<PathBuf> = artifacts.iter().map(|a| a.path.clone()).collect();
    merge_documents(&inputs, output)
}

/// Concatenate all pages of `inputs`, in order, into a new document at
/// `output`.
///
/// No assumption is made about pages per input; within one input the
/// document's own page order is kept. An empty input set is the
/// "nothing to merge" run-level error and writes no file.
pub fn merge_documents(inputs: &[PathBuf], output: &Path) -> Result<usize, CaptureError> {
    if inputs.is_empty() {
        return Err(CaptureError::NothingToMerge);
    }

    let mut max_id: u32 = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in inputs {
        let mut doc = Document::load(path)?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        // get_pages is keyed by page number, so iteration preserves the
        // document's own page order.
        page_ids.extend(doc.get_pages().into_values());
        all_objects.append(&mut doc.objects);
        debug!(input = %path.display(), "Collected pages");
    }

    let mut merged = Document::with_version("1.5");
    let pages_id: ObjectId = (max_id, 0);
    let catalog_id: ObjectId = (max_id + 1, 0);

    for (object_id, object) in all_objects {
        match dict_type(&object) {
            // The sources' structural nodes are replaced wholesale.
            Some(b"Catalog") | Some(b"Pages") | Some(b"Outlines") => continue,
            Some(b"Page") => {
                if let Object::Dictionary(mut dict) = object {
                    dict.set("Parent", Object::Reference(pages_id));
                    merged.objects.insert(object_id, Object::Dictionary(dict));
                }
            }
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let page_count = kids.len();

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", page_count as i64);
    pages_dict.set("Kids", Object::Array(kids));
    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog_dict = Dictionary::new();
    catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog_dict.set("Pages", Object::Reference(pages_id));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog_dict));

    merged.trailer.set("Root", Object::Reference(catalog_id));
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.save(output)?;

    Ok(page_count)
}

fn dict_type(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

#[cfg(test)]
pub(crate) mod test_pdf {
    //! Minimal real PDFs for merge and pipeline tests.

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::path::Path;

    pub(crate) fn single_page_doc(marker: &str) -> Document {
        let mut doc = Document::with_version("1.5");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(marker)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    pub(crate) fn write_single_page_pdf(path: &Path, marker: &str) -> Result<(), lopdf::Error> {
        let mut doc = single_page_doc(marker);
        doc.save(path)?;
        Ok(())
    }
}
