// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotation editor: open an existing PDF, read and rewrite each page's
// `/Rotate` attribute, and save the result as a new file using the `lopdf`
// crate.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use rotafix_core::Rotation;
use rotafix_core::error::{Result, RotafixError};
use tracing::{debug, info, instrument, warn};

/// Deepest `/Parent` chain followed when resolving an inherited `/Rotate`.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// What a page tree node says about rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Declared {
    Absent,
    Degrees(i64),
    Malformed,
}

/// Reads and rewrites page rotation of an existing PDF.
///
/// Only the `/Rotate` entry of page dictionaries is ever written; page order,
/// content streams and every other object are saved back untouched.
pub struct RotationEditor {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in document order (index 0 is page 1).
    pages: Vec<ObjectId>,
}

impl RotationEditor {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            RotafixError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        let editor = Self::from_document(document);
        debug!(pages = editor.page_count(), "PDF loaded");
        Ok(editor)
    }

    /// Create an editor from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            RotafixError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        let editor = Self::from_document(document);
        debug!(pages = editor.page_count(), "PDF loaded from bytes");
        Ok(editor)
    }

    fn from_document(document: Document) -> Self {
        // get_pages is keyed by 1-indexed page number, so values come out in order.
        let pages = document.get_pages().into_values().collect();
        Self { document, pages }
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Effective rotation of a page (1-indexed).
    ///
    /// A missing `/Rotate` reads as upright. `Ok(None)` means the page carries
    /// a value that is not a multiple of 90 (or not a number at all).
    pub fn rotation(&self, page_number: u32) -> Result<Option<Rotation>> {
        let page_id = self.page_id(page_number)?;
        Ok(match self.declared_rotation(page_id) {
            Declared::Absent => Some(Rotation::None),
            Declared::Degrees(degrees) => Rotation::from_degrees(degrees),
            Declared::Malformed => None,
        })
    }

    /// Every page's rotation in document order, paired with its page number.
    pub fn page_rotations(&self) -> Result<Vec<(u32, Option<Rotation>)>> {
        (1..=self.pages.len() as u32)
            .map(|page_number| Ok((page_number, self.rotation(page_number)?)))
            .collect()
    }

    // -- Mutation -------------------------------------------------------------

    /// Store `rotation` directly on the page dictionary, overriding anything
    /// inherited from the page tree.
    #[instrument(skip(self, rotation), fields(degrees = rotation.degrees()))]
    pub fn set_rotation(&mut self, page_number: u32, rotation: Rotation) -> Result<()> {
        let page_id = self.page_id(page_number)?;
        let page = self.document.get_dictionary_mut(page_id).map_err(|err| {
            RotafixError::PdfError(format!("page {} is not a dictionary: {}", page_number, err))
        })?;
        page.set("Rotate", Object::Integer(rotation.degrees()));
        debug!(page_number, %rotation, "Rotation set");
        Ok(())
    }

    /// Serialise the whole document to `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path_ref = path.as_ref();
        self.document.save(path_ref).map_err(|err| {
            RotafixError::PdfError(format!("failed to save {}: {}", path_ref.display(), err))
        })?;
        info!("Saved PDF to {}", path_ref.display());
        Ok(())
    }

    /// Serialise the whole document into memory.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            RotafixError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        page_number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .copied()
            .ok_or_else(|| {
                RotafixError::PdfError(format!(
                    "page {} out of range (document has {} pages)",
                    page_number,
                    self.pages.len()
                ))
            })
    }

    /// Walk from the page up through `/Parent` until a node declares `/Rotate`.
    fn declared_rotation(&self, page_id: ObjectId) -> Declared {
        let mut node_id = page_id;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Ok(node) = self.document.get_dictionary(node_id) else {
                return Declared::Absent;
            };
            if let Ok(value) = node.get(b"Rotate") {
                return self.interpret_rotate(value);
            }
            match parent_of(node) {
                Some(parent) => node_id = parent,
                None => return Declared::Absent,
            }
        }
        warn!(?page_id, "Page tree deeper than expected, ignoring inherited /Rotate");
        Declared::Absent
    }

    fn interpret_rotate(&self, value: &Object) -> Declared {
        let value = match value {
            Object::Reference(id) => match self.document.get_object(*id) {
                Ok(resolved) => resolved,
                Err(_) => return Declared::Malformed,
            },
            other => other,
        };
        match value {
            Object::Integer(degrees) => Declared::Degrees(*degrees),
            Object::Real(degrees) if degrees.fract() == 0.0 => Declared::Degrees(*degrees as i64),
            _ => Declared::Malformed,
        }
    }
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").ok().and_then(|parent| parent.as_reference().ok())
}
