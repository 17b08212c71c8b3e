// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the rotafix-document crate. Covers the rotation
// scan of a long document, which is the whole per-file cost in reset mode.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lopdf::{Document, Object, dictionary};

use rotafix_document::RotationEditor;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Serialise a document of `count` pages cycling through 0/90/180/270.
fn rotated_pdf(count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..count)
        .map(|index| {
            let page = dictionary! {
                "Type" => Object::Name(b"Page".to_vec()),
                "Parent" => Object::Reference(pages_id),
                "Rotate" => Object::Integer((index as i64 % 4) * 90),
            };
            Object::Reference(doc.add_object(page))
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Count" => Object::Integer(count as i64),
            "Kids" => Object::Array(kids),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise fixture");
    bytes
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Load a 500-page document and read every page's rotation.
fn bench_page_rotations(c: &mut Criterion) {
    let bytes = rotated_pdf(500);

    c.bench_function("page_rotations (500 pages)", |b| {
        b.iter(|| {
            let editor = RotationEditor::from_bytes(black_box(&bytes)).expect("load");
            black_box(editor.page_rotations().expect("scan"));
        });
    });
}

criterion_group!(benches, bench_page_rotations);
criterion_main!(benches);
