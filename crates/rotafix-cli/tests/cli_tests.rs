// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the `rotafix` binary: exit codes, output naming, and
// the console report. Reset mode only, so no OCR tooling is needed.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use lopdf::{Document, Object, dictionary};

fn run_cli(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rotafix"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch rotafix")
}

/// Write a PDF with one page per entry; `None` omits `/Rotate`.
fn write_pdf(path: &Path, rotations: &[Option<i64>]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = rotations
        .iter()
        .map(|rotation| {
            let mut page = dictionary! {
                "Type" => Object::Name(b"Page".to_vec()),
                "Parent" => Object::Reference(pages_id),
            };
            if let Some(degrees) = rotation {
                page.set("Rotate", Object::Integer(*degrees));
            }
            Object::Reference(doc.add_object(page))
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Count" => Object::Integer(rotations.len() as i64),
            "Kids" => Object::Array(kids),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.save(path).expect("failed to write fixture");
}

fn rotations(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("failed to reload output");
    doc.get_pages()
        .values()
        .map(|id| {
            doc.get_dictionary(*id)
                .unwrap()
                .get(b"Rotate")
                .and_then(|value| value.as_i64())
                .unwrap_or(0)
        })
        .collect()
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    entries.sort();
    entries
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let output = run_cli(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "stdout was: {stdout}");
}

#[test]
fn non_pdf_file_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("x.txt");
    std::fs::write(&text, "not a pdf").unwrap();

    let output = run_cli(&[&text]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("is not a PDF file"));
    assert_eq!(sorted_entries(dir.path()), vec![text]);
}

#[test]
fn directory_without_pdfs_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("UPPER.PDF"), b"%PDF-1.5").unwrap();

    let output = run_cli(&[dir.path()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No PDF files found"));
}

#[test]
fn missing_target_fails() {
    let output = run_cli(&[Path::new("/nonexistent/rotafix-target")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("is not a valid file or directory"));
}

#[test]
fn directory_run_fixes_rotated_files_only() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(&dir.path().join("a.pdf"), &[Some(90), None, Some(180)]);
    write_pdf(&dir.path().join("b.pdf"), &[None, Some(0)]);

    let output = run_cli(&[dir.path(), Path::new("_out")]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 2 PDF file(s)"), "stdout was: {stdout}");
    assert!(stdout.contains("Page 1: Correcting rotation from 90° to 0°"));
    assert!(stdout.contains("No rotation corrections needed"));
    assert!(stdout.contains("Summary: Processed 2 files, fixed 1 files"));

    let fixed = dir.path().join("a_out.pdf");
    assert_eq!(rotations(&fixed), vec![0, 0, 0]);
    assert!(!dir.path().join("b_out.pdf").exists());
    // Originals are left alone.
    assert_eq!(rotations(&dir.path().join("a.pdf")), vec![90, 0, 180]);
}

#[test]
fn corrupt_file_does_not_change_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"%PDF-1.5 garbage").unwrap();
    write_pdf(&dir.path().join("good.pdf"), &[Some(270)]);

    let output = run_cli(&[dir.path()]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error processing file"), "stdout was: {stdout}");
    assert!(stdout.contains("Processed 2 files, fixed 1 files"));
    assert!(dir.path().join("good_fixed.pdf").exists());
}
