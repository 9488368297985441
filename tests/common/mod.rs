//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rust_xlsxwriter::Workbook;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pdf_formcheck::error::Result;
use pdf_formcheck::pdf::{validate_pdf, Outcome, Validator};
use pdf_formcheck::viewer::Launcher;

pub const HEADERS: [&str; 5] = [
    "CombinedFormCode_Pdf_version",
    "CMAFormCode",
    "FactsheetFormCode",
    "Result",
    "LANG",
];

/// Write a PDF with one page per entry, each page showing that text
pub fn write_pdf(path: &Path, pages: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ];
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
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

    doc.save(path).expect("save fixture PDF");
}

/// Write a workbook with the standard header and string cells
///
/// An empty string leaves the cell blank.
pub fn write_sheet(path: &Path, headers: &[&str], rows: &[[&str; 5]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).expect("write header");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string((row_idx + 1) as u32, col as u16, *value)
                    .expect("write cell");
            }
        }
    }

    workbook.save(path).expect("save fixture workbook");
}

/// Launcher that remembers what it was asked to open
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: RefCell<Vec<PathBuf>>,
}

impl Launcher for RecordingLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Launcher that always fails
pub struct FailingLauncher;

impl Launcher for FailingLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        Err(pdf_formcheck::Error::Launch {
            path: path.to_path_buf(),
            message: "no viewer".to_string(),
        })
    }
}

/// PDF validator that records the names it was called with
#[derive(Default)]
pub struct CountingValidator {
    pub calls: RefCell<Vec<String>>,
}

impl Validator for CountingValidator {
    fn validate(
        &self,
        path: &Path,
        display_name: &str,
        cma_code: &str,
        factsheet_code: &str,
    ) -> Outcome {
        self.calls.borrow_mut().push(display_name.to_string());
        validate_pdf(path, display_name, cma_code, factsheet_code)
    }
}
