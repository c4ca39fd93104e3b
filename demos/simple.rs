//! Building, printing and parsing a single table.
//!
//! Run with: cargo run --example simple

use std::error::Error;
use tbl::{tbl_row, FormatOptions, TblDocument};

fn main() -> Result<(), Box<dyn Error>> {
    let mut document = TblDocument::new(&["Item", "Count", "Note"])?;
    document.add_row(&tbl_row!["Apples", 3, "Fresh from the farm"])?;
    document.add_row(&tbl_row!["Pears", 12, null])?;
    document.add_row(&tbl_row!["Plums", 150])?;
    document.meta_mut().title = Some("Fruit Stock".to_string());

    println!("Plain:\n{}\n", document);
    println!("Aligned:\n{}\n", document.to_aligned_string());

    let options = FormatOptions::aligned()
        .with_whitespace_between("  ")
        .with_right_aligned(vec![false, true, false]);
    println!("Counts right-aligned:\n{}\n", document.to_string_with_options(&options));

    println!("Minified:\n{}\n", document.to_minified_string());

    let parsed: TblDocument = tbl::from_str(&document.to_string())?;
    assert_eq!(parsed, document);
    println!("✓ Round-trip successful");

    Ok(())
}
