//! Collections of tables and their transport forms.
//!
//! Run with: cargo run --example multi_table

use std::error::Error;
use tbl::{tbl_row, Encoding, TblDocument, TblsDocument};

fn main() -> Result<(), Box<dyn Error>> {
    let mut fruit = TblDocument::with_encoding(&["Fruit", "Color"], Encoding::Utf16)?;
    fruit.add_row(&tbl_row!["Apple", "Red"])?;
    fruit.add_row(&tbl_row!["Banana", "Yellow"])?;

    let mut cities =
        TblDocument::with_encoding(&["City", "Country", "Population"], Encoding::Utf16)?;
    cities.add_row(&tbl_row!["Berlin", "Germany", 3_645_000])?;
    cities.add_row(&tbl_row!["\"Old Town\"", null])?;

    let mut document = TblsDocument::from(vec![fruit, cities]);
    document.meta.title = Some("Examples".to_string());
    document.encoding = Encoding::Utf16;

    println!("Aligned:\n{}\n", document.to_aligned_string());

    let bytes = document.to_bytes();
    println!("UTF-16 bytes: {}", bytes.len());
    assert_eq!(TblsDocument::from_bytes(&bytes)?, document);

    let base64 = document.to_base64_string();
    println!("Base64: {}", base64);
    assert_eq!(TblsDocument::from_base64_string(&base64)?, document);

    let binary = document.to_binary_tbls();
    println!("Binary: {} bytes", binary.len());
    let from_binary = TblsDocument::from_binary_tbls(&binary)?;
    assert_eq!(from_binary.to_string(), document.to_string());
    println!("✓ All transport forms round-trip");

    Ok(())
}
