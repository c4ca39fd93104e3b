/// Builds a table row as `Vec<Option<String>>`.
///
/// `null` becomes a null cell; any other token is converted with
/// [`ToString`]. Wrap longer expressions in parentheses.
///
/// # Examples
///
/// ```rust
/// use tbl::{tbl_row, TblDocument};
///
/// let mut document = TblDocument::new(&["Item", "Count", "Note"]).unwrap();
/// let count = 3;
/// document.add_row(&tbl_row!["Apples", count, null]).unwrap();
/// document.add_row(&tbl_row!["Pears", (count * 2)]).unwrap();
///
/// assert_eq!(document.to_string(), "Table\n\tItem Count Note\n\tApples 3 -\n\tPears 6\nEnd");
/// ```
#[macro_export]
macro_rules! tbl_row {
    (@cell null) => {
        ::core::option::Option::None::<::std::string::String>
    };

    (@cell $value:expr) => {
        ::core::option::Option::Some(::std::string::ToString::to_string(&$value))
    };

    ($($cell:tt),* $(,)?) => {
        ::std::vec![$($crate::tbl_row!(@cell $cell)),*]
    };
}
