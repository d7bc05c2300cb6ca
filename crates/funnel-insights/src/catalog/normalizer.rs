/// Strips byte-order and zero-width marks and collapses runs of whitespace.
///
/// Case is preserved because names are displayed as written.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
