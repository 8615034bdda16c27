pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    collapsed.to_ascii_lowercase()
}

pub(crate) fn clean_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_lose_bom_case_and_spacing() {
        assert_eq!(normalize_header("\u{feff} Item  ID "), "item_id");
        assert_eq!(normalize_header("Category"), "category");
    }

    #[test]
    fn text_collapses_inner_whitespace() {
        assert_eq!(clean_text("  Dining   table\t"), "Dining table");
    }
}
