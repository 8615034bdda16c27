use super::normalizer::{clean_text, normalize_header};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryRow {
    #[serde(alias = "item_id", default, deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    #[serde(alias = "item_name", default, deserialize_with = "empty_string_as_none")]
    pub(crate) name: Option<String>,
    #[serde(alias = "type", default, deserialize_with = "empty_string_as_none")]
    pub(crate) category: Option<String>,
    #[serde(
        alias = "area_name",
        alias = "location",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) area: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<InventoryRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    csv_reader.set_headers(headers);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<InventoryRow>() {
        rows.push(record?);
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty()))
}
