//! Loads an apartment's inventory list from a dashboard CSV export.

mod normalizer;
mod parser;

use crate::workflows::inspection::{InventoryItemRef, ItemId};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Category assigned to rows exported without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug)]
pub enum InventoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for InventoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryImportError::Io(err) => write!(f, "failed to read inventory export: {}", err),
            InventoryImportError::Csv(err) => write!(f, "invalid inventory CSV data: {}", err),
        }
    }
}

impl std::error::Error for InventoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryImportError::Io(err) => Some(err),
            InventoryImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for InventoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for InventoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct InventoryImporter;

impl InventoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<InventoryItemRef>, InventoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows without an id or name are skipped; repeated ids keep the first row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<InventoryItemRef>, InventoryImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut items = Vec::new();

        for row in parser::parse_rows(reader)? {
            let (Some(id), Some(name)) = (row.id, row.name) else {
                debug!("skipping inventory row without id or name");
                continue;
            };
            if !seen.insert(id.clone()) {
                debug!(item_id = %id, "skipping duplicate inventory row");
                continue;
            }

            items.push(InventoryItemRef {
                id: ItemId(id),
                name,
                category: row.category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
                area_name: row.area,
            });
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn importer_reads_items_in_file_order() {
        let csv = "id,name,category,area\n\
sofa,Sofa,Furniture,Living Room\n\
fridge,Refrigerator,Appliances,Kitchen\n";
        let items = InventoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0], InventoryItemRef::new("sofa", "Sofa", "Furniture").in_area("Living Room"));
        assert_eq!(items[1].area_name.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn importer_accepts_header_variants_and_missing_area_column() {
        let csv = "\u{feff}Item ID , Item  Name,Category\nlamp,  Floor   lamp ,\n";
        let items = InventoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId::new("lamp"));
        assert_eq!(items[0].name, "Floor lamp");
        assert_eq!(items[0].category, UNCATEGORIZED);
        assert!(items[0].area_name.is_none());
    }

    #[test]
    fn importer_skips_blank_and_duplicate_rows() {
        let csv = "id,name,category,area\n\
,Orphan,Decor,\n\
rug,,Decor,\n\
tv,Television,Appliances,\n\
tv,Second TV,Appliances,Bedroom\n";
        let items = InventoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Television");
        assert!(items[0].area_name.is_none());
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = InventoryImporter::from_path("./does-not-exist.csv").expect_err("io error");
        match error {
            InventoryImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
