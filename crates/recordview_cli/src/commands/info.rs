//! Info command implementation.

use recordview_core::{CoreResult, Record, RecordLoad, RecordStore, Stores};
use serde::Serialize;
use std::path::Path;

/// Store overview.
#[derive(Debug, Serialize)]
pub struct InfoResult {
    /// Store directory.
    pub path: String,
    /// One entry per store file.
    pub stores: Vec<StoreInfo>,
}

/// Record counts of one store.
#[derive(Debug, Serialize)]
pub struct StoreInfo {
    /// Store name.
    pub name: &'static str,
    /// Slot size in bytes.
    pub record_size: usize,
    /// Number of slots in the file.
    pub high_id: u64,
    /// Slots holding an in-use record.
    pub in_use: u64,
}

/// Runs the info command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let stores = super::open_stores(path)?;
    let result = InfoResult {
        path: path.display().to_string(),
        stores: collect(&stores)?,
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn collect(stores: &Stores) -> CoreResult<Vec<StoreInfo>> {
    Ok(vec![
        store_info("node", stores.nodes())?,
        store_info("relationship", stores.relationships())?,
        store_info("property", stores.properties())?,
        store_info(stores.strings().name(), stores.strings().records())?,
        store_info(stores.arrays().name(), stores.arrays().records())?,
        store_info(stores.labels().name(), stores.labels().records())?,
    ])
}

fn store_info<R: Record>(name: &'static str, store: &RecordStore<R>) -> CoreResult<StoreInfo> {
    let high_id = store.high_id()?;
    let mut record = store.new_record();
    let mut in_use = 0;
    for id in 0..high_id {
        store.get_record(id, &mut record, RecordLoad::Force)?;
        if record.in_use() {
            in_use += 1;
        }
    }
    Ok(StoreInfo {
        name,
        record_size: store.record_size(),
        high_id,
        in_use,
    })
}

fn print_text_output(result: &InfoResult) {
    println!("RecordView Store Info");
    println!("=====================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!(
        "{:<14} {:>8} {:>12} {:>12} {:>10}",
        "Store", "Slot", "Records", "In use", "Size"
    );
    for store in &result.stores {
        println!(
            "{:<14} {:>8} {:>12} {:>12} {:>10}",
            store.name,
            store.record_size,
            store.high_id,
            store.in_use,
            format_size(store.high_id * store.record_size as u64)
        );
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }
}
