use serde::{Deserialize, Serialize};

/// Flash offset of the partition table in a merged image.
pub const PARTITION_TABLE_OFFSET: usize = 0x8000;
/// Size of the window scanned for partition entries.
pub const PARTITION_TABLE_LEN: usize = 0x4000;
/// Size of one partition table entry.
pub const PARTITION_ENTRY_SIZE: usize = 0x20;
/// Partition type tag for application partitions.
pub const APP_PARTITION_TYPE: u8 = 0x00;

/// Where and how to look for the app partition.
///
/// Missing fields fall back to the standard layout, so a config file only
/// needs to name what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Absolute offset of the first partition entry.
    pub table_offset: usize,
    /// Length of the scanned window.
    pub table_len: usize,
    /// Type byte that marks the app partition.
    pub app_type: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            table_offset: PARTITION_TABLE_OFFSET,
            table_len: PARTITION_TABLE_LEN,
            app_type: APP_PARTITION_TYPE,
        }
    }
}

impl ScanConfig {
    /// End of the scanned window (exclusive).
    pub fn table_end(&self) -> usize {
        self.table_offset.saturating_add(self.table_len)
    }
}
