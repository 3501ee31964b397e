//! The full decoding pipeline: partition table, app image, app descriptor.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::decoded::DecodeWarning;
use crate::descriptor::{self, AppDescriptor};
use crate::error::{DecodeError, DecodeResult};
use crate::image::{self, ImageHeader};
use crate::partition::{self, PartitionEntry};

/// Where a segment sits inside the app partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentInfo {
    pub index: usize,
    pub load_addr: u32,
    pub data_offset: usize,
    pub size: usize,
}

/// Everything decoded from one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub app_partition: PartitionEntry,
    /// Every entry found in the partition table window.
    pub partitions: Vec<PartitionEntry>,
    pub header: ImageHeader,
    pub segments: Vec<SegmentInfo>,
    /// Offset inside the app partition just past the last segment.
    pub segments_end: usize,
    pub descriptor: AppDescriptor,
    pub warnings: Vec<DecodeWarning>,
}

/// Run the whole pipeline over a merged flash image.
///
/// Stops at the first structural failure; soft anomalies from every stage are
/// collected into [`Inspection::warnings`] in the order they were found, and
/// each is logged at WARN.
pub fn inspect(flash: &[u8], config: &ScanConfig) -> DecodeResult<Inspection> {
    let mut warnings = Vec::new();

    let app_partition = partition::scan(flash, config)?.drain_into(&mut warnings);
    let partitions = partition::entries(flash, config);
    let app = app_partition.contents(flash)?.drain_into(&mut warnings);
    debug!(len = app.len(), "app data");

    let framed = image::frame(app)?.drain_into(&mut warnings);
    let segments = framed
        .segments
        .iter()
        .enumerate()
        .map(|(index, seg)| SegmentInfo {
            index,
            load_addr: seg.load_addr,
            data_offset: seg.data_offset,
            size: seg.payload.len(),
        })
        .collect();

    let first = framed.segments.first().ok_or(DecodeError::NoSegments)?;
    let descriptor = descriptor::decode(first.payload)?.drain_into(&mut warnings);

    for warning in &warnings {
        warn!("{warning}");
    }

    Ok(Inspection {
        app_partition,
        partitions,
        header: framed.header,
        segments,
        segments_end: framed.end_offset,
        descriptor,
        warnings,
    })
}
