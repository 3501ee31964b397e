use std::io::{self, Write};

use serde::Serialize;

use crate::FileMetadata;
use bininfo_core::Inspection;

/// Everything printed for one image.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub file: FileMetadata,
    /// SHA-256 of the whole image file, uppercase hex.
    pub sha256: String,
}

/// Write the human-readable report to `out`.
pub fn write_text_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    out.write_all(render_text_report(report).as_bytes())
}

/// Render the human-readable report.
pub fn render_text_report(report: &Report) -> String {
    let ins = &report.inspection;
    let app = &ins.app_partition;
    let desc = &ins.descriptor;
    let mut out = String::new();

    out.push_str(&format!(
        "Found app partition: offset=0x{:08x}, size=0x{:08x}, label={}\n",
        app.offset, app.size, app.label
    ));
    for warning in &ins.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out.push_str("--- app_desc ---\n");
    out.push_str(&format!("project_name: {}\n", desc.project_name));
    out.push_str(&format!("version: {}\n", desc.version));
    out.push_str(&format!("compile_time: {}\n", desc.compile_timestamp()));
    out.push_str(&format!("idf_version: {}\n", desc.idf_version));
    out.push_str(&format!("elf_sha256: {}\n", desc.elf_sha256_hex()));
    out.push_str(&format!("secure_version: {}\n", desc.secure_version));
    out.push_str(&format!(
        "magic: 0x{:08x} ({})\n",
        desc.magic,
        if desc.magic_ok() { "ok" } else { "MISMATCH" }
    ));

    out.push_str("\n--- image ---\n");
    out.push_str(&format!("chip_id: 0x{:04x}\n", ins.header.chip_id));
    out.push_str(&format!("entry_addr: 0x{:08x}\n", ins.header.entry_addr));
    out.push_str(&format!("hash_appended: {}\n", ins.header.hash_appended));
    out.push_str(&format!("segments ({}):\n", ins.segments.len()));
    for seg in &ins.segments {
        out.push_str(&format!(
            "  [{}] load=0x{:08x} offset=0x{:06x} size=0x{:x}\n",
            seg.index, seg.load_addr, seg.data_offset, seg.size
        ));
    }

    out.push_str(&format!("\n--- partitions ({}) ---\n", ins.partitions.len()));
    for part in &ins.partitions {
        out.push_str(&format!(
            "  {:<16} {:<6} {:<10} offset=0x{:08x} size=0x{:08x}\n",
            part.label,
            part.type_name(),
            part.subtype_name(),
            part.offset,
            part.size
        ));
    }

    out.push_str("\n--- file metadata ---\n");
    out.push_str(&format!("path: {}\n", report.file.path));
    out.push_str(&format!("size: {}\n", report.file.size));
    out.push_str(&format!("mtime: {}\n", report.file.modified.as_deref().unwrap_or("(unknown)")));

    out.push_str(&format!("\nSHA256: {}\n", report.sha256));
    out
}
