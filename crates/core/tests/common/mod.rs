#![allow(dead_code)]

//! Byte-level builders for synthetic flash images.

pub const TABLE_OFFSET: usize = 0x8000;
pub const APP_OFFSET: u32 = 0x10000;

/// Field values for a synthetic app descriptor.
#[derive(Debug, Clone)]
pub struct DescFields {
    pub magic: u32,
    pub secure_version: u32,
    pub version: Vec<u8>,
    pub project_name: Vec<u8>,
    pub time: Vec<u8>,
    pub date: Vec<u8>,
    pub idf_version: Vec<u8>,
    pub elf_sha256: [u8; 32],
}

impl Default for DescFields {
    fn default() -> Self {
        let mut sha = [0u8; 32];
        for (i, b) in sha.iter_mut().enumerate() {
            *b = i as u8 * 7;
        }
        Self {
            magic: 0xABCD_5432,
            secure_version: 3,
            version: b"1.4.2".to_vec(),
            project_name: b"xiaozhi-pet".to_vec(),
            time: b"12:34:56".to_vec(),
            date: b"Oct 19 2026".to_vec(),
            idf_version: b"v5.4.1-dirty".to_vec(),
            elf_sha256: sha,
        }
    }
}

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// A 0xB0 byte app descriptor record.
pub fn descriptor(fields: &DescFields) -> Vec<u8> {
    let mut rec = vec![0u8; 0xB0];
    put(&mut rec, 0x00, &fields.magic.to_le_bytes());
    put(&mut rec, 0x04, &fields.secure_version.to_le_bytes());
    put(&mut rec, 0x10, &fields.version);
    put(&mut rec, 0x30, &fields.project_name);
    put(&mut rec, 0x50, &fields.time);
    put(&mut rec, 0x60, &fields.date);
    put(&mut rec, 0x70, &fields.idf_version);
    put(&mut rec, 0x90, &fields.elf_sha256);
    rec
}

/// An app image: 0x18 byte header, then `(load_addr, payload)` segments.
pub fn app_image(magic: u8, segments: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut img = vec![0u8; 0x18];
    img[0] = magic;
    img[1] = segments.len() as u8;
    img[2] = 0x02;
    img[3] = 0x20;
    put(&mut img, 4, &0x4037_5a1cu32.to_le_bytes());
    put(&mut img, 0x0C, &0x0009u16.to_le_bytes());
    for (addr, payload) in segments {
        img.extend_from_slice(&addr.to_le_bytes());
        img.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        img.extend_from_slice(payload);
    }
    img
}

/// A 32 byte partition table entry.
pub fn entry(ptype: u8, subtype: u8, offset: u32, size: u32, label: &[u8]) -> [u8; 32] {
    let mut e = [0u8; 32];
    e[0] = 0xAA;
    e[1] = 0x50;
    e[2] = ptype;
    e[3] = subtype;
    put(&mut e, 4, &offset.to_le_bytes());
    put(&mut e, 8, &size.to_le_bytes());
    put(&mut e, 12, label);
    e
}

/// A merged image with the given partition entries at 0x8000 and `app`
/// written at `app_offset`. Unused flash is 0xFF like an erased chip.
pub fn merged(entries: &[[u8; 32]], app_offset: u32, app: &[u8]) -> Vec<u8> {
    let start = app_offset as usize;
    let mut img = vec![0xFFu8; (start + app.len()).max(0xC000)];
    for (i, e) in entries.iter().enumerate() {
        put(&mut img, TABLE_OFFSET + i * 32, e);
    }
    put(&mut img, start, app);
    img
}

/// Standard nvs / phy / factory table.
pub fn standard_table(app_size: u32) -> Vec<[u8; 32]> {
    vec![
        entry(0x01, 0x02, 0x9000, 0x6000, b"nvs"),
        entry(0x01, 0x01, 0xF000, 0x1000, b"phy_init"),
        entry(0x00, 0x00, APP_OFFSET, app_size, b"factory"),
    ]
}

/// A complete image whose first segment is a descriptor plus `extra` bytes.
pub fn full_image(fields: &DescFields, extra: usize) -> Vec<u8> {
    let mut seg0 = descriptor(fields);
    seg0.extend(std::iter::repeat(0x5A).take(extra));
    let app = app_image(0xE9, &[(0x3C00_0020, seg0), (0x4037_0000, vec![0x11; 64])]);
    merged(&standard_table(0x10_0000), APP_OFFSET, &app)
}
