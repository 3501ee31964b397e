#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const APP_OFFSET: usize = 0x10000;

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// A merged image with one factory app whose descriptor carries the given
/// magic and fixed provenance strings.
pub fn merged_image(desc_magic: u32, seg0_len: usize) -> Vec<u8> {
    let mut seg0 = vec![0u8; seg0_len];
    let mut desc = vec![0u8; 0xB0];
    put(&mut desc, 0x00, &desc_magic.to_le_bytes());
    put(&mut desc, 0x10, b"2.0.1");
    put(&mut desc, 0x30, b"pet-firmware");
    put(&mut desc, 0x50, b"08:15:00");
    put(&mut desc, 0x60, b"Jan  2 2026");
    put(&mut desc, 0x70, b"v5.3.2");
    put(&mut desc, 0x90, &[0xC0; 32]);
    let n = seg0_len.min(desc.len());
    seg0[..n].copy_from_slice(&desc[..n]);

    let mut app = vec![0u8; 0x18];
    app[0] = 0xE9;
    app[1] = 1;
    app.extend_from_slice(&0x3C00_0020u32.to_le_bytes());
    app.extend_from_slice(&(seg0.len() as u32).to_le_bytes());
    app.extend_from_slice(&seg0);

    let mut img = vec![0xFFu8; APP_OFFSET + app.len()];
    let mut entry = [0u8; 32];
    entry[0] = 0xAA;
    entry[1] = 0x50;
    put(&mut entry, 4, &(APP_OFFSET as u32).to_le_bytes());
    put(&mut entry, 8, &(app.len() as u32).to_le_bytes());
    put(&mut entry, 12, b"factory");
    put(&mut img, 0x8000, &entry);
    put(&mut img, APP_OFFSET, &app);
    img
}

pub fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write image");
    path
}
