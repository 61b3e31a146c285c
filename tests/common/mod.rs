#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// An uncompressed 24-bit BMP of the given size; enough for dimension sniffing.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 24]);

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// A small Flutter skeleton, including build artifacts that must not be exported.
pub fn write_skeleton(root: &Path) {
    let files = [
        ("pubspec.yaml", "name: generated_app\ndependencies:\n  url_launcher: ^6.2.0\n"),
        ("lib/main.dart", "// replaced on export\n"),
        ("android/app/build.gradle", "android {}\n"),
        ("android/.gradle/8.0/cache.bin", "cache"),
        (".dart_tool/package_config.json", "{}"),
        (".idea/workspace.xml", "<project/>"),
        ("build/app/outputs/app.apk", "apk"),
    ];
    for (path, contents) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().expect("fixture path has a parent"))
            .expect("create skeleton dir");
        fs::write(path, contents).expect("write skeleton file");
    }
}

pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    archive.file_names().map(str::to_string).collect()
}

pub fn zip_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    let mut contents = String::new();
    archive
        .by_name(name)
        .expect("entry exists")
        .read_to_string(&mut contents)
        .expect("read entry");
    contents
}
