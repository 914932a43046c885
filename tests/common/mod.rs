#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

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
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Source folders for one run: flat `images/` and `labels/` plus `classes.txt`.
pub struct SourceTree {
    pub root: PathBuf,
    pub images: PathBuf,
    pub labels: PathBuf,
    pub class_file: PathBuf,
}

/// Write `count` BMP images `img_000.bmp`.. with matching label files.
pub fn write_source_tree(root: &Path, count: usize, classes: &[&str]) -> SourceTree {
    let images = root.join("images");
    let labels = root.join("labels");
    fs::create_dir_all(&images).expect("create images dir");
    fs::create_dir_all(&labels).expect("create labels dir");

    for i in 0..count {
        write_bmp(&images.join(format!("img_{i:03}.bmp")), 4 + i as u32, 4);
        fs::write(
            labels.join(format!("img_{i:03}.txt")),
            format!("{} 0.5 0.5 0.25 0.25\n", i % classes.len().max(1)),
        )
        .expect("write label file");
    }

    let class_file = root.join("classes.txt");
    let mut class_text = classes.join("\n");
    class_text.push('\n');
    fs::write(&class_file, class_text).expect("write classes file");

    SourceTree {
        root: root.to_path_buf(),
        images,
        labels,
        class_file,
    }
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Stems of the files directly inside `dir`.
pub fn stems(dir: &Path) -> Vec<String> {
    file_names(dir)
        .into_iter()
        .map(|name| {
            Path::new(&name)
                .file_stem()
                .expect("file stem")
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
