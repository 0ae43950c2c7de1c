#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use image::RgbImage;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

pub fn load_images(images: &[PathBuf]) -> Vec<(String, RgbImage)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    image.into_rgb8(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, RgbImage)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read img directory")
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

/// A smooth gradient with a different range in each channel.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 63 / (width + height).max(1)) as u8 + 64;
        image::Rgb([r, g, b])
    })
}

/// Uniformly random pixels from a fixed seed.
pub fn noise(width: u32, height: u32) -> RgbImage {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    RgbImage::from_fn(width, height, |_, _| image::Rgb(rng.gen()))
}

static SYNTHETIC_IMAGES: OnceLock<Vec<(String, RgbImage)>> = OnceLock::new();

pub fn synthetic_images() -> &'static [(String, RgbImage)] {
    SYNTHETIC_IMAGES.get_or_init(|| {
        vec![
            ("gradient_640x480".to_owned(), gradient(640, 480)),
            ("gradient_1920x1080".to_owned(), gradient(1920, 1080)),
            ("noise_640x480".to_owned(), noise(640, 480)),
            ("noise_1920x1080".to_owned(), noise(1920, 1080)),
        ]
    })
}

/// Images to benchmark: the contents of `BENCH_IMAGE_DIR` if set, otherwise synthetic images.
pub fn benchmark_images() -> &'static [(String, RgbImage)] {
    static IMAGES: OnceLock<Vec<(String, RgbImage)>> = OnceLock::new();
    match std::env::var_os("BENCH_IMAGE_DIR") {
        Some(dir) => IMAGES.get_or_init(|| load_image_dir(dir)),
        None => synthetic_images(),
    }
}
