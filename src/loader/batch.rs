//! The batch loading pipeline: scan, sort, slice, decode.

use crate::core::tensor::{ImageTensor, MaskTensor};
use crate::loader::decode::{absolute, decode_record, ImageRecord};
use crate::loader::options::BatchLoadOptions;
use crate::loader::scan::{report, scan_directory, EmptyReason};
use crate::loader::sort::{slice_from, sort_entries};
use log::{debug, info, warn};

/// Parallel sequences produced by one load.
///
/// All four sequences always have the same length, equal to [`count`](Self::count).
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    images: Vec<ImageTensor>,
    masks: Vec<MaskTensor>,
    file_paths: Vec<String>,
    file_names: Vec<String>,
}

impl BatchResult {
    /// The empty batch returned for every early exit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append one record to all four sequences.
    pub fn push(&mut self, record: ImageRecord) {
        self.images.push(record.image);
        self.masks.push(record.mask);
        self.file_paths.push(record.file_path);
        self.file_names.push(record.file_name);
    }

    /// Number of images in the batch.
    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// Whether no image was loaded.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Decoded image tensors.
    pub fn images(&self) -> &[ImageTensor] {
        &self.images
    }

    /// Mask tensors, one per image.
    pub fn masks(&self) -> &[MaskTensor] {
        &self.masks
    }

    /// Absolute source paths.
    pub fn file_paths(&self) -> &[String] {
        &self.file_paths
    }

    /// Base names without extension.
    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    /// Iterate the batch one record at a time.
    pub fn records(&self) -> impl Iterator<Item = ImageRecord> + '_ {
        self.images
            .iter()
            .zip(&self.masks)
            .zip(&self.file_paths)
            .zip(&self.file_names)
            .map(|(((image, mask), file_path), file_name)| ImageRecord {
                image: image.clone(),
                mask: mask.clone(),
                file_path: file_path.clone(),
                file_name: file_name.clone(),
            })
    }

    /// Split into `(images, masks, file_paths, file_names)`.
    pub fn into_parts(self) -> (Vec<ImageTensor>, Vec<MaskTensor>, Vec<String>, Vec<String>) {
        (self.images, self.masks, self.file_paths, self.file_names)
    }
}

/// Load a batch of images from `options.directory`.
///
/// Never fails: missing directories, empty listings and undecodable files
/// are logged and yield fewer (or no) images.
pub fn load_batch(options: &BatchLoadOptions) -> BatchResult {
    load_batch_with_progress(options, |_, _| {})
}

/// Like [`load_batch`], calling `progress(done, total)` after each candidate.
pub fn load_batch_with_progress<F>(options: &BatchLoadOptions, mut progress: F) -> BatchResult
where
    F: FnMut(usize, usize),
{
    let directory = absolute(&options.directory);

    let names = match scan_directory(&directory) {
        Ok(names) => names,
        Err(_) => return BatchResult::empty(),
    };

    let sorted = sort_entries(names, &directory, options.sort_method);
    let candidates = slice_from(sorted, options.start_index);
    let total = candidates.len();
    let cap = options.load_cap();
    debug!(
        "{} candidates after sorting by '{}' and slicing from {}",
        total, options.sort_method, options.start_index
    );

    let mut batch = BatchResult::empty();
    for (done, name) in candidates.into_iter().enumerate() {
        if cap.is_some_and(|cap| batch.count() >= cap) {
            debug!("Load cap of {} reached", batch.count());
            break;
        }

        let path = directory.join(&name);
        if path.is_dir() {
            debug!("Skipping directory '{}'", path.display());
        } else {
            match decode_record(&path) {
                Ok(record) => batch.push(record),
                Err(err) => warn!("Skipping file: {}", err),
            }
        }
        progress(done + 1, total);
    }

    if batch.is_empty() {
        report(&directory, EmptyReason::NothingDecoded);
        return batch;
    }

    info!(
        "Loaded {} image(s) from '{}'",
        batch.count(),
        directory.display()
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32) {
        RgbImage::from_pixel(width, 2, Rgb([1, 2, 3]))
            .save_with_format(dir.path().join(name), image::ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_push_keeps_sequences_aligned() {
        let mut batch = BatchResult::empty();
        assert!(batch.is_empty());
        batch.push(ImageRecord {
            image: ImageTensor::zeros(2, 3),
            mask: MaskTensor::zeros(2, 3),
            file_path: "/tmp/a.png".to_string(),
            file_name: "a".to_string(),
        });

        assert_eq!(batch.count(), 1);
        assert_eq!(batch.masks().len(), 1);
        assert_eq!(batch.file_paths(), ["/tmp/a.png".to_string()]);
        let records: Vec<_> = batch.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "a");
    }

    #[test]
    fn test_progress_reports_every_candidate() {
        let dir = TempDir::new().unwrap();
        write_png(&dir, "a.png", 1);
        write_png(&dir, "b.png", 2);

        let mut calls = Vec::new();
        let options = BatchLoadOptions::new(dir.path());
        let batch = load_batch_with_progress(&options, |done, total| calls.push((done, total)));

        assert_eq!(batch.count(), 2);
        assert_eq!(calls, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_cap_stops_early() {
        let dir = TempDir::new().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_png(&dir, name, 1);
        }

        let mut calls = 0;
        let options = BatchLoadOptions::new(dir.path()).with_load_cap(1);
        let batch = load_batch_with_progress(&options, |_, _| calls += 1);
        assert_eq!(batch.count(), 1);
        assert_eq!(calls, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_directory_yields_absolute_paths() {
        let dir = TempDir::new().unwrap();
        write_png(&dir, "rel.png", 1);

        // Climb from the working directory to the root, then descend.
        let cwd = std::env::current_dir().unwrap();
        let mut relative = std::path::PathBuf::new();
        for _ in 1..cwd.components().count() {
            relative.push("..");
        }
        relative.push(dir.path().strip_prefix("/").unwrap());
        assert!(relative.is_relative());

        let batch = load_batch(&BatchLoadOptions::new(relative));
        assert_eq!(batch.count(), 1);
        assert!(std::path::Path::new(&batch.file_paths()[0]).is_absolute());
    }
}
