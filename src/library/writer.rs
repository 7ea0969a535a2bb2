//! Image library writers.
//!
//! A writer takes a rendered image, persists it on its own thread and hands
//! back a [`SaveTicket`] straight away. The ticket resolves exactly once.

use crate::config::LibraryConfig;
use crate::core::error::{SaveError, SaveResult};
use crate::core::types::{ImageFormat, RenderedImage};
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Where and how a render was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub path: PathBuf,
    /// Encoded size on disk
    pub bytes: u64,
    pub format: ImageFormat,
}

/// Pending result of a save.
#[derive(Debug)]
pub struct SaveTicket {
    receiver: Receiver<SaveResult<SavedImage>>,
    /// Outcome already pulled off the channel by [`SaveTicket::ready`].
    pending: RefCell<Option<SaveResult<SavedImage>>>,
}

impl SaveTicket {
    fn new(receiver: Receiver<SaveResult<SavedImage>>) -> Self {
        Self {
            receiver,
            pending: RefCell::new(None),
        }
    }

    /// A ticket that is already resolved.
    pub fn resolved(outcome: SaveResult<SavedImage>) -> Self {
        let (sender, receiver) = bounded(1);
        // The receiver is held right here, so the send cannot fail.
        let _ = sender.send(outcome);
        Self::new(receiver)
    }

    /// Move a finished outcome into `pending`. A writer that went away
    /// without reporting counts as finished.
    fn poll(&self) -> bool {
        let mut pending = self.pending.borrow_mut();
        if pending.is_some() {
            return true;
        }
        match self.receiver.try_recv() {
            Ok(outcome) => *pending = Some(outcome),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => *pending = Some(Err(SaveError::WriterDisconnected)),
        }
        true
    }

    /// Whether the outcome is available without blocking.
    pub fn ready(&self) -> bool {
        self.poll()
    }

    /// Take the outcome if the writer has finished.
    pub fn try_outcome(&self) -> Option<SaveResult<SavedImage>> {
        self.poll();
        self.pending.borrow_mut().take()
    }

    /// Block until the writer reports.
    pub fn wait(self) -> SaveResult<SavedImage> {
        if let Some(outcome) = self.pending.into_inner() {
            return outcome;
        }
        self.receiver
            .recv()
            .unwrap_or(Err(SaveError::WriterDisconnected))
    }

    /// Block for at most `timeout`. `None` means the writer is still busy.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<SaveResult<SavedImage>> {
        if let Some(outcome) = self.pending.borrow_mut().take() {
            return Some(outcome);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(SaveError::WriterDisconnected)),
        }
    }
}

/// Destination for finished photos.
pub trait ImageLibraryWriter {
    /// Start persisting `image`. Never blocks on the write itself.
    fn write(&self, image: &RenderedImage) -> SaveTicket;
}

/// Log the outcome of a save the way the editor reports it.
pub fn report_outcome(outcome: &SaveResult<SavedImage>) {
    match outcome {
        Ok(saved) => log::info!(
            "Saved {} ({} bytes, {})",
            saved.path.display(),
            saved.bytes,
            saved.format
        ),
        Err(e) if e.is_transient() => log::warn!("Save failed, retrying may help: {}", e),
        Err(e) => log::warn!("Save failed: {}", e),
    }
}

/// Library backed by a directory on disk.
///
/// Files are named `{prefix}_{NNNN}.{ext}`, numbered from 1 and never
/// overwritten.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    config: LibraryConfig,
}

impl DirectoryLibrary {
    pub fn new(config: LibraryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }
}

impl ImageLibraryWriter for DirectoryLibrary {
    fn write(&self, image: &RenderedImage) -> SaveTicket {
        let (sender, receiver) = bounded(1);
        let pixels = image.shared_pixels();
        let config = self.config.clone();

        thread::spawn(move || {
            let outcome = store(&pixels, &config);
            if sender.send(outcome).is_err() {
                log::debug!("Save ticket dropped before the writer finished");
            }
        });

        SaveTicket::new(receiver)
    }
}

fn store(pixels: &RgbaImage, config: &LibraryConfig) -> SaveResult<SavedImage> {
    let format = config.format;
    let image_format = format
        .to_image_format()
        .ok_or(SaveError::UnsupportedFormat(format))?;

    fs::create_dir_all(&config.directory).map_err(|source| SaveError::Io {
        path: config.directory.clone(),
        source,
    })?;

    let (path, file) = create_unique(&config.directory, &config.file_prefix, format)?;
    let mut writer = BufWriter::new(file);

    let encoded = match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut writer, config.quality).encode_image(&rgb)
        }
        _ => pixels.write_to(&mut writer, image_format),
    };

    if let Err(source) = encoded {
        // Leave no half-written file behind.
        drop(writer);
        let _ = fs::remove_file(&path);
        return Err(SaveError::Encode { format, source });
    }

    writer.flush().map_err(|source| SaveError::Io {
        path: path.clone(),
        source,
    })?;
    drop(writer);

    let bytes = fs::metadata(&path)
        .map(|m| m.len())
        .map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;

    Ok(SavedImage { path, bytes, format })
}

fn create_unique(dir: &Path, prefix: &str, format: ImageFormat) -> SaveResult<(PathBuf, File)> {
    let mut index: u32 = 1;
    loop {
        let path = dir.join(format!("{}_{:04}.{}", prefix, index, format.extension()));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => index += 1,
            Err(source) => return Err(SaveError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterKind;
    use crate::core::param::Intensity;
    use crate::core::types::SourceImage;
    use crate::pipeline::render;
    use image::Rgba;
    use tempfile::TempDir;

    fn rendered() -> RenderedImage {
        let source = SourceImage::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            6,
            Rgba([200, 40, 40, 255]),
        )));
        render(&source, FilterKind::SepiaTone, Intensity::new(0.5)).unwrap()
    }

    fn library(dir: &Path, format: ImageFormat) -> DirectoryLibrary {
        DirectoryLibrary::new(LibraryConfig {
            directory: dir.to_path_buf(),
            format,
            quality: 90,
            file_prefix: "shot".to_string(),
        })
    }

    #[test]
    fn test_png_save_roundtrips_pixels() {
        let dir = TempDir::new().unwrap();
        let image = rendered();
        let saved = library(dir.path(), ImageFormat::Png).write(&image).wait().unwrap();

        assert_eq!(saved.path, dir.path().join("shot_0001.png"));
        assert!(saved.bytes > 0);
        let reloaded = image::open(&saved.path).unwrap().to_rgba8();
        assert_eq!(&reloaded, image.pixels());
    }

    #[test]
    fn test_saves_never_overwrite() {
        let dir = TempDir::new().unwrap();
        let lib = library(dir.path(), ImageFormat::Png);
        let image = rendered();

        let first = lib.write(&image).wait().unwrap();
        let second = lib.write(&image).wait().unwrap();
        assert_ne!(first.path, second.path);
        assert_eq!(second.path, dir.path().join("shot_0002.png"));
    }

    #[test]
    fn test_jpeg_save() {
        let dir = TempDir::new().unwrap();
        let saved = library(dir.path(), ImageFormat::Jpeg)
            .write(&rendered())
            .wait()
            .unwrap();
        assert_eq!(saved.format, ImageFormat::Jpeg);
        assert_eq!(image::open(&saved.path).unwrap().to_rgb8().dimensions(), (8, 6));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let saved = library(&nested, ImageFormat::Bmp).write(&rendered()).wait().unwrap();
        assert!(saved.path.starts_with(&nested));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = TempDir::new().unwrap();
        let outcome = library(dir.path(), ImageFormat::Unknown).write(&rendered()).wait();
        assert!(matches!(outcome, Err(SaveError::UnsupportedFormat(ImageFormat::Unknown))));
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let outcome = library(&blocker, ImageFormat::Png).write(&rendered()).wait();
        assert!(matches!(outcome, Err(SaveError::Io { .. })));
    }

    #[test]
    fn test_resolved_ticket() {
        let ticket = SaveTicket::resolved(Err(SaveError::NothingRendered));
        assert!(ticket.ready());
        assert!(matches!(ticket.try_outcome(), Some(Err(SaveError::NothingRendered))));
    }

    #[test]
    fn test_vanished_writer_is_ready() {
        let (sender, receiver) = bounded::<SaveResult<SavedImage>>(1);
        drop(sender);
        let ticket = SaveTicket::new(receiver);

        assert!(ticket.ready());
        assert!(matches!(ticket.try_outcome(), Some(Err(SaveError::WriterDisconnected))));
    }

    #[test]
    fn test_ready_keeps_the_outcome() {
        let dir = TempDir::new().unwrap();
        let ticket = library(dir.path(), ImageFormat::Png).write(&rendered());
        while !ticket.ready() {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(ticket.ready());
        let saved = ticket.wait().unwrap();
        assert_eq!(saved.path, dir.path().join("shot_0001.png"));
    }

    #[test]
    fn test_wait_timeout_eventually_resolves() {
        let dir = TempDir::new().unwrap();
        let ticket = library(dir.path(), ImageFormat::Png).write(&rendered());
        let outcome = ticket.wait_timeout(Duration::from_secs(30));
        assert!(matches!(outcome, Some(Ok(_))));
    }
}
