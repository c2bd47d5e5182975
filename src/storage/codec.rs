//! Stream factories for plain and gzip-compressed files.
//!
//! Reading picks the codec from the file name, writing from the requested
//! compression level.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

pub const GZIP_SUFFIX: &str = ".gz";

/// A writer that must be finished explicitly so trailing bytes and errors
/// are not lost on drop.
pub trait FinishWrite: Write {
    fn finish(self: Box<Self>) -> io::Result<()>;
}

impl FinishWrite for BufWriter<File> {
    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.flush()
    }
}

impl FinishWrite for GzEncoder<BufWriter<File>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut inner = GzEncoder::finish(*self)?;
        inner.flush()
    }
}

pub trait StreamCodec {
    fn name(&self) -> &'static str;

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead>>;

    fn create(&self, path: &Path) -> io::Result<Box<dyn FinishWrite>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl StreamCodec for PlainCodec {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GzipCodec {
    level: u32,
}

impl GzipCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self::new(Compression::default().level())
    }
}

impl StreamCodec for GzipCodec {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead>> {
        let decoder = MultiGzDecoder::new(File::open(path)?);
        Ok(Box::new(BufReader::new(decoder)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn FinishWrite>> {
        let file = BufWriter::new(File::create(path)?);
        Ok(Box::new(GzEncoder::new(file, Compression::new(self.level))))
    }
}

pub fn is_compressed_path(path: &Path) -> bool {
    path.to_str().is_some_and(|p| p.ends_with(GZIP_SUFFIX))
}

pub fn codec_for_path(path: &Path) -> Box<dyn StreamCodec> {
    if is_compressed_path(path) {
        Box::new(GzipCodec::default())
    } else {
        Box::new(PlainCodec)
    }
}

/// Level 0 writes plain text, 1-9 gzip at that level.
pub fn codec_for_level(level: u32) -> Box<dyn StreamCodec> {
    if level > 0 {
        Box::new(GzipCodec::new(level))
    } else {
        Box::new(PlainCodec)
    }
}
