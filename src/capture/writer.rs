use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Utc};
use num_complex::Complex32;

use crate::capture::error::CaptureError;
use crate::capture::path::capture_path;
use crate::config::DownlinkConfig;

/// Bytes per stored sample: one `i16` imaginary, one `i16` real.
pub const BYTES_PER_SAMPLE: u64 = 4;

/// Streams complex samples to a headerless file of little-endian
/// `(imag, real)` `i16` pairs.
///
/// Frequency and bandwidth are kept as metadata only; nothing but samples
/// reaches the file. Call [`IqWriter::stop`] to flush, dropping the writer
/// only flushes on a best-effort basis.
pub struct IqWriter {
    frequency: u64,
    bandwidth: u64,
    path: PathBuf,
    out: Option<BufWriter<File>>,
    samples_written: u64,
}

impl IqWriter {
    pub fn create(
        frequency: u64,
        bandwidth: u64,
        path: impl Into<PathBuf>,
    ) -> Result<Self, CaptureError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| CaptureError::Open {
                path: path.clone(),
                source,
            })?;

        log::debug!(
            "Opened capture file {} ({} Hz, {} Hz wide)",
            path.display(),
            frequency,
            bandwidth
        );

        Ok(Self {
            frequency,
            bandwidth,
            path,
            out: Some(BufWriter::new(file)),
            samples_written: 0,
        })
    }

    /// Opens a capture for `downlink` under `data_directory`, creating the
    /// directory when needed.
    pub fn for_downlink(
        data_directory: &Path,
        norad: u32,
        downlink: &DownlinkConfig,
        start: DateTime<Utc>,
    ) -> Result<Self, CaptureError> {
        fs::create_dir_all(data_directory).map_err(|source| CaptureError::Open {
            path: data_directory.to_path_buf(),
            source,
        })?;
        let path = capture_path(data_directory, norad, &downlink.name, start);
        Self::create(downlink.frequency, downlink.bandwidth, path)
    }

    /// Appends `samples`. Samples written before an I/O failure stay on disk.
    pub fn process(&mut self, samples: &[Complex32]) -> Result<(), CaptureError> {
        let out = self.out.as_mut().ok_or(CaptureError::Stopped)?;
        write_samples(out, samples, &mut self.samples_written)?;
        Ok(())
    }

    /// Flushes and closes the file. Later calls are no-ops.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
            log::debug!(
                "Closed capture file {} after {} samples",
                self.path.display(),
                self.samples_written
            );
        }
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.out.is_none()
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn bandwidth(&self) -> u64 {
        self.bandwidth
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }
}

/// Each sample goes out as one 4-byte write; `written` counts whole samples only.
fn write_samples<W: Write>(
    out: &mut W,
    samples: &[Complex32],
    written: &mut u64,
) -> io::Result<()> {
    for sample in samples {
        out.write_all(&encode(sample))?;
        *written += 1;
    }
    Ok(())
}

fn encode(sample: &Complex32) -> [u8; BYTES_PER_SAMPLE as usize] {
    let mut buf = [0u8; BYTES_PER_SAMPLE as usize];
    LittleEndian::write_i16(&mut buf[..2], narrow(sample.im));
    LittleEndian::write_i16(&mut buf[2..], narrow(sample.re));
    buf
}

/// Truncates toward zero, then keeps the low 16 bits: out-of-range values
/// wrap instead of saturating.
fn narrow(value: f32) -> i16 {
    value as i32 as i16
}
