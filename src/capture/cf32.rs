use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use num_complex::Complex32;

/// Reads up to `max` little-endian `f32` (real, imag) pairs.
///
/// Returns an empty block at end of input. A trailing partial sample is dropped.
pub fn read_block<R: Read>(reader: &mut R, max: usize) -> io::Result<Vec<Complex32>> {
    let mut block = Vec::with_capacity(max);
    while block.len() < max {
        let re = match reader.read_f32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        let im = match reader.read_f32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        block.push(Complex32::new(re, im));
    }
    Ok(block)
}
