//! Fixed-width and length-encoded integers.
//!
//! All multi-byte integers on the MySQL wire are little-endian.

use bytes::BufMut;

/// Largest length that fits in a single prefix byte.
const LENENC_1_MAX: u64 = 250;
const LENENC_2_MARKER: u8 = 0xfc;
const LENENC_3_MARKER: u8 = 0xfd;
const LENENC_8_MARKER: u8 = 0xfe;

pub fn encode_u16(v: u16) -> [u8; 2] {
    v.to_le_bytes()
}

/// Low 24 bits of `v`, little-endian.
pub fn encode_u24(v: u32) -> [u8; 3] {
    let b = v.to_le_bytes();
    [b[0], b[1], b[2]]
}

pub fn encode_u32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

pub fn encode_u64(v: u64) -> [u8; 8] {
    v.to_le_bytes()
}

/// Append the low `width` bytes of `v` (1, 2, 3, 4 or 8), little-endian.
pub fn put_uint_le<B: BufMut + ?Sized>(buf: &mut B, v: u64, width: usize) {
    match width {
        1 => buf.put_u8(v as u8),
        2 => buf.put_slice(&encode_u16(v as u16)),
        3 => buf.put_slice(&encode_u24(v as u32)),
        4 => buf.put_slice(&encode_u32(v as u32)),
        8 => buf.put_slice(&encode_u64(v)),
        _ => unreachable!("no wire integer is {} bytes wide", width),
    }
}

/// Size of the length-encoded prefix for `n`.
pub fn lenenc_len(n: u64) -> usize {
    if n <= LENENC_1_MAX {
        1
    } else if n < 1 << 16 {
        3
    } else if n < 1 << 24 {
        4
    } else {
        9
    }
}

/// Write a length-encoded integer, returning the number of bytes written.
pub fn put_lenenc_int<B: BufMut + ?Sized>(buf: &mut B, n: u64) -> usize {
    if n <= LENENC_1_MAX {
        buf.put_u8(n as u8);
    } else if n < 1 << 16 {
        buf.put_u8(LENENC_2_MARKER);
        buf.put_slice(&encode_u16(n as u16));
    } else if n < 1 << 24 {
        buf.put_u8(LENENC_3_MARKER);
        buf.put_slice(&encode_u24(n as u32));
    } else {
        buf.put_u8(LENENC_8_MARKER);
        buf.put_slice(&encode_u64(n));
    }
    lenenc_len(n)
}

/// Write `data` prefixed with its length-encoded size.
pub fn put_lenenc_bytes<B: BufMut + ?Sized>(buf: &mut B, data: &[u8]) -> usize {
    let prefix = put_lenenc_int(buf, data.len() as u64);
    buf.put_slice(data);
    prefix + data.len()
}

/// Read a length-encoded integer, advancing `buf` past it.
///
/// Returns `None` on truncated input and on the `0xfb` (NULL) and `0xff`
/// (error packet) markers, which are not lengths.
pub fn read_lenenc_int(buf: &mut &[u8]) -> Option<u64> {
    let (&first, rest) = buf.split_first()?;
    let width = match first {
        LENENC_2_MARKER => 2,
        LENENC_3_MARKER => 3,
        LENENC_8_MARKER => 8,
        0xfb | 0xff => return None,
        n => {
            *buf = rest;
            return Some(n as u64);
        }
    };
    if rest.len() < width {
        return None;
    }
    let mut le = [0u8; 8];
    le[..width].copy_from_slice(&rest[..width]);
    *buf = &rest[width..];
    Some(u64::from_le_bytes(le))
}
