/**********************************************
  > File Name		: utils.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Thu 11 Mar 2021 03:54:41 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Utils functions for global usage.
 *
 * All file accesses go through read_at/write_at with an explicit offset,
 * so no operation depends on a file cursor left by a previous one.
 */

use std::fs::File;
use std::os::unix::fs::FileExt;

use crate::errors::{Error, Result};

pub const OFFSET_SIZE: usize = 4;

//fill the whole buffer from offset, a short read is an error.
pub fn read_exact_at(fp: &File, buf: &mut [u8], offset: u64) -> Result<()> {
    let mut done = 0;
    while done < buf.len() {
        let n = fp.read_at(&mut buf[done..], offset + done as u64)?;
        if n == 0 {
            return Err(Error::IncompleteRead {
                offset,
                expected: buf.len(),
                actual: done,
            });
        }
        done += n;
    }
    Ok(())
}

pub fn write_all_at(fp: &File, buf: &[u8], offset: u64) -> Result<()> {
    let mut done = 0;
    while done < buf.len() {
        let n = fp.write_at(&buf[done..], offset + done as u64)?;
        if n == 0 {
            return Err(Error::IncompleteWrite {
                offset,
                expected: buf.len(),
                actual: done,
            });
        }
        done += n;
    }
    Ok(())
}

pub fn read_u32_at(fp: &File, offset: u64) -> Result<u32> {
    let mut buf = [0u8; OFFSET_SIZE];
    read_exact_at(fp, &mut buf, offset)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn write_u32_at(fp: &File, value: u32, offset: u64) -> Result<()> {
    write_all_at(fp, &value.to_le_bytes(), offset)
}

/*
 * Little endian unsigned integer of an arbitrary width (at most 8 bytes).
 * Bits that do not fit in the width are dropped.
 */
pub fn encode_uint(value: u64, width: usize) -> Vec<u8> {
    value.to_le_bytes()[..width.min(8)].to_vec()
}

pub fn decode_uint(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .rev()
        .fold(0u64, |acc, b| (acc << 8) | (*b as u64))
}

pub fn get_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_width() {
        assert_eq!(encode_uint(0x0102, 2), vec![0x02, 0x01]);
        assert_eq!(encode_uint(0x010203, 2), vec![0x03, 0x02]);
        assert_eq!(decode_uint(&[0x02, 0x01]), 0x0102);
        assert_eq!(decode_uint(&encode_uint(512, 3)), 512);
    }

    #[test]
    fn short_read_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let fp = File::open(&path).unwrap();

        let mut buf = [0u8; 4];
        match read_exact_at(&fp, &mut buf, 0) {
            Err(Error::IncompleteRead { expected, actual, .. }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
