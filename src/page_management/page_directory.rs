/**********************************************
  > File Name		: page_directory.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Sat 22 May 2021 04:12:09 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Page directory.
 *
 * Data pages are not laid out at predictable offsets, they are appended
 * at the end of the file whenever they are allocated, interleaved with
 * directory pages. So we need directory pages to find them.
 *
 * Directory page layout:
 *     page header | next directory offset (4 bytes) | entries
 *
 * Entry layout:
 *     data page offset (4 bytes) | free space indicator
 *
 * The free space indicator is as narrow as possible while still able
 * to count up to page_size * 8, so the entry size and thus the number
 * of entries per directory page both depend on the page size.
 *
 * The first directory page sits right after the file header. When it
 * is exhausted a new one is appended at the end of the file and linked
 * from its predecessor. A next offset of 0 ends the chain, and so does
 * a data page offset of 0 mean the entry is unused.
 *
 * Logical page number n lives in directory (n-1) / entries_per_dir, at
 * entry (n-1) % entries_per_dir. entry_offset() is the only place that
 * walks the chain, both allocation and page lookup go through it.
 */

use std::fs::File;

use log::{debug, info};

use super::page::{Page, PageHeader, PAGE_HEADER_SIZE};
use crate::ensure_arg;
use crate::ensure_format;
use crate::errors::{Error, Result};
use crate::utils::{self, OFFSET_SIZE};

#[derive(Debug, Copy, Clone)]
pub struct PageDirectory {
    page_size: usize,
    first_dir: u64,
    free_space_size: usize,
    entry_size: usize,
    entries_per_dir: usize,
}

impl PageDirectory {
    pub fn new(page_size: usize, first_dir: u64) -> Result<Self> {
        ensure_arg!(page_size > 0, "page size must be greater than zero");
        let free_space_size = Self::calc_free_space_size(page_size);
        let entry_size = free_space_size + OFFSET_SIZE;
        ensure_arg!(
            page_size >= OFFSET_SIZE + entry_size,
            "page size {} cannot hold a directory entry of {} bytes",
            page_size,
            entry_size
        );
        Ok(Self {
            page_size,
            first_dir,
            free_space_size,
            entry_size,
            entries_per_dir: (page_size - OFFSET_SIZE) / entry_size,
        })
    }

    //ceil(log2(page_size * 8) / 8) bytes.
    pub fn calc_free_space_size(page_size: usize) -> usize {
        let max = (page_size as u64).saturating_mul(8).max(1);
        let bits = max.next_power_of_two().trailing_zeros() as usize;
        ((bits + 7) / 8).max(1)
    }

    pub fn free_space_size(&self) -> usize {
        self.free_space_size
    }

    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    pub fn entries_per_dir(&self) -> usize {
        self.entries_per_dir
    }

    pub fn first_dir(&self) -> u64 {
        self.first_dir
    }

    //an empty directory page: no next directory, no entries.
    pub fn new_dir_page(&self) -> Vec<u8> {
        let header = PageHeader::new(self.page_size as u32, self.entry_size as u32);
        let mut buf = Vec::with_capacity(PAGE_HEADER_SIZE + self.page_size);
        buf.extend_from_slice(&header.to_bytes());
        buf.resize(PAGE_HEADER_SIZE + self.page_size, 0);
        buf
    }

    /*
     * Find the file position of the directory entry of page_num.
     *
     * If grow is set, directory pages missing on the way are appended
     * at the end of the file and linked into the chain. Otherwise a
     * missing directory page means the page was never allocated.
     */
    fn entry_offset(&self, fp: &File, page_num: u32, grow: bool) -> Result<u64> {
        if page_num == 0 {
            return Err(Error::PageNotFound(page_num));
        }
        let index = (page_num - 1) as usize;
        let nth_dir = index / self.entries_per_dir;
        let order_in_dir = index % self.entries_per_dir;

        let mut dir = self.first_dir;
        for i in 0..nth_dir {
            let next_at = dir + PAGE_HEADER_SIZE as u64;
            let mut next = utils::read_u32_at(fp, next_at)? as u64;
            if next == 0 {
                if !grow {
                    debug!("directory chain ends after {} pages, page {} not found", i + 1, page_num);
                    return Err(Error::PageNotFound(page_num));
                }
                next = self.alloc_at_end(fp, &self.new_dir_page())? as u64;
                utils::write_u32_at(fp, next as u32, next_at)?;
                info!("directory page {} appended at offset {}", i + 2, next);
            }
            dir = next;
        }

        Ok(dir + (PAGE_HEADER_SIZE + OFFSET_SIZE + order_in_dir * self.entry_size) as u64)
    }

    //returns the data page offset and the free space stored in the entry.
    fn read_entry(&self, fp: &File, entry: u64) -> Result<(u32, u64)> {
        let mut buf = vec![0u8; self.entry_size];
        utils::read_exact_at(fp, &mut buf, entry)?;
        Ok((utils::get_u32(&buf, 0), utils::decode_uint(&buf[OFFSET_SIZE..])))
    }

    /*
     * Append bytes at the end of the file, returning where they start.
     * Offsets are stored in 4 bytes, so the file cannot grow past that.
     */
    fn alloc_at_end(&self, fp: &File, bytes: &[u8]) -> Result<u32> {
        let offset = fp.metadata()?.len();
        ensure_arg!(
            offset + bytes.len() as u64 <= u32::MAX as u64,
            "heap file cannot grow past {} bytes",
            u32::MAX
        );
        utils::write_all_at(fp, bytes, offset)?;
        Ok(offset as u32)
    }

    pub fn locate(&self, fp: &File, page_num: u32) -> Result<u64> {
        let entry = self.entry_offset(fp, page_num, false)?;
        match self.read_entry(fp, entry)? {
            (0, _) => Err(Error::PageNotFound(page_num)),
            (offset, _) => Ok(offset as u64),
        }
    }

    /*
     * Allocate data page page_num at the end of the file and record it
     * in the directory, growing the chain when page_num falls past the
     * last directory page.
     */
    pub fn append(&self, fp: &File, page_num: u32, page: &Page) -> Result<u64> {
        let entry = self.entry_offset(fp, page_num, true)?;
        let (existing, _) = self.read_entry(fp, entry)?;
        ensure_format!(
            existing == 0,
            "directory entry of new page {} already points at offset {}",
            page_num,
            existing
        );

        let offset = self.alloc_at_end(fp, &page.to_bytes())?;
        let mut buf = Vec::with_capacity(self.entry_size);
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend(utils::encode_uint(page.free_slots() as u64, self.free_space_size));
        utils::write_all_at(fp, &buf, entry)?;

        debug!("page {} allocated at offset {}", page_num, offset);
        Ok(offset as u64)
    }

    pub fn free_space(&self, fp: &File, page_num: u32) -> Result<u64> {
        let entry = self.entry_offset(fp, page_num, false)?;
        match self.read_entry(fp, entry)? {
            (0, _) => Err(Error::PageNotFound(page_num)),
            (_, free) => Ok(free),
        }
    }

    pub fn set_free_space(&self, fp: &File, page_num: u32, free: u64) -> Result<()> {
        let entry = self.entry_offset(fp, page_num, false)?;
        if let (0, _) = self.read_entry(fp, entry)? {
            return Err(Error::PageNotFound(page_num));
        }
        let buf = utils::encode_uint(free, self.free_space_size);
        utils::write_all_at(fp, &buf, entry + OFFSET_SIZE as u64)
    }

    /*
     * Number of directory pages in the chain. The file cannot hold more
     * directory pages than its length allows, a longer walk means the
     * chain loops.
     */
    pub fn chain_len(&self, fp: &File) -> Result<usize> {
        let max_len = fp.metadata()?.len() / (PAGE_HEADER_SIZE + self.page_size) as u64;
        let mut len = 1;
        let mut dir = self.first_dir;
        loop {
            let next = utils::read_u32_at(fp, dir + PAGE_HEADER_SIZE as u64)? as u64;
            if next == 0 {
                return Ok(len);
            }
            ensure_format!(
                (len as u64) < max_len,
                "directory chain loops, more than {} directory pages after offset {}",
                max_len,
                dir
            );
            dir = next;
            len += 1;
        }
    }
}
