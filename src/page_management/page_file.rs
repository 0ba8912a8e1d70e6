/**********************************************
  > File Name		: page_file.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Mon 01 Mar 2021 07:31:48 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Introduction:
 *
 * The page_file component provides facilities for higher-level
 * components to perform file I/O in terms of pages.
 *
 * A heap file is a single file:
 *     file header | directory page | pages appended over time ...
 *
 * The file header keeps the page size and the number of allocated data
 * pages. Data pages are numbered from 1 and found through the page
 * directory, the heap file never computes a page offset by itself.
 *
 * There is no buffer pool. A page read is a copy owned by the caller,
 * nothing reaches the disk until the caller writes it back.
 */

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::page::{Page, PageHeader, PAGE_HEADER_SIZE};
use super::page_directory::PageDirectory;
use crate::config::RecordLayout;
use crate::errors::{Error, Result};
use crate::record_management::record::{self, Record, RID};
use crate::record_management::record_scan::RecordIterator;
use crate::utils;
use crate::{ensure_arg, ensure_format};

pub const FILE_HEADER_SIZE: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct HeapFileHeader {
    page_size: u32,
    num_pages: u32,
}

impl HeapFileHeader {
    fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut buf = [0u8; FILE_HEADER_SIZE];
        buf[..4].copy_from_slice(&self.page_size.to_le_bytes());
        buf[4..].copy_from_slice(&self.num_pages.to_le_bytes());
        buf
    }

    fn from_bytes(buf: &[u8; FILE_HEADER_SIZE]) -> Self {
        Self {
            page_size: utils::get_u32(buf, 0),
            num_pages: utils::get_u32(buf, 4),
        }
    }
}

#[derive(Debug)]
pub struct HeapFile {
    fp: File,
    path: PathBuf,
    header: HeapFileHeader,
    layout: RecordLayout,
    directory: PageDirectory,
    writable: bool,
}

impl HeapFile {
    /*
     * Create a heap file, truncating whatever is at path. Writes the
     * header with zero pages and the first, empty, directory page.
     */
    pub fn create<P: AsRef<Path>>(path: P, page_size: usize, layout: RecordLayout) -> Result<Self> {
        ensure_arg!(
            page_size >= layout.slot_size(),
            "page size {} is smaller than one record of {} bytes",
            page_size,
            layout.slot_size()
        );
        ensure_arg!(page_size <= u32::MAX as usize, "page size {} is too large", page_size);
        let directory = PageDirectory::new(page_size, FILE_HEADER_SIZE as u64)?;

        let path = path.as_ref().to_path_buf();
        let fp = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let heap = Self {
            fp,
            path,
            header: HeapFileHeader {
                page_size: page_size as u32,
                num_pages: 0,
            },
            layout,
            directory,
            writable: true,
        };
        heap.write_header()?;
        utils::write_all_at(&heap.fp, &directory.new_dir_page(), directory.first_dir())?;

        info!(
            "heap file {} created, page size {}, {} pages per directory",
            heap.path.display(),
            page_size,
            directory.entries_per_dir()
        );
        Ok(heap)
    }

    //the page size comes from the stored header.
    pub fn open<P: AsRef<Path>>(path: P, layout: RecordLayout) -> Result<Self> {
        Self::open_with(path.as_ref(), layout, true)
    }

    pub fn open_read_only<P: AsRef<Path>>(path: P, layout: RecordLayout) -> Result<Self> {
        Self::open_with(path.as_ref(), layout, false)
    }

    /*
     * Open an existing heap file read only, when the caller believes it
     * knows the page size. The header wins, a different guess is only
     * logged.
     */
    pub fn open_expecting<P: AsRef<Path>>(path: P, page_size: usize, layout: RecordLayout) -> Result<Self> {
        let heap = Self::open_with(path.as_ref(), layout, false)?;
        if heap.page_size() != page_size {
            warn!(
                "{} was created with page size {}, ignoring page size {}",
                heap.path.display(),
                heap.page_size(),
                page_size
            );
        }
        Ok(heap)
    }

    fn open_with(path: &Path, layout: RecordLayout, writable: bool) -> Result<Self> {
        let fp = OpenOptions::new().read(true).write(writable).open(path)?;

        let mut buf = [0u8; FILE_HEADER_SIZE];
        utils::read_exact_at(&fp, &mut buf, 0)?;
        let header = HeapFileHeader::from_bytes(&buf);
        ensure_format!(
            header.page_size as usize >= layout.slot_size(),
            "stored page size {} is smaller than one record of {} bytes",
            header.page_size,
            layout.slot_size()
        );
        let directory = match PageDirectory::new(header.page_size as usize, FILE_HEADER_SIZE as u64) {
            Ok(v) => v,
            Err(e) => return Err(Error::Corrupted(format!("stored page size: {}", e))),
        };

        debug!(
            "heap file {} opened, page size {}, {} pages",
            path.display(),
            header.page_size,
            header.num_pages
        );
        Ok(Self {
            fp,
            path: path.to_path_buf(),
            header,
            layout,
            directory,
            writable,
        })
    }

    fn write_header(&self) -> Result<()> {
        utils::write_all_at(&self.fp, &self.header.to_bytes(), 0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_size(&self) -> usize {
        self.header.page_size as usize
    }

    pub fn num_pages(&self) -> u32 {
        self.header.num_pages
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn directory(&self) -> &PageDirectory {
        &self.directory
    }

    //an in-memory page of this file's geometry, all slots free.
    pub fn new_page(&self) -> Result<Page> {
        Page::new(self.page_size(), self.layout)
    }

    /*
     * Allocate another page in the heap file. This grows the file by a
     * page, and sometimes by a directory page too.
     */
    pub fn allocate_page(&mut self) -> Result<u32> {
        let page_num = match self.header.num_pages.checked_add(1) {
            Some(v) => v,
            None => return Err(Error::InvalidArgument("heap file has too many pages".to_string())),
        };
        let page = self.new_page()?;
        self.directory.append(&self.fp, page_num, &page)?;

        self.header.num_pages = page_num;
        self.write_header()?;
        Ok(page_num)
    }

    /*
     * Read a page into memory: header, then occupancy vector, then
     * data, the same order write_page uses.
     */
    pub fn read_page(&self, page_num: u32) -> Result<Page> {
        let offset = self.directory.locate(&self.fp, page_num)?;

        let mut buf = [0u8; PAGE_HEADER_SIZE];
        utils::read_exact_at(&self.fp, &mut buf, offset)?;
        let header = PageHeader::from_bytes(&buf)?;
        ensure_format!(
            header.page_size == self.header.page_size,
            "page {} has page size {}, the file uses {}",
            page_num,
            header.page_size,
            self.header.page_size
        );
        ensure_format!(header.slot_size > 0, "page {} has a zero slot size", page_num);

        let capacity = (header.page_size / header.slot_size) as usize;
        let mut body = vec![0u8; capacity + header.page_size as usize];
        utils::read_exact_at(&self.fp, &mut body, offset + PAGE_HEADER_SIZE as u64)?;
        Page::from_parts(header, &body, self.layout)
    }

    /*
     * Write a page back to disk and refresh its free space in the
     * directory.
     */
    pub fn write_page(&mut self, page: &Page, page_num: u32) -> Result<()> {
        ensure_arg!(
            page.page_size() == self.page_size(),
            "page of {} bytes written to a file of {} byte pages",
            page.page_size(),
            self.page_size()
        );
        ensure_arg!(
            page.slot_size() == self.layout.slot_size(),
            "page slot size {} does not match record size {}",
            page.slot_size(),
            self.layout.slot_size()
        );
        let offset = self.directory.locate(&self.fp, page_num)?;
        utils::write_all_at(&self.fp, &page.to_bytes(), offset)?;
        self.directory
            .set_free_space(&self.fp, page_num, page.free_slots() as u64)
    }

    pub fn free_space(&self, page_num: u32) -> Result<u64> {
        self.directory.free_space(&self.fp, page_num)
    }

    pub fn directory_pages(&self) -> Result<usize> {
        self.directory.chain_len(&self.fp)
    }

    pub fn get_record(&self, rid: &RID) -> Result<Option<Record>> {
        let page = self.read_page(rid.get_page_num())?;
        page.read(rid.get_slot_num() as usize)
    }

    //overwrite an existing record in place.
    pub fn update_record(&mut self, rid: &RID, record: &Record) -> Result<()> {
        let mut page = self.read_page(rid.get_page_num())?;
        let slot = rid.get_slot_num() as usize;
        ensure_arg!(page.is_occupied(slot), "no record at {}", rid);
        page.write(slot, record)?;
        self.write_page(&page, rid.get_page_num())
    }

    /*
     * Insert a record into the first page the directory reports as
     * having a free slot. If there is none, allocate a new page.
     */
    pub fn insert_record(&mut self, record: &Record) -> Result<RID> {
        //a record no slot accepts must not cost a page.
        record::pack(record, &self.layout)?;

        let mut target = None;
        for page_num in 1..=self.num_pages() {
            if self.free_space(page_num)? > 0 {
                target = Some(page_num);
                break;
            }
        }
        let page_num = match target {
            Some(v) => v,
            None => self.allocate_page()?,
        };

        let mut page = self.read_page(page_num)?;
        let slot = page.insert(record)?;
        self.write_page(&page, page_num)?;
        Ok(RID::new(page_num, slot as u32))
    }

    pub fn scan(&self) -> Result<RecordIterator<'_>> {
        RecordIterator::new(self)
    }

    pub fn sync(&self) -> Result<()> {
        self.fp.sync_all()?;
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        if self.writable {
            self.write_header()?;
            self.fp.sync_all()?;
        }
        debug!("heap file {} closed", self.path.display());
        Ok(())
    }
}
