/**********************************************
  > File Name		: page.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Mon 01 Mar 2021 07:31:48 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Slotted pages.
 *
 * A page is a buffer of page_size bytes split into slots of slot_size
 * bytes, any remainder is unused padding. Which slots hold a record is
 * kept in a separate occupancy vector rather than inside the buffer,
 * and the vector travels with the page on disk as its own byte run.
 *
 * Data page layout on disk:
 *     page header | occupancy ('0'/'1' per slot) | data (page_size bytes)
 */

use crate::config::RecordLayout;
use crate::errors::{Error, Result};
use crate::record_management::record::{self, Record};
use crate::utils;
use crate::{ensure_arg, ensure_format};

pub const PAGE_HEADER_SIZE: usize = 8;

const SLOT_FREE: u8 = b'0';
const SLOT_OCCUPIED: u8 = b'1';

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub page_size: u32,
    pub slot_size: u32,
}

impl PageHeader {
    pub fn new(page_size: u32, slot_size: u32) -> Self {
        Self { page_size, slot_size }
    }

    pub fn to_bytes(&self) -> [u8; PAGE_HEADER_SIZE] {
        let mut buf = [0u8; PAGE_HEADER_SIZE];
        buf[..4].copy_from_slice(&self.page_size.to_le_bytes());
        buf[4..].copy_from_slice(&self.slot_size.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        ensure_format!(
            buf.len() >= PAGE_HEADER_SIZE,
            "page header needs {} bytes, got {}",
            PAGE_HEADER_SIZE,
            buf.len()
        );
        Ok(Self {
            page_size: utils::get_u32(buf, 0),
            slot_size: utils::get_u32(buf, 4),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    page_size: usize,
    layout: RecordLayout,
    slot_info: Vec<bool>,
    data: Vec<u8>,
}

impl Page {
    //a fresh page, all slots free.
    pub fn new(page_size: usize, layout: RecordLayout) -> Result<Self> {
        ensure_arg!(
            layout.slot_size() <= page_size,
            "page size {} is smaller than one record of {} bytes",
            page_size,
            layout.slot_size()
        );
        ensure_arg!(page_size <= u32::MAX as usize, "page size {} is too large", page_size);
        let capacity = page_size / layout.slot_size();
        Ok(Self {
            page_size,
            layout,
            slot_info: vec![false; capacity],
            data: vec![0; page_size],
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn slot_size(&self) -> usize {
        self.layout.slot_size()
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn capacity(&self) -> usize {
        self.page_size / self.layout.slot_size()
    }

    pub fn free_slots(&self) -> usize {
        self.slot_info.iter().filter(|occupied| !**occupied).count()
    }

    pub fn is_occupied(&self, slot: usize) -> bool {
        self.slot_info.get(slot).copied().unwrap_or(false)
    }

    /*
     * Mark a slot occupied or free without touching its bytes.
     * write() leaves the occupancy alone, so callers that write into a
     * slot directly use this to publish it.
     */
    pub fn set_occupied(&mut self, slot: usize, occupied: bool) -> Result<()> {
        self.check_slot(slot)?;
        self.slot_info[slot] = occupied;
        Ok(())
    }

    /*
     * First fit: the record goes to the free slot with the lowest
     * index. Returns the slot, or PageFull if no slot is free.
     */
    pub fn insert(&mut self, record: &Record) -> Result<usize> {
        let slot = match self.slot_info.iter().position(|occupied| !*occupied) {
            Some(v) => v,
            None => return Err(Error::PageFull),
        };
        self.write(slot, record)?;
        self.slot_info[slot] = true;
        Ok(slot)
    }

    //overwrite a slot, the occupancy is not changed.
    pub fn write(&mut self, slot: usize, record: &Record) -> Result<()> {
        self.check_slot(slot)?;
        let slot_size = self.slot_size();
        let buf = record::pack(record, &self.layout)?;

        let start = slot * slot_size;
        self.data[start..start + slot_size].copy_from_slice(&buf);
        Ok(())
    }

    //None if the slot is free or out of range.
    pub fn read(&self, slot: usize) -> Result<Option<Record>> {
        if slot >= self.capacity() || !self.slot_info[slot] {
            return Ok(None);
        }
        let slot_size = self.slot_size();
        let start = slot * slot_size;
        record::deserialize(&self.data[start..start + slot_size], &self.layout).map(Some)
    }

    pub fn header(&self) -> PageHeader {
        PageHeader::new(self.page_size as u32, self.slot_size() as u32)
    }

    //number of bytes the page occupies in the file.
    pub fn disk_size(&self) -> usize {
        PAGE_HEADER_SIZE + self.capacity() + self.page_size
    }

    //header, occupancy, then data. read_page relies on this order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.disk_size());
        buf.extend_from_slice(&self.header().to_bytes());
        buf.extend(
            self.slot_info
                .iter()
                .map(|occupied| if *occupied { SLOT_OCCUPIED } else { SLOT_FREE }),
        );
        buf.extend_from_slice(&self.data);
        buf
    }

    /*
     * Rebuild a page from its header and the bytes that follow it in
     * the file (occupancy vector and data).
     */
    pub fn from_parts(header: PageHeader, body: &[u8], layout: RecordLayout) -> Result<Self> {
        ensure_format!(
            header.slot_size as usize == layout.slot_size(),
            "page slot size {} does not match record size {}",
            header.slot_size,
            layout.slot_size()
        );
        let mut page = Self::new(header.page_size as usize, layout)?;
        let capacity = page.capacity();
        ensure_format!(
            body.len() == capacity + page.page_size,
            "page body has {} bytes, expected {}",
            body.len(),
            capacity + page.page_size
        );

        for (i, b) in body[..capacity].iter().enumerate() {
            page.slot_info[i] = match *b {
                SLOT_OCCUPIED => true,
                SLOT_FREE => false,
                other => {
                    return Err(Error::Corrupted(format!(
                        "invalid occupancy byte {:#04x} at slot {}",
                        other, i
                    )));
                }
            };
        }
        page.data.copy_from_slice(&body[capacity..]);
        Ok(page)
    }

    fn check_slot(&self, slot: usize) -> Result<()> {
        ensure_arg!(
            slot < self.capacity(),
            "slot {} out of range, the page has {} slots",
            slot,
            self.capacity()
        );
        Ok(())
    }
}
