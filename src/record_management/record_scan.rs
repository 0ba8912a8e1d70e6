/**********************************************
  > File Name		: record_scan.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Wed 19 May 2021 09:40:26 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Sequential scan over every record of a heap file.
 *
 * The cursor is a (page_num, slot_num) pair starting at (1, 0). It
 * always rests on an occupied slot unless the scan is over: after each
 * step it moves past free slots, loading the next page whenever the
 * current one runs out. The scan is over once the page number passes
 * the number of allocated pages.
 *
 * Records come out in ascending RID order. Only the page under the
 * cursor is kept in memory.
 */

use log::debug;

use super::record::{Record, RID};
use crate::errors::{Error, Result};
use crate::page_management::page::Page;
use crate::page_management::page_file::HeapFile;

pub struct RecordIterator<'a> {
    heap: &'a HeapFile,
    page_num: u32,
    slot_num: usize,
    cur_page: Option<Page>,
    has_next: bool,
}

impl<'a> RecordIterator<'a> {
    pub fn new(heap: &'a HeapFile) -> Result<Self> {
        let mut iter = Self {
            heap,
            page_num: 1,
            slot_num: 0,
            cur_page: None,
            has_next: heap.num_pages() > 0,
        };
        if iter.has_next {
            iter.cur_page = Some(heap.read_page(1)?);
            iter.find_next()?;
        }
        Ok(iter)
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn next_record(&mut self) -> Result<(RID, Record)> {
        if !self.has_next {
            return Err(Error::NoSuchElement);
        }
        let record = match &self.cur_page {
            Some(page) => page.read(self.slot_num)?,
            None => None,
        };
        let record = match record {
            Some(v) => v,
            None => return Err(Error::NoSuchElement),
        };
        let rid = RID::new(self.page_num, self.slot_num as u32);

        self.slot_num += 1;
        self.find_next()?;
        Ok((rid, record))
    }

    //move the cursor forward until it rests on an occupied slot.
    fn find_next(&mut self) -> Result<()> {
        while self.has_next {
            let (capacity, occupied) = match &self.cur_page {
                Some(page) => (page.capacity(), page.is_occupied(self.slot_num)),
                None => (0, false),
            };
            if self.slot_num >= capacity {
                self.next_page()?;
            } else if occupied {
                break;
            } else {
                self.slot_num += 1;
            }
        }
        Ok(())
    }

    fn next_page(&mut self) -> Result<()> {
        self.page_num += 1;
        self.slot_num = 0;
        self.cur_page = None;
        if self.page_num > self.heap.num_pages() {
            debug!("scan of {} finished", self.heap.path().display());
            self.has_next = false;
            return Ok(());
        }
        self.cur_page = Some(self.heap.read_page(self.page_num)?);
        Ok(())
    }
}

impl<'a> Iterator for RecordIterator<'a> {
    type Item = Result<(RID, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next {
            return None;
        }
        let res = self.next_record();
        if res.is_err() {
            self.has_next = false;
        }
        Some(res)
    }
}
