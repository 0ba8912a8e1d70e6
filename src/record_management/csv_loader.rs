/**********************************************
  > File Name		: csv_loader.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Thu 27 May 2021 08:03:51 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Bulk load of fixed width tuples from a csv file.
 *
 * Commas and double quotes are stripped from every line, what is left
 * must be exactly one record wide. Records are packed into a page until
 * it reports full, then the page is written back and the next one is
 * allocated.
 */

use std::io::BufRead;

use log::{debug, info};

use super::record::{self, Record};
use crate::config::RecordLayout;
use crate::ensure_arg;
use crate::errors::{Error, Result};
use crate::page_management::page::Page;
use crate::page_management::page_file::HeapFile;

const STRIPPED_CHARS: [char; 2] = [',', '"'];

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub records: usize,
    pub pages: usize,
}

pub fn parse_csv_line(line: &str, layout: &RecordLayout) -> Result<Record> {
    let tuple: String = line.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    ensure_arg!(
        tuple.len() == layout.slot_size(),
        "tuple has {} bytes, a record has {}",
        tuple.len(),
        layout.slot_size()
    );
    record::deserialize(tuple.as_bytes(), layout)
}

pub fn load_csv<R: BufRead>(reader: R, heap: &mut HeapFile) -> Result<LoadStats> {
    let layout = *heap.layout();
    let mut stats = LoadStats::default();
    let mut cur: Option<(u32, Page)> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let rec = match parse_csv_line(line, &layout) {
            Ok(v) => v,
            Err(Error::InvalidArgument(msg)) => {
                return Err(Error::InvalidArgument(format!("line {}: {}", line_no + 1, msg)));
            }
            Err(e) => return Err(e),
        };

        let inserted = match cur.as_mut() {
            Some((_, page)) => match page.insert(&rec) {
                Ok(_) => true,
                Err(Error::PageFull) => false,
                Err(e) => return Err(e),
            },
            None => false,
        };

        //the current page is full, or there is none yet.
        if !inserted {
            if let Some((page_num, page)) = cur.take() {
                heap.write_page(&page, page_num)?;
            }
            let page_num = heap.allocate_page()?;
            debug!("loading into page {}", page_num);
            let mut page = heap.read_page(page_num)?;
            page.insert(&rec)?;
            cur = Some((page_num, page));
            stats.pages += 1;
        }
        stats.records += 1;
    }

    if let Some((page_num, page)) = cur.take() {
        heap.write_page(&page, page_num)?;
    }
    info!(
        "{} records loaded into {} pages of {}",
        stats.records,
        stats.pages,
        heap.path().display()
    );
    Ok(stats)
}
