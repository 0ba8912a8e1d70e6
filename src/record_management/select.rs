/**********************************************
  > File Name		: select.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Fri 28 May 2021 10:21:14 AM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Select records whose attribute falls in [start, end], comparing raw
 * bytes lexicographically. A full scan, there is no index.
 */

use super::record::{self, Attribute, RID};
use crate::ensure_arg;
use crate::errors::Result;
use crate::page_management::page_file::HeapFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub rid: RID,
    pub value: Attribute,
}

pub fn select(heap: &HeapFile, attr_id: usize, start: &[u8], end: &[u8]) -> Result<Vec<Selection>> {
    let layout = *heap.layout();
    ensure_arg!(
        attr_id < layout.attrs_per_record(),
        "attribute id {} out of range, a record has {} attributes",
        attr_id,
        layout.attrs_per_record()
    );

    let mut res = Vec::new();
    for item in heap.scan()? {
        let (rid, rec) = item?;
        let value = record::get_attribute(&rec, attr_id, &layout)?;
        if start <= value.as_slice() && value.as_slice() <= end {
            res.push(Selection { rid, value });
        }
    }
    Ok(res)
}
