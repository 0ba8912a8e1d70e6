/**********************************************
  > File Name		: config.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Sun 16 May 2021 02:17:40 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Record layout of a heap file.
 *
 * Every record in a heap file has the same number of attributes, and
 * every attribute has the same width. The layout is built once and
 * handed to every component that needs it, nothing reads it from a
 * global.
 */

use crate::ensure_arg;
use crate::errors::Result;

pub const DEFAULT_ATTRIBUTE_SIZE: usize = 10;
pub const DEFAULT_ATTRS_PER_RECORD: usize = 100;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    attribute_size: usize,
    attrs_per_record: usize,
}

impl RecordLayout {
    pub fn new(attribute_size: usize, attrs_per_record: usize) -> Result<Self> {
        ensure_arg!(attribute_size > 0, "attribute size must be greater than zero");
        ensure_arg!(attrs_per_record > 0, "attributes per record must be greater than zero");
        ensure_arg!(
            attribute_size.checked_mul(attrs_per_record).map_or(false, |s| s <= u32::MAX as usize),
            "record of {} attributes of {} bytes is too wide",
            attrs_per_record,
            attribute_size
        );
        Ok(Self {
            attribute_size,
            attrs_per_record,
        })
    }

    pub fn attribute_size(&self) -> usize {
        self.attribute_size
    }

    pub fn attrs_per_record(&self) -> usize {
        self.attrs_per_record
    }

    //a slot holds exactly one record.
    pub fn slot_size(&self) -> usize {
        self.attribute_size * self.attrs_per_record
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            attribute_size: DEFAULT_ATTRIBUTE_SIZE,
            attrs_per_record: DEFAULT_ATTRS_PER_RECORD,
        }
    }
}
