/**********************************************
  > File Name		: record.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Mon 12 Apr 2021 11:01:57 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Fixed length records.
 *
 * A record is an ordered list of attributes, every attribute is a
 * null terminated string of attribute_size bytes. Serializing a record
 * concatenates the attributes, no separators and no length prefixes,
 * so a record of full width attributes serializes to exactly one slot.
 */

use std::fmt;

use crate::config::RecordLayout;
use crate::ensure_arg;
use crate::errors::Result;

pub type Attribute = Vec<u8>;

//page_num starts from 1, slot_num starts from 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RID {
    page_num: u32,
    slot_num: u32,
}

impl RID {
    pub fn new(page_num: u32, slot_num: u32) -> Self {
        Self { page_num, slot_num }
    }

    pub fn get_page_num(&self) -> u32 {
        self.page_num
    }

    pub fn get_slot_num(&self) -> u32 {
        self.slot_num
    }
}

impl fmt::Display for RID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_num, self.slot_num)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    attrs: Vec<Attribute>,
}

impl Record {
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    pub fn from_attrs(attrs: Vec<Attribute>) -> Self {
        Self { attrs }
    }

    pub fn push<A: Into<Attribute>>(&mut self, attr: A) {
        self.attrs.push(attr.into());
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl<'a> From<Vec<&'a str>> for Record {
    fn from(attrs: Vec<&'a str>) -> Self {
        Self {
            attrs: attrs.into_iter().map(|a| a.as_bytes().to_vec()).collect(),
        }
    }
}

//number of bytes required to serialize the record.
pub fn fixed_len_sizeof(record: &Record) -> usize {
    record.attrs.iter().map(|a| a.len()).sum()
}

pub fn serialize(record: &Record) -> Vec<u8> {
    let mut buf = Vec::with_capacity(fixed_len_sizeof(record));
    for attr in record.attrs.iter() {
        buf.extend_from_slice(attr);
    }
    buf
}

/*
 * Lay a record out as one slot. Every attribute must be exactly
 * attribute_size bytes with no null byte inside, and there must be
 * exactly attrs_per_record of them, otherwise deserialize would cut the
 * slot at different attribute boundaries than the ones written.
 */
pub fn pack(record: &Record, layout: &RecordLayout) -> Result<Vec<u8>> {
    ensure_arg!(
        record.len() == layout.attrs_per_record(),
        "record has {} attributes, expected {}",
        record.len(),
        layout.attrs_per_record()
    );
    for (i, attr) in record.attrs.iter().enumerate() {
        ensure_arg!(
            attr.len() == layout.attribute_size(),
            "attribute {} has {} bytes, expected {}",
            i,
            attr.len(),
            layout.attribute_size()
        );
        ensure_arg!(!attr.contains(&0), "attribute {} contains a null byte", i);
    }
    Ok(serialize(record))
}

/*
 * Read attribute by attribute, attribute_size bytes at a time, until
 * less than one attribute is left. Nothing is assumed about what
 * multiple of attribute_size the buffer length is.
 *
 * An attribute stops at its first null byte, the bytes after it are
 * padding.
 */
pub fn deserialize(buf: &[u8], layout: &RecordLayout) -> Result<Record> {
    let attr_size = layout.attribute_size();
    ensure_arg!(
        buf.len() >= attr_size,
        "a record needs at least one attribute of {} bytes, got {} bytes",
        attr_size,
        buf.len()
    );

    let attrs = buf
        .chunks_exact(attr_size)
        .map(|chunk| {
            let end = chunk.iter().position(|b| *b == 0).unwrap_or(chunk.len());
            chunk[..end].to_vec()
        })
        .collect();
    Ok(Record { attrs })
}

/*
 * Extract one attribute by serializing the whole record and slicing
 * out its byte range. Anything that is not exactly one attribute wide
 * means the record is malformed.
 */
pub fn get_attribute(record: &Record, attr_id: usize, layout: &RecordLayout) -> Result<Attribute> {
    let attr_size = layout.attribute_size();
    ensure_arg!(
        attr_id < layout.attrs_per_record(),
        "attribute id {} out of range, a record has {} attributes",
        attr_id,
        layout.attrs_per_record()
    );

    let buf = serialize(record);
    let start = (attr_id * attr_size).min(buf.len());
    let end = ((attr_id + 1) * attr_size).min(buf.len());
    let value = &buf[start..end];
    ensure_arg!(
        value.len() == attr_size,
        "attribute {} has {} bytes, expected {}",
        attr_id,
        value.len(),
        attr_size
    );
    Ok(value.to_vec())
}

pub fn set_attribute(record: &mut Record, attr_id: usize, value: &[u8], layout: &RecordLayout) -> Result<()> {
    ensure_arg!(
        value.len() == layout.attribute_size(),
        "attribute value has {} bytes, expected {}",
        value.len(),
        layout.attribute_size()
    );
    ensure_arg!(
        attr_id < record.len(),
        "attribute id {} out of range, the record has {} attributes",
        attr_id,
        record.len()
    );
    record.attrs[attr_id] = value.to_vec();
    Ok(())
}
