/**********************************************
  > File Name		: errors.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Tue 02 Mar 2021 11:05:17 AM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * Define the error enum for global usage.
 *
 * Every operation of the heap file returns a Result, short reads
 * and writes included. Nothing is only printed and then ignored.
 */

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    //page number 0, unallocated page, or a broken directory chain.
    #[error("page {0} not found")]
    PageNotFound(u32),

    //not an error actually, tells the caller to allocate another page.
    #[error("page is full")]
    PageFull,

    #[error("no more records")]
    NoSuchElement,

    #[error("incomplete read at offset {offset}: expected {expected} bytes, got {actual}")]
    IncompleteRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("incomplete write at offset {offset}: expected {expected} bytes, wrote {actual}")]
    IncompleteWrite {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("corrupted heap file: {0}")]
    Corrupted(String),

    //error in Unix system call or library routine.
    #[error("unix error: {0}")]
    Unix(#[from] io::Error),
}

impl Error {
    pub fn is_page_full(&self) -> bool {
        matches!(self, Error::PageFull)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PageNotFound(_))
    }
}
