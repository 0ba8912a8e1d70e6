/**********************************************
  > File Name		: lib.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Sun 16 May 2021 02:05:12 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

mod macros;

pub mod config;
pub mod errors;
pub mod page_management;
pub mod record_management;
pub mod utils;

pub use config::RecordLayout;
pub use errors::{Error, Result};
pub use page_management::page::Page;
pub use page_management::page_file::HeapFile;
pub use record_management::record::{Record, RID};
pub use record_management::record_scan::RecordIterator;
