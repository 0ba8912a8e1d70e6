/**********************************************
  > File Name		: mod.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time     : Wed Mar 10 07:25:33 PM CST 2021
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

/*
 * The Record Management component provides the fixed length record
 * codec, the sequential record scan over a heap file, and the two
 * clients built on them: the csv bulk loader and the attribute range
 * select.
 *
 * To simplify our task, we assume that every record in one heap file
 * is the same size, and so is every attribute of a record.
 */

pub mod csv_loader;
pub mod record;
pub mod record_scan;
pub mod select;

#[cfg(test)]
mod tests;
