/**********************************************
  > File Name		: select.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Fri 28 May 2021 11:02:45 AM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use heapfile::config::{DEFAULT_ATTRIBUTE_SIZE, DEFAULT_ATTRS_PER_RECORD};
use heapfile::record_management::select;
use heapfile::{HeapFile, RecordLayout, Result};

//matches are printed up to this many bytes.
const PRINT_WIDTH: usize = 5;

/// Print the attribute of every record whose value lies in [start, end].
#[derive(Debug, Parser)]
#[command(name = "select")]
struct Args {
    heapfile: PathBuf,
    attribute_id: usize,
    start: String,
    end: String,
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,
    #[arg(long, default_value_t = DEFAULT_ATTRIBUTE_SIZE)]
    attribute_size: usize,
    #[arg(long, default_value_t = DEFAULT_ATTRS_PER_RECORD)]
    attrs_per_record: usize,
}

fn run(args: &Args) -> Result<()> {
    let layout = RecordLayout::new(args.attribute_size, args.attrs_per_record)?;
    let heap = HeapFile::open_expecting(&args.heapfile, args.page_size as usize, layout)?;
    let matches = select::select(&heap, args.attribute_id, args.start.as_bytes(), args.end.as_bytes())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for m in matches.iter() {
        let shown = &m.value[..m.value.len().min(PRINT_WIDTH)];
        out.write_all(shown)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    heap.close()
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("select failed: {}", e);
        eprintln!("select: {}", e);
        process::exit(2);
    }
}
