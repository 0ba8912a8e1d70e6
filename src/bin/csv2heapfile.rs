/**********************************************
  > File Name		: csv2heapfile.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Thu 27 May 2021 09:15:37 PM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use heapfile::config::{DEFAULT_ATTRIBUTE_SIZE, DEFAULT_ATTRS_PER_RECORD};
use heapfile::record_management::csv_loader;
use heapfile::{HeapFile, RecordLayout, Result};

/// Load a csv file of fixed width tuples into a new heap file.
#[derive(Debug, Parser)]
#[command(name = "csv2heapfile")]
struct Args {
    csv_file: PathBuf,
    heapfile: PathBuf,
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,
    #[arg(long, default_value_t = DEFAULT_ATTRIBUTE_SIZE)]
    attribute_size: usize,
    #[arg(long, default_value_t = DEFAULT_ATTRS_PER_RECORD)]
    attrs_per_record: usize,
}

fn run(args: &Args) -> Result<()> {
    let layout = RecordLayout::new(args.attribute_size, args.attrs_per_record)?;
    //open the csv first, a missing csv must not truncate the heap file.
    let csv = File::open(&args.csv_file)?;
    let mut heap = HeapFile::create(&args.heapfile, args.page_size as usize, layout)?;
    let stats = csv_loader::load_csv(BufReader::new(csv), &mut heap)?;
    heap.close()?;
    println!("{} records, {} pages", stats.records, stats.pages);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("csv2heapfile failed: {}", e);
        eprintln!("csv2heapfile: {}", e);
        process::exit(2);
    }
}
