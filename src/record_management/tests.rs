/**********************************************
  > File Name		: tests.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Fri 26 Mar 2021 08:26:32 AM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

use std::io::Cursor;

use super::csv_loader::{self, LoadStats};
use super::record::{self, Record, RID};
use super::select::{self, Selection};
use crate::config::RecordLayout;
use crate::errors::Error;
use crate::page_management::page_file::HeapFile;

fn layout() -> RecordLayout {
    RecordLayout::new(4, 3).unwrap()
}

fn init(dir: &tempfile::TempDir, page_size: usize, layout: RecordLayout) -> HeapFile {
    HeapFile::create(dir.path().join("table"), page_size, layout).expect("create heap file failed")
}

fn full_record(i: usize) -> Record {
    Record::from_attrs(vec![
        format!("a{:03}", i).into_bytes(),
        format!("b{:03}", i).into_bytes(),
        format!("c{:03}", i).into_bytes(),
    ])
}

#[test]
fn codec_round_trip() {
    let rec = Record::from(vec!["abcd", "efgh", "ijkl"]);
    let buf = record::serialize(&rec);
    assert_eq!(buf, b"abcdefghijkl".to_vec());
    assert_eq!(record::fixed_len_sizeof(&rec), 12);
    assert_eq!(record::deserialize(&buf, &layout()).unwrap(), rec);
}

#[test]
fn codec_pack_exact_width() {
    let mut rec = Record::new();
    rec.push("abcd");
    rec.push(b"efgh".to_vec());
    assert!(matches!(record::pack(&rec, &layout()), Err(Error::InvalidArgument(_))));

    rec.push("ijkl");
    assert_eq!(rec.attrs()[1], b"efgh".to_vec());
    assert_eq!(record::pack(&rec, &layout()).unwrap(), b"abcdefghijkl".to_vec());

    //same total width, different attribute boundaries.
    let shifted = Record::from(vec!["ab", "efgh", "ijklmn"]);
    assert!(matches!(record::pack(&shifted, &layout()), Err(Error::InvalidArgument(_))));
}

#[test]
fn insert_keeps_attribute_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout());
    let short = Record::from(vec!["ab", "efgh", "ijkl"]);
    assert!(matches!(heap.insert_record(&short), Err(Error::InvalidArgument(_))));
    assert_eq!(heap.num_pages(), 0);

    let rid = heap.insert_record(&full_record(7)).unwrap();
    let back = heap.get_record(&rid).unwrap().unwrap();
    assert_eq!(back.attrs(), full_record(7).attrs());
}

#[test]
fn codec_deserialize_chunks() {
    //trailing bytes short of one attribute are dropped.
    let rec = record::deserialize(b"abcdefghij", &layout()).unwrap();
    assert_eq!(rec, Record::from(vec!["abcd", "efgh"]));

    //an attribute stops at its first null byte.
    let rec = record::deserialize(b"ab\0\0efgh", &layout()).unwrap();
    assert_eq!(rec, Record::from(vec!["ab", "efgh"]));

    assert!(matches!(record::deserialize(b"abc", &layout()), Err(Error::InvalidArgument(_))));
}

#[test]
fn codec_get_attribute() {
    let rec = Record::from(vec!["abcd", "efgh", "ijkl"]);
    assert_eq!(record::get_attribute(&rec, 0, &layout()).unwrap(), b"abcd".to_vec());
    assert_eq!(record::get_attribute(&rec, 2, &layout()).unwrap(), b"ijkl".to_vec());
    assert!(matches!(record::get_attribute(&rec, 3, &layout()), Err(Error::InvalidArgument(_))));

    //a short record cannot provide its last attribute.
    let short = Record::from(vec!["abcd", "ef"]);
    assert!(matches!(record::get_attribute(&short, 1, &layout()), Err(Error::InvalidArgument(_))));
    assert!(matches!(record::get_attribute(&short, 2, &layout()), Err(Error::InvalidArgument(_))));
}

#[test]
fn codec_set_attribute() {
    let mut rec = Record::from(vec!["abcd", "efgh", "ijkl"]);
    record::set_attribute(&mut rec, 1, b"wxyz", &layout()).unwrap();
    assert_eq!(rec, Record::from(vec!["abcd", "wxyz", "ijkl"]));

    assert!(matches!(record::set_attribute(&mut rec, 1, b"wx", &layout()), Err(Error::InvalidArgument(_))));
    assert!(matches!(record::set_attribute(&mut rec, 3, b"wxyz", &layout()), Err(Error::InvalidArgument(_))));
}

#[test]
fn scan_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let heap = init(&dir, 64, layout());
    let mut iter = heap.scan().unwrap();
    assert!(!iter.has_next());
    assert!(matches!(iter.next_record(), Err(Error::NoSuchElement)));
    assert!(iter.next().is_none());
}

#[test]
fn scan_skips_empty_pages() {
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout());
    for _ in 0..3 {
        heap.allocate_page().unwrap();
    }
    assert_eq!(heap.scan().unwrap().count(), 0);

    let mut page = heap.read_page(3).unwrap();
    page.insert(&full_record(1)).unwrap();
    heap.write_page(&page, 3).unwrap();

    let found: Vec<RID> = heap.scan().unwrap().map(|r| r.unwrap().0).collect();
    assert_eq!(found, vec![RID::new(3, 0)]);
}

/*
 * Pages with occupancy [1,0,1] and [0,1,0], the scan returns
 * (1,0), (1,2), (2,1) and stops.
 */
#[test]
fn scan_order() {
    //10 * 2 = 20 byte slots, 3 slots and 4 bytes of padding per page.
    let layout = RecordLayout::new(10, 2).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout);
    let rec = |i: usize| Record::from_attrs(vec![format!("record{:04}", i).into_bytes(), b"0123456789".to_vec()]);

    let p1 = heap.allocate_page().unwrap();
    let p2 = heap.allocate_page().unwrap();
    let mut page = heap.read_page(p1).unwrap();
    assert_eq!(page.capacity(), 3);
    for slot in [0usize, 2].iter() {
        page.write(*slot, &rec(10 + *slot)).unwrap();
        page.set_occupied(*slot, true).unwrap();
    }
    heap.write_page(&page, p1).unwrap();

    let mut page = heap.read_page(p2).unwrap();
    page.write(1, &rec(21)).unwrap();
    page.set_occupied(1, true).unwrap();
    heap.write_page(&page, p2).unwrap();

    let mut iter = heap.scan().unwrap();
    let mut got = Vec::new();
    for _ in 0..3 {
        assert!(iter.has_next());
        got.push(iter.next_record().unwrap());
    }
    assert!(!iter.has_next());
    assert!(matches!(iter.next_record(), Err(Error::NoSuchElement)));

    assert_eq!(
        got,
        vec![
            (RID::new(1, 0), rec(10)),
            (RID::new(1, 2), rec(12)),
            (RID::new(2, 1), rec(21)),
        ]
    );
}

/*
 * Page size 64 with 16 byte records: 4 slots a page, 5 records
 * take two pages and come back in insertion order.
 */
#[test]
fn scan_after_insertion() {
    let layout = RecordLayout::new(4, 4).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout);
    let rec = |i: usize| Record::from_attrs((0..4).map(|j| format!("{}{:03}", j, i).into_bytes()).collect());

    let mut page_num = heap.allocate_page().unwrap();
    let mut page = heap.read_page(page_num).unwrap();
    for i in 0..5 {
        match page.insert(&rec(i)) {
            Ok(_) => {}
            Err(Error::PageFull) => {
                heap.write_page(&page, page_num).unwrap();
                page_num = heap.allocate_page().unwrap();
                page = heap.read_page(page_num).unwrap();
                page.insert(&rec(i)).unwrap();
            }
            Err(e) => panic!("insert {}th record error: {:?}", i, e),
        }
    }
    heap.write_page(&page, page_num).unwrap();
    assert_eq!(heap.num_pages(), 2);

    let records: Vec<Record> = heap.scan().unwrap().map(|r| r.unwrap().1).collect();
    assert_eq!(records, (0..5).map(rec).collect::<Vec<_>>());
}

#[test]
fn scan_across_directory_pages() {
    //one record per page, 10 pages per directory page.
    let layout = RecordLayout::new(16, 4).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout);
    for i in 0..25 {
        let rec = Record::from_attrs((0..4).map(|j| format!("attr{}-{:010}", j, i).into_bytes()).collect());
        heap.insert_record(&rec).unwrap();
    }
    assert_eq!(heap.num_pages(), 25);
    assert_eq!(heap.directory_pages().unwrap(), 3);

    let rids: Vec<RID> = heap.scan().unwrap().map(|r| r.unwrap().0).collect();
    assert_eq!(rids, (1..=25).map(|p| RID::new(p, 0)).collect::<Vec<_>>());
}

#[test]
fn load_csv_packs_pages() {
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout());
    //12 byte records, 5 per page.
    let mut csv = String::new();
    for i in 0..12 {
        csv.push_str(&format!("\"a{:03}\",\"b{:03}\",\"c{:03}\"\n", i, i, i));
    }
    csv.push('\n');

    let stats = csv_loader::load_csv(Cursor::new(csv), &mut heap).unwrap();
    assert_eq!(stats, LoadStats { records: 12, pages: 3 });
    assert_eq!(heap.num_pages(), 3);
    assert_eq!(heap.free_space(1).unwrap(), 0);
    assert_eq!(heap.free_space(3).unwrap(), 3);

    let records: Vec<Record> = heap.scan().unwrap().map(|r| r.unwrap().1).collect();
    assert_eq!(records, (0..12).map(full_record).collect::<Vec<_>>());
}

#[test]
fn load_csv_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout());
    let stats = csv_loader::load_csv(Cursor::new(""), &mut heap).unwrap();
    assert_eq!(stats, LoadStats::default());
    assert_eq!(heap.num_pages(), 0);
}

#[test]
fn load_csv_bad_width() {
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout());
    let csv = "a000,b000,c000\na001,b001\n";
    match csv_loader::load_csv(Cursor::new(csv), &mut heap) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with("line 2")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn parse_line() {
    let rec = csv_loader::parse_csv_line("\"a000\",b000,c000\r", &layout());
    assert!(rec.is_err());
    let rec = csv_loader::parse_csv_line("\"a000\",b000,c000", &layout()).unwrap();
    assert_eq!(rec, full_record(0));
}

#[test]
fn select_range() {
    let dir = tempfile::tempdir().unwrap();
    let mut heap = init(&dir, 64, layout());
    for i in 0..8 {
        heap.insert_record(&full_record(i)).unwrap();
    }

    let res = select::select(&heap, 1, b"b002", b"b004").unwrap();
    let values: Vec<Vec<u8>> = res.iter().map(|s| s.value.clone()).collect();
    assert_eq!(values, vec![b"b002".to_vec(), b"b003".to_vec(), b"b004".to_vec()]);
    assert_eq!(
        res[0],
        Selection {
            rid: RID::new(1, 2),
            value: b"b002".to_vec()
        }
    );
    assert_eq!(res[2].rid, RID::new(1, 4));

    assert!(select::select(&heap, 0, b"z", b"zz").unwrap().is_empty());
    assert!(matches!(select::select(&heap, 3, b"a", b"z"), Err(Error::InvalidArgument(_))));
}
