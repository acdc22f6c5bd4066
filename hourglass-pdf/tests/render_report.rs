use chrono::NaiveDate;
use hourglass_core::{report, NewTask, Priority, ReportMeta, TaskStore};
use hourglass_pdf::render_pdf;

fn store_with(n: usize) -> TaskStore {
    let mut store = TaskStore::new();
    for i in 0..n {
        store
            .add_task(NewTask::new(format!("Task (#{i})"), 0.5).with_priority(Some(Priority::Low)))
            .unwrap();
    }
    store
}

fn meta() -> ReportMeta {
    ReportMeta::new(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[test]
fn single_page_report_is_wellformed() {
    let doc = report(&store_with(2), &meta());
    let bytes = render_pdf(&doc, "hourglass test").unwrap();

    assert!(bytes.starts_with(b"%PDF-1.4\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert!(find(&bytes, b"/Count 1").is_some());
    assert!(find(&bytes, b"/MediaBox [0 0 595.28 841.89]").is_some());
    assert!(find(&bytes, b"(Time Management Summary) Tj").is_some());
    // parentheses in task names are escaped
    assert!(find(&bytes, br"(Task \(#0\)) Tj").is_some());
}

#[test]
fn xref_offsets_point_at_objects() {
    let doc = report(&store_with(40), &meta());
    assert!(doc.page_count() >= 2);
    let bytes = render_pdf(&doc, "hourglass test").unwrap();

    let sx = find(&bytes, b"startxref\n").unwrap();
    let tail = std::str::from_utf8(&bytes[sx + 10..]).unwrap();
    let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
    assert!(bytes[xref_at..].starts_with(b"xref\n"));

    let table = std::str::from_utf8(&bytes[xref_at..sx]).unwrap();
    let entries: Vec<&str> = table.lines().skip(3).take_while(|l| !l.starts_with("trailer")).collect();
    // catalog, pages, font, info, then two objects per page
    assert_eq!(entries.len(), 4 + 2 * doc.page_count());
    for (i, entry) in entries.iter().enumerate() {
        let off: usize = entry[..10].parse().unwrap();
        let header = format!("{} 0 obj", i + 1);
        assert!(bytes[off..].starts_with(header.as_bytes()), "object {}", i + 1);
    }
}

#[test]
fn identical_documents_give_identical_bytes() {
    let doc = report(&store_with(5), &meta());
    assert_eq!(
        render_pdf(&doc, "p").unwrap(),
        render_pdf(&doc.clone(), "p").unwrap()
    );
}
