use cross_refs::{Error, UniqueList};
use pretty_assertions::assert_eq;

#[test]
fn line_numbers_keep_first_occurrence_order() {
    let mut lines = UniqueList::new();
    assert!(lines.push_back(1));
    assert!(!lines.push_back(1));
    assert!(lines.push_back(3));
    assert!(lines.push_back(2));
    assert!(!lines.push_back(3));

    assert_eq!(lines.iter().copied().collect::<Vec<_>>(), [1, 3, 2]);
    assert_eq!(lines.peek_front(), Ok(&1));
    assert!(lines.contains(&2));
    assert!(!lines.contains(&4));
}

#[test]
fn empty_list_reports_empty_container() {
    let lines: UniqueList<usize> = UniqueList::default();
    assert!(lines.is_empty());
    assert_eq!(lines.peek_front(), Err(Error::EmptyContainer));
    assert_eq!(
        lines.peek_front().unwrap_err().to_string(),
        "container is empty"
    );
}

#[test]
fn clone_does_not_share_links() {
    let original: UniqueList<String> = ["a", "b"].into_iter().map(String::from).collect();
    let mut copy = original.clone();
    copy.push_back("c".to_owned());

    assert_eq!(original.len(), 2);
    assert_eq!(copy.len(), 3);
    assert_eq!(format!("{original:?}"), r#"["a", "b"]"#);
}

#[test]
fn extend_skips_values_already_present() {
    let mut lines: UniqueList<u32> = [5, 6].into_iter().collect();
    lines.extend([6, 7, 5, 8]);
    assert_eq!(lines, [5, 6, 7, 8].into_iter().collect::<UniqueList<_>>());
    assert_eq!((&lines).into_iter().sum::<u32>(), 26);
}
