use crate::common::{convert, fixture};

#[test]
fn test_table_html_export() {
    let html = convert(&fixture("sample.lyx"), "html");

    assert!(html.contains("<table><tbody><tr>"));
    assert_eq!(html.matches("<tr>").count(), 2);
    assert!(html.contains(
        "<td style=\"text-align: center\"><span class=\"plain-layout\">A</span></td>"
    ));
    assert!(html.contains(
        "<td style=\"text-align: left\"><span class=\"plain-layout\">2</span></td>"
    ));
    // column definitions and features are not content
    assert!(!html.contains("valignment"));
}
