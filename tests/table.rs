use fastfood_nutrition::table::render_table;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn render_table_right_aligns_numeric_columns() {
    let headers = strings(&["restaurant", "count"]);
    let rows = vec![strings(&["Sonic", "53"]), strings(&["Mcdonalds", "57"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec![
            "restaurant  count",
            "----------  -----",
            "Sonic          53",
            "Mcdonalds      57",
        ]
    );
}

#[test]
fn render_table_treats_percentages_and_gaps_as_numeric() {
    let headers = strings(&["column", "share"]);
    let rows = vec![strings(&["vit_a", "28.57%"]), strings(&["fiber", "n/a"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "column   share");
    assert_eq!(lines[2], "vit_a   28.57%");
    assert_eq!(lines[3], "fiber      n/a");
}

#[test]
fn render_table_pads_narrow_columns_to_three() {
    let headers = strings(&["#"]);
    let rows = vec![strings(&["1"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines, vec!["  #", "---", "  1"]);
}

#[test]
fn render_table_normalizes_control_characters() {
    let headers = strings(&["item"]);
    let rows = vec![strings(&["Big\nMac\tCombo"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "Big Mac Combo");
}

#[test]
fn render_table_handles_unicode_and_ansi_widths() {
    let headers = strings(&["résumé", "status"]);
    let rows = vec![strings(&["café", "\u{1b}[31mERR\u{1b}[0m"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "résumé  status");
    assert_eq!(lines[2], "café    \u{1b}[31mERR\u{1b}[0m");
}
