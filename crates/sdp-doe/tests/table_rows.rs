use sdp_doe::parse_design_table;

const TABLE: &str = "\
Aspiration_Rate,Mixing_Repetitions,Notes
2.0,5,first run
,,
 0.5 , 1 ,trimmed
";

#[test]
fn rows_keep_file_order_and_one_based_indices() {
    let rows = parse_design_table(TABLE.as_bytes()).expect("parse");
    assert_eq!(rows.len(), 3);
    for (idx, row) in rows.iter().enumerate() {
        assert_eq!(row.index, idx + 1);
        assert_eq!(row.experiment_id(), (idx + 1).to_string());
    }
}

#[test]
fn empty_cells_are_dropped() {
    let rows = parse_design_table(TABLE.as_bytes()).expect("parse");
    assert!(rows[1].cells.is_empty());
    assert_eq!(rows[0].cell("Aspiration_Rate"), Some("2.0"));
    assert_eq!(rows[0].cell("Mixing_Repetitions"), Some("5"));
}

#[test]
fn cells_are_whitespace_trimmed() {
    let rows = parse_design_table(TABLE.as_bytes()).expect("parse");
    assert_eq!(rows[2].cell("Aspiration_Rate"), Some("0.5"));
    assert_eq!(rows[2].cell("Mixing_Repetitions"), Some("1"));
    assert_eq!(rows[2].cell("Notes"), Some("trimmed"));
}

#[test]
fn unknown_columns_are_preserved_as_raw_text() {
    let rows = parse_design_table(TABLE.as_bytes()).expect("parse");
    assert_eq!(rows[0].cell("Notes"), Some("first run"));
}
