//! Black-box scenarios exercised entirely through the public `Sheet` API,
//! covering the sheet's concrete acceptance scenarios and data-model
//! invariants.

use gridcalc_core::{CoreError, FormulaErrorKind, Position, Sheet, Value};

fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

#[test]
fn empty_cell_reads_as_empty_text() {
    let mut sheet = Sheet::new();
    assert_eq!(sheet.get_value(pos(0, 0)).unwrap(), Value::Text(String::new()));
    assert!(sheet.get_cell(pos(0, 0)).unwrap().is_none());
}

#[test]
fn literal_text_is_stored_and_read_back_verbatim() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "hello world").unwrap();
    assert_eq!(
        sheet.get_value(pos(0, 0)).unwrap(),
        Value::Text("hello world".into())
    );
    assert_eq!(sheet.get_cell(pos(0, 0)).unwrap().unwrap().get_text(), "hello world");
}

#[test]
fn escaped_leading_quote_only_affects_the_value_not_the_stored_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "'1+1").unwrap();
    assert_eq!(sheet.get_value(pos(0, 0)).unwrap(), Value::Text("1+1".into()));
    assert_eq!(sheet.get_cell(pos(0, 0)).unwrap().unwrap().get_text(), "'1+1");
}

#[test]
fn formula_over_empty_cells_evaluates_to_zero_sum() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(2, 2), "=A1+B2").unwrap();
    assert_eq!(sheet.get_value(pos(2, 2)).unwrap(), Value::Number(0.0));
}

#[test]
fn changing_an_upstream_cell_cascades_through_a_chain_of_formulas() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "3").unwrap(); // A1
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap(); // B1 = 4
    sheet.set_cell(pos(0, 2), "=B1*2").unwrap(); // C1 = 8

    assert_eq!(sheet.get_value(pos(0, 2)).unwrap(), Value::Number(8.0));

    sheet.set_cell(pos(0, 0), "10").unwrap();
    assert_eq!(sheet.get_value(pos(0, 1)).unwrap(), Value::Number(11.0));
    assert_eq!(sheet.get_value(pos(0, 2)).unwrap(), Value::Number(22.0));
}

#[test]
fn introducing_a_cycle_is_rejected_and_leaves_the_sheet_untouched() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "=B1").unwrap(); // A1 -> B1
    sheet.set_cell(pos(0, 1), "1").unwrap(); // B1 = 1
    assert_eq!(sheet.get_value(pos(0, 0)).unwrap(), Value::Number(1.0));

    let err = sheet.set_cell(pos(0, 1), "=A1").unwrap_err();
    assert_eq!(err, CoreError::CircularDependency);

    // B1 keeps its prior literal content, unaffected by the rejected Set.
    assert_eq!(sheet.get_value(pos(0, 1)).unwrap(), Value::Number(1.0));
    assert_eq!(sheet.get_value(pos(0, 0)).unwrap(), Value::Number(1.0));
}

#[test]
fn a_failed_set_does_not_disturb_cells_auto_created_by_the_prior_successful_one() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "=B1").unwrap(); // auto-creates B1 as empty
    assert!(sheet.get_cell(pos(0, 1)).unwrap().is_some());

    sheet.set_cell(pos(0, 1), "=A1").unwrap_err(); // would cycle, rejected
    // B1 still exists (created by the earlier, successful Set on A1).
    assert!(sheet.get_cell(pos(0, 1)).unwrap().is_some());
    assert_eq!(sheet.get_value(pos(0, 0)).unwrap(), Value::Number(0.0));
}

#[test]
fn evaluation_errors_propagate_through_dependent_formulas_as_values() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "=1/0").unwrap(); // A1 -> #ARITHM!
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap(); // B1 reads the error

    assert_eq!(
        sheet.get_value(pos(0, 0)).unwrap(),
        Value::FormulaError(FormulaErrorKind::Arithmetic)
    );
    assert_eq!(
        sheet.get_value(pos(0, 1)).unwrap(),
        Value::FormulaError(FormulaErrorKind::Arithmetic)
    );
}

#[test]
fn text_that_does_not_parse_as_a_whole_number_is_a_value_error_in_formulas() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "12abc").unwrap();
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap();
    assert_eq!(
        sheet.get_value(pos(0, 1)).unwrap(),
        Value::FormulaError(FormulaErrorKind::Value)
    );
}

#[test]
fn text_that_parses_as_a_whole_number_is_usable_in_arithmetic() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "12").unwrap();
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap();
    assert_eq!(sheet.get_value(pos(0, 1)).unwrap(), Value::Number(13.0));
}

#[test]
fn out_of_range_reference_is_a_ref_error() {
    let mut sheet = Sheet::new();
    let huge = format!("{}1", "Z".repeat(10));
    sheet.set_cell(pos(0, 0), &format!("={huge}+1")).unwrap();
    assert_eq!(
        sheet.get_value(pos(0, 0)).unwrap(),
        Value::FormulaError(FormulaErrorKind::Ref)
    );
}

#[test]
fn range_functions_aggregate_a_rectangle() {
    let mut sheet = Sheet::new();
    for (row, value) in [(0, "1"), (1, "2"), (2, "3"), (3, "4")] {
        sheet.set_cell(pos(row, 0), value).unwrap();
    }
    sheet.set_cell(pos(0, 1), "=SUM(A1:A4)").unwrap();
    sheet.set_cell(pos(0, 2), "=AVERAGE(A1:A4)").unwrap();
    sheet.set_cell(pos(0, 3), "=COUNT(A1:A4)").unwrap();

    assert_eq!(sheet.get_value(pos(0, 1)).unwrap(), Value::Number(10.0));
    assert_eq!(sheet.get_value(pos(0, 2)).unwrap(), Value::Number(2.5));
    assert_eq!(sheet.get_value(pos(0, 3)).unwrap(), Value::Number(4.0));
}

#[test]
fn clearing_a_cell_with_no_dependents_removes_it_from_the_grid() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "42").unwrap();
    sheet.clear_cell(pos(0, 0)).unwrap();
    assert!(sheet.get_cell(pos(0, 0)).unwrap().is_none());
}

#[test]
fn clearing_a_cell_with_dependents_empties_it_instead_of_removing_it() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "42").unwrap();
    sheet.set_cell(pos(0, 1), "=A1").unwrap();

    sheet.clear_cell(pos(0, 0)).unwrap();
    let cell = sheet.get_cell(pos(0, 0)).unwrap().unwrap();
    assert!(cell.is_empty());
    assert_eq!(sheet.get_value(pos(0, 1)).unwrap(), Value::Number(0.0));
}

#[test]
fn setting_empty_text_behaves_like_clear_cell() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "42").unwrap();
    sheet.set_cell(pos(0, 0), "").unwrap();
    assert!(sheet.get_cell(pos(0, 0)).unwrap().is_none());
}

#[test]
fn printable_size_ignores_trailing_empty_rows_and_columns() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(1, 1), "x").unwrap();
    assert_eq!(sheet.printable_size(), (2, 2));
}

#[test]
fn print_values_and_print_texts_render_tab_separated_rows() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos(0, 0), "1").unwrap();
    sheet.set_cell(pos(0, 1), "=A1+1").unwrap();
    sheet.set_cell(pos(1, 0), "text").unwrap();

    let mut values = Vec::new();
    sheet.print_values(&mut values).unwrap();
    assert_eq!(String::from_utf8(values).unwrap(), "1\t2\ntext\t\n");

    let mut texts = Vec::new();
    sheet.print_texts(&mut texts).unwrap();
    assert_eq!(String::from_utf8(texts).unwrap(), "1\t=A1+1\ntext\t\n");
}
