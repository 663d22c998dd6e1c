use rowscan::{Row, RowSet};

fn main() {
    let mut rows: RowSet = vec![Row::default().with_attribute("id", 1)].into();
    let mut id = 0i64;
    rowscan::scan_one(&mut rows, &mut id).unwrap();
}
