use rowscan::Record;

#[derive(Record, Default)]
struct Pair(i64, String);

#[derive(Record, Default)]
struct Marker;

fn main() {}
