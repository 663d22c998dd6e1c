use rowscan::Record;

#[derive(Record, Default)]
struct User {
    #[column(rename = "user_name")]
    name: String,
}

fn main() {}
