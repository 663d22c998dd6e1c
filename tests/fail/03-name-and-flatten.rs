use rowscan::Record;

#[derive(Record, Default)]
struct Address {
    #[column(name = "city")]
    city: String,
}

#[derive(Record, Default)]
struct Person {
    #[column(name = "address", flatten)]
    address: Address,
}

fn main() {}
