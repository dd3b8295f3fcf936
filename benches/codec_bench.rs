use criterion::{black_box, criterion_group, criterion_main, Criterion};

use protean::prelude::*;

#[derive(Message, Default, Debug, Clone, PartialEq)]
struct HelloWorld {
    #[proto(tag = 1)]
    name: String,
    #[proto(tag = 2)]
    var32: i32,
    #[proto(tag = 3)]
    var64: i64,
    #[proto(tag = 4)]
    s32: Signed<i32>,
    #[proto(tag = 5)]
    s64: Signed<i64>,
}

#[derive(Enumeration, Clone, Copy, Debug, PartialEq, Eq)]
enum PhoneType {
    #[proto(name = "MOBILE")]
    Mobile = 0,
    #[proto(name = "HOME")]
    Home = 1,
    #[proto(name = "WORK")]
    Work = 2,
}

#[derive(Message, Default, Debug, Clone, PartialEq)]
struct PhoneNumber {
    #[proto(tag = 1)]
    number: String,
    #[proto(tag = 2, name = "type")]
    kind: PhoneType,
}

#[derive(Message, Default, Debug, Clone, PartialEq)]
struct Person {
    #[proto(tag = 1)]
    name: String,
    #[proto(tag = 2)]
    id: i32,
    #[proto(tag = 3)]
    email: String,
    #[proto(tag = 4)]
    phones: Vec<PhoneNumber>,
}

#[derive(Message, Default, Debug, Clone, PartialEq)]
struct AddressBook {
    #[proto(tag = 1)]
    people: Vec<Person>,
}

fn hello() -> HelloWorld {
    HelloWorld {
        name: "world".to_owned(),
        var32: 150,
        var64: 150,
        s32: Signed(150),
        s64: Signed(-1_152_921_504_606_846_975),
    }
}

fn book() -> AddressBook {
    let people = (0..64)
        .map(|id| Person {
            name: format!("person-{id}"),
            id,
            email: format!("person-{id}@example.com"),
            phones: vec![
                PhoneNumber {
                    number: format!("555-{id:04}"),
                    kind: PhoneType::Home,
                },
                PhoneNumber {
                    number: format!("555-{:04}", id + 1000),
                    kind: PhoneType::Work,
                },
                PhoneNumber {
                    number: format!("555-{:04}", id + 2000),
                    kind: PhoneType::Mobile,
                },
            ],
        })
        .collect();
    AddressBook { people }
}

fn encode_bench(c: &mut Criterion) {
    let msg = hello();
    let book = book();
    c.bench_function("encode_hello", |b| b.iter(|| black_box(&msg).encode()));
    c.bench_function("encode_book", |b| b.iter(|| black_box(&book).encode()));
    c.bench_function("encoded_len_book", |b| {
        b.iter(|| black_box(&book).encoded_len())
    });
}

fn decode_bench(c: &mut Criterion) {
    let hello_bytes = hello().encode();
    let book_bytes = book().encode();
    c.bench_function("decode_hello", |b| {
        b.iter(|| HelloWorld::decode(black_box(&hello_bytes)).unwrap())
    });
    c.bench_function("decode_book", |b| {
        b.iter(|| AddressBook::decode(black_box(&book_bytes)).unwrap())
    });
}

criterion_group! {
    name = codec_benches;
    config = Criterion::default();
    targets = encode_bench, decode_bench
}

criterion_main!(codec_benches);
