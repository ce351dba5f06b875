use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imap_wire::{
    buffer::Buffer,
    parse::{ParseOutcome, ParserConfig, ResponseParser},
};

fn parse_one(input: &[u8]) -> ParseOutcome {
    let mut buffer = Buffer::default();
    buffer.fill(input);
    let mut parser = ResponseParser::new(ParserConfig::default());
    parser.poll(&mut buffer).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let input = b"* 7 FETCH (UID 123 FLAGS (\\Seen \\Answered) RFC822.SIZE 4096)\r\n";

    c.bench_function("parse_response", |b| {
        b.iter(|| parse_one(black_box(&input[..])));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
