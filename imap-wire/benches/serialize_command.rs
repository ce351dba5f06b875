use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imap_wire::encode::{encode_all, Chunk, Options};
use imap_wire_types::{
    command::{Command, CommandBody},
    search::SearchKey,
    sequence::SequenceSet,
};

fn criterion_benchmark(c: &mut Criterion) {
    let instances = [("simple", create_simple()), ("complex", create_complex())];

    for (instance, command) in instances {
        c.bench_function(format!("bench_command_serialize_{instance}").as_str(), |b| {
            b.iter(|| serialize(black_box(&command)))
        });
    }
}

fn create_simple() -> Command {
    Command::new("A", CommandBody::Noop).unwrap()
}

fn create_complex() -> Command {
    let sequence_set: SequenceSet = "1:42,42:1337,1337:*".try_into().unwrap();
    let criteria = SearchKey::SequenceSet(sequence_set).into();
    Command::new("A", CommandBody::search(criteria, true)).unwrap()
}

fn serialize(command: &Command) -> Vec<u8> {
    let chunks = encode_all(command, &Options::default());
    chunks.into_iter().flat_map(|Chunk { bytes, .. }| bytes).collect()
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
