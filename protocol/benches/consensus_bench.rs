// Ledger benchmarks for LedgerLab.
//
// Covers block sealing, full-chain verification, broadcast fan-out, and
// consensus evaluation across network sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ledgerlab_protocol::config::NetworkConfig;
use ledgerlab_protocol::network::{evaluate_consensus, Network};
use ledgerlab_protocol::storage::{Block, Chain};
use ledgerlab_protocol::transaction::{Transaction, TxField};

const TS: &str = "1/1/2026, 12:00:00 AM";

/// Builds a network of `n` participants that all received `blocks` broadcasts.
fn setup_network(n: usize, blocks: usize) -> Network {
    let mut network = Network::new(&NetworkConfig::with_participants(n)).unwrap();
    for i in 0..blocks {
        network.broadcast(&Transaction::new("A", "B", i as f64, TS), TS);
    }
    network
}

fn bench_block_seal(c: &mut Criterion) {
    let tx = Transaction::new("Alice", "Bob", 10.0, TS);

    c.bench_function("ledger/block_seal", |b| {
        b.iter(|| Block::new(1, TS, "0", vec![tx.clone()]));
    });
}

fn bench_chain_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/chain_verify");

    for length in [10usize, 100, 1_000] {
        let mut chain = Chain::new();
        for i in 0..length {
            chain.append(Transaction::new("A", "B", i as f64, TS), TS);
        }

        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::from_parameter(length), &chain, |b, chain| {
            b.iter(|| chain.verify());
        });
    }

    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/broadcast");
    let tx = Transaction::new("A", "B", 1.0, TS);

    for participants in [3usize, 5, 13, 21] {
        group.throughput(Throughput::Elements(participants as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, &n| {
                b.iter_with_setup(
                    || setup_network(n, 10),
                    |mut network| network.broadcast(&tx, TS),
                );
            },
        );
    }

    group.finish();
}

fn bench_consensus(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/consensus");

    for participants in [3usize, 5, 13, 21] {
        group.throughput(Throughput::Elements(participants as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, &n| {
                b.iter_with_setup(
                    || {
                        let mut network = setup_network(n, 20);
                        let chain = &mut network.participants_mut()[0].chain;
                        chain.edit_transaction_field(5, 0, TxField::Amount, "999").unwrap();
                        chain.recalculate_all_hashes();
                        network
                    },
                    |mut network| evaluate_consensus(&mut network),
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_block_seal,
    bench_chain_verify,
    bench_broadcast,
    bench_consensus,
);
criterion_main!(benches);
