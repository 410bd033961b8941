// Encoding benchmarks: descriptor to self-describing buffer to canonical
// bytes, and the embedded re-pack.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catapult_tx::crypto::PublicKey;
use catapult_tx::model::{Deadline, Mosaic, MosaicId, NetworkType, Recipient};
use catapult_tx::transaction::{
    Message, PlaceSdaExchangeOfferBody, SdaOffer, TransactionBuilder, TransferBody,
};

fn bench_transfer_by_mosaic_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode/transfer");

    for count in [0usize, 4, 32] {
        let mosaics = (0..count as u64)
            .map(|i| Mosaic::new(MosaicId::new((i * 7919).into()), i))
            .collect();
        let tx = TransactionBuilder::new(NetworkType::TestNet)
            .deadline(Deadline::from_network_millis(1))
            .build(TransferBody::new(
                Recipient::parse("85BBEA6CC462B244").unwrap(),
                mosaics,
                Message::plain("benchmark"),
            ))
            .unwrap();

        group.throughput(Throughput::Bytes(tx.calculate_size() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &tx, |b, tx| {
            b.iter(|| tx.serialize().unwrap());
        });
    }

    group.finish();
}

fn bench_sda_offers(c: &mut Criterion) {
    let offer = SdaOffer {
        give: Mosaic::new(MosaicId::new(1u64.into()), 10u64),
        get: Mosaic::new(MosaicId::new(2u64.into()), 20u64),
        duration: 1_000u64.into(),
    };
    let tx = TransactionBuilder::new(NetworkType::TestNet)
        .build(PlaceSdaExchangeOfferBody {
            offers: vec![offer; 50],
        })
        .unwrap();

    c.bench_function("encode/sda_offers_50", |b| {
        b.iter(|| tx.serialize().unwrap());
    });
}

fn bench_to_aggregate(c: &mut Criterion) {
    let signer = PublicKey::from_bytes([4u8; 32]);
    let tx = TransactionBuilder::new(NetworkType::TestNet)
        .build(TransferBody::new(
            Recipient::parse("85BBEA6CC462B244").unwrap(),
            vec![],
            Message::plain("embed me"),
        ))
        .unwrap();

    c.bench_function("encode/to_aggregate", |b| {
        b.iter(|| tx.to_aggregate(&signer).unwrap());
    });
}

criterion_group!(
    benches,
    bench_transfer_by_mosaic_count,
    bench_sda_offers,
    bench_to_aggregate,
);
criterion_main!(benches);
