use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use lob_engine::{Config, OrderBook, OrderId, OrderKind, Quote, Side, TradeId};

fn limit_quote(id: u64, side: Side, price: Decimal, quantity: Decimal) -> Quote {
    Quote {
        order_id: OrderId::new(format!("o{id}")),
        trade_id: TradeId::new(format!("t{id}")),
        timestamp: id as i64,
        side,
        kind: OrderKind::Limit,
        price: Some(price),
        quantity,
    }
}

fn market_quote(id: u64, side: Side, quantity: Decimal) -> Quote {
    Quote {
        order_id: OrderId::new(format!("o{id}")),
        trade_id: TradeId::new(format!("t{id}")),
        timestamp: id as i64,
        side,
        kind: OrderKind::Market,
        price: None,
        quantity,
    }
}

fn setup_book() -> OrderBook {
    OrderBook::new(Config::new(dec!(0.01)))
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut book = setup_book();
    let mut group = c.benchmark_group("mixed_workload");
    let mut next_id = 0u64;

    group.bench_function("realistic_mixed_operations", |b| {
        b.iter(|| {
            // 60% new orders
            for _ in 0..6 {
                next_id += 1;
                black_box(
                    book.submit(limit_quote(next_id, Side::Bid, dec!(100.0), dec!(1.0)))
                        .unwrap(),
                );
            }

            // 20% cancellations
            for _ in 0..2 {
                next_id += 1;
                let id = OrderId::new(format!("o{next_id}"));
                book.submit(limit_quote(next_id, Side::Ask, dec!(101.0), dec!(1.0)))
                    .unwrap();
                black_box(book.cancel(&id).unwrap());
            }

            // 20% matches
            for _ in 0..2 {
                next_id += 1;
                black_box(
                    book.submit(limit_quote(next_id, Side::Bid, dec!(100.0), dec!(1.0)))
                        .unwrap(),
                );
                next_id += 1;
                black_box(
                    book.submit(limit_quote(next_id, Side::Ask, dec!(100.0), dec!(1.0)))
                        .unwrap(),
                );
            }
        })
    });

    group.finish();
}

fn bench_high_frequency_matching(c: &mut Criterion) {
    let mut book = setup_book();
    let mut group = c.benchmark_group("high_frequency_matching");
    let mut next_id = 0u64;

    for i in 0..10 {
        let price = dec!(100.0) + Decimal::from(i);
        for _ in 0..100 {
            next_id += 1;
            book.submit(limit_quote(next_id, Side::Ask, price, dec!(1.0)))
                .unwrap();
        }
    }

    group.bench_function("rapid_matching", |b| {
        b.iter(|| {
            next_id += 1;
            black_box(
                book.submit(limit_quote(next_id, Side::Bid, dec!(110.0), dec!(5.0)))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn bench_market_stress(c: &mut Criterion) {
    let mut book = setup_book();
    let mut group = c.benchmark_group("market_stress");
    let mut next_id = 0u64;

    group.bench_function("high_volatility", |b| {
        b.iter(|| {
            for i in 0..5 {
                let price = dec!(100.0) + Decimal::from(i);
                next_id += 1;
                black_box(
                    book.submit(limit_quote(next_id, Side::Bid, price, dec!(1.0)))
                        .unwrap(),
                );
                next_id += 1;
                black_box(
                    book.submit(limit_quote(next_id, Side::Ask, price, dec!(1.0)))
                        .unwrap(),
                );
            }
        })
    });

    group.finish();
}

fn bench_order_book_depth(c: &mut Criterion) {
    let mut book = setup_book();
    let mut group = c.benchmark_group("order_book_depth");
    let mut next_id = 0u64;

    for i in 0..50 {
        let price = dec!(100.0) + Decimal::from(i);
        for _ in 0..20 {
            next_id += 1;
            book.submit(limit_quote(next_id, Side::Ask, price, dec!(1.0)))
                .unwrap();
        }
    }

    group.bench_function("deep_book_operations", |b| {
        b.iter(|| {
            next_id += 1;
            black_box(
                book.submit(limit_quote(next_id, Side::Bid, dec!(125.0), dec!(1.0)))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn bench_ioc_orders(c: &mut Criterion) {
    let mut book = setup_book();
    let mut group = c.benchmark_group("ioc_orders");
    let mut next_id = 0u64;

    for i in 0..5 {
        let price = dec!(100.0) + Decimal::from(i);
        next_id += 1;
        book.submit(limit_quote(next_id, Side::Ask, price, dec!(1.0)))
            .unwrap();
    }

    group.bench_function("market_sweep", |b| {
        b.iter(|| {
            next_id += 1;
            black_box(book.submit(market_quote(next_id, Side::Bid, dec!(1.0))).unwrap())
        })
    });

    group.finish();
}

fn bench_market_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_orders");
    let mut next_id = 0u64;

    group.bench_function("market_order_processing", |b| {
        b.iter_with_setup(
            || {
                let mut book = setup_book();
                for i in 0..5 {
                    let price = dec!(100.0) + Decimal::from(i);
                    next_id += 1;
                    book.submit(limit_quote(next_id, Side::Ask, price, dec!(10.0)))
                        .unwrap();
                }
                (book, next_id)
            },
            |(mut book, id)| {
                black_box(book.submit(market_quote(id + 1, Side::Bid, dec!(1.0))).unwrap())
            },
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mixed_workload,
    bench_high_frequency_matching,
    bench_market_stress,
    bench_order_book_depth,
    bench_ioc_orders,
    bench_market_orders,
);
criterion_main!(benches);
