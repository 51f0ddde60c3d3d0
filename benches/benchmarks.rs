use setroom::Card;
use setroom::cards::*;
use setroom::gameroom::*;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        judging_single_match,
        scanning_full_deck,
        scanning_dealt_table,
        toggling_markers,
}

fn judging_single_match(c: &mut criterion::Criterion) {
    let oracle = SetOracle::default();
    c.bench_function("judge one 3-card claim", |b| {
        b.iter(|| oracle.is_match(criterion::black_box(&[0, 40, 80])))
    });
}

fn scanning_full_deck(c: &mut criterion::Criterion) {
    let oracle = SetOracle::default();
    let deck = Deck::new(setroom::DECK_SIZE);
    c.bench_function("find any match in an 81-card deck", |b| {
        b.iter(|| oracle.any_match(deck.cards()))
    });
}

fn scanning_dealt_table(c: &mut criterion::Criterion) {
    let oracle = SetOracle::default();
    // twelve cards with no match among them
    let table: [Card; 12] = [0, 1, 3, 4, 9, 10, 12, 13, 27, 28, 30, 31];
    c.bench_function("exhaust a matchless 12-card table", |b| {
        b.iter(|| oracle.any_match(criterion::black_box(&table)))
    });
}

fn toggling_markers(c: &mut criterion::Criterion) {
    let table = Table::new(12);
    (0..12).for_each(|slot| table.place(slot as Card, slot));
    table.open();
    c.bench_function("toggle a marker on and off", |b| {
        b.iter(|| {
            table.toggle(0, 5);
            table.toggle(0, 5)
        })
    });
}
