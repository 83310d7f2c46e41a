use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use graph_hash::CommitId;
use graph_lanes::{Lanes, LanesConfig, Revision, RowHandle};

fn id(n: u32) -> CommitId {
    let mut raw = [0u8; 20];
    raw[16..].copy_from_slice(&n.to_be_bytes());
    CommitId::from(raw)
}

/// A straight chain: every commit has exactly one parent.
fn linear_history(len: u32) -> Vec<RowHandle<Revision>> {
    (0..len)
        .map(|n| Revision::new(id(n), vec![id(n + 1)]).into_handle())
        .collect()
}

/// A main chain that opens a two-parent merge every `period` commits and
/// closes the side branch `period / 2` commits later, so lanes keep opening,
/// aging, collapsing, and expanding.
fn branchy_history(len: u32, period: u32) -> Vec<RowHandle<Revision>> {
    let main = |n: u32| id(n);
    let side = |n: u32| id(1_000_000 + n);
    (0..len)
        .map(|n| {
            let parents = if n % period == 0 {
                vec![main(n + 1), side(n)]
            } else if n % period == period / 2 && n >= period / 2 {
                vec![side(n - period / 2), main(n + 1)]
            } else {
                vec![main(n + 1)]
            };
            Revision::new(main(n), parents).into_handle()
        })
        .collect()
}

fn run(history: &[RowHandle<Revision>], config: LanesConfig) {
    let mut lanes: Lanes<Revision> = Lanes::with_config(config).unwrap();
    for handle in history {
        lanes.next(black_box(handle)).unwrap();
    }
}

fn next_throughput(c: &mut Criterion) {
    const LEN: u32 = 10_000;

    let mut group = c.benchmark_group("next_throughput");
    group.throughput(Throughput::Elements(LEN as u64));

    let linear = linear_history(LEN);
    group.bench_function("linear_10k", |b| {
        b.iter_batched(
            || linear.clone(),
            |history| run(&history, LanesConfig::default()),
            BatchSize::SmallInput,
        )
    });

    let branchy = branchy_history(LEN, 64);
    group.bench_function("branchy_10k", |b| {
        b.iter_batched(
            || branchy.clone(),
            |history| run(&history, LanesConfig::default()),
            BatchSize::SmallInput,
        )
    });

    // tight tunables make collapse and expansion fire constantly
    let churny = branchy_history(LEN, 16);
    let tight = LanesConfig {
        collapse_threshold: 6,
        collapse_depth: 3,
        recollapse_gap: 3,
    };
    group.bench_function("collapse_heavy_10k", |b| {
        b.iter_batched(
            || churny.clone(),
            |history| run(&history, tight),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, next_throughput);
criterion_main!(benches);
