/// Benchmarks for the search normalizer
///
/// Measures per-query cost of normalization and alias expansion, and the
/// in-process matcher over a batch of records.
///
/// Run with: cargo bench --bench search_expansion
use catalog_common::search::{expand_search_terms, normalize, AliasEntry, AliasTable};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const QUERIES: &[&str] = &["أمريكا", "المملكة", "usa", "مَدْرَسَة", "United", "x"];

fn large_table(size: usize) -> AliasTable {
    let entries = (0..size)
        .map(|i| {
            AliasEntry::new(
                format!("الدولة رقم {}", i),
                [format!("country-{}", i), format!("دولة{}", i)],
            )
        })
        .collect();
    AliasTable::new(entries).unwrap_or_else(|_| AliasTable::empty())
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for query in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(query), query, |b, q| {
            b.iter(|| normalize(black_box(q)))
        });
    }
    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_search_terms");
    for size in [4usize, 100, 1_000] {
        let table = if size == 4 {
            AliasTable::default()
        } else {
            large_table(size)
        };
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("table_size", size), &table, |b, table| {
            b.iter(|| expand_search_terms(black_box("أمريكا"), table))
        });
    }
    group.finish();
}

fn bench_matches(c: &mut Criterion) {
    let records: Vec<[String; 2]> = (0..1_000)
        .map(|i| [format!("Contact {}", i), format!("الولايات المتحدة {}", i)])
        .collect();
    let terms = expand_search_terms("أمريكا", &AliasTable::default());

    let mut group = c.benchmark_group("matches");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("1000_records", |b| {
        b.iter(|| {
            records
                .iter()
                .filter(|r| terms.matches(r.iter().map(String::as_str)))
                .count()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_expand, bench_matches);
criterion_main!(benches);
