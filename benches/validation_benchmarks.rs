use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flight_list_check::check::check_reader;
use flight_list_check::parser::{parse_text, ListFormat};
use flight_list_check::validation::{reconcile, Reference, Rules};

fn waypoint(i: usize) -> String {
    format!("WPT{:05}", i)
}

/// Generate list content with specific reconciliation scenarios
fn generate_list_content(lines: usize, scenario: &str) -> Vec<String> {
    let mut content = Vec::new();

    match scenario {
        "all_valid" => {
            for i in 0..lines {
                content.push(format!("{},{}", waypoint(i), 1000 + i));
            }
        }
        "duplicates" => {
            for i in 0..lines {
                // Every fourth entry repeats an earlier key
                let key = if i % 4 == 3 { waypoint(i / 2) } else { waypoint(i) };
                content.push(format!("{},{}", key, 1000 + i));
            }
        }
        "malformed" => {
            for i in 0..lines {
                match i % 5 {
                    0 => content.push(format!("{},{},extra", waypoint(i), i)),
                    1 => content.push(format!(",{}", i)),
                    _ => content.push(format!("{},{}", waypoint(i), i)),
                }
            }
        }
        "shuffled" => {
            // Pairwise swaps break reference order throughout the list
            for i in 0..lines {
                let j = if i % 2 == 0 { i + 1 } else { i - 1 };
                content.push(format!("{},{}", waypoint(j.min(lines - 1)), i));
            }
        }
        "mixed_errors" => {
            for i in 0..lines {
                match i % 10 {
                    0..=5 => content.push(format!("{},{}", waypoint(i), i)),
                    6 => content.push(format!("{},{}", waypoint(i / 3), i)),
                    7 => content.push(format!("UNKNOWN{},{}", i, i)),
                    8 => content.push(format!("{},{},{}", waypoint(i), i, i)),
                    9 => content.push(format!("# comment line {}", i)),
                    _ => unreachable!(),
                }
            }
        }
        _ => {
            for i in 0..lines {
                content.push(waypoint(i));
            }
        }
    }

    content
}

fn reference_for(lines: usize) -> Reference {
    Reference::from_keys((0..lines).map(waypoint))
}

fn full_rules(lines: usize) -> Rules {
    Rules {
        reference: Some(reference_for(lines)),
        check_order: true,
        reject_unknown: true,
        strict: false,
    }
}

fn bench_format() -> ListFormat {
    ListFormat {
        expected_fields: Some(2),
        ..ListFormat::default()
    }
}

/// Benchmark the whole pipeline with different finding densities
fn bench_reconcile_scenarios(c: &mut Criterion) {
    let scenarios = vec![
        ("all_valid", "Unique, complete and ordered"),
        ("duplicates", "25% repeated keys"),
        ("malformed", "40% malformed entries"),
        ("shuffled", "Every pair swapped"),
        ("mixed_errors", "40% various findings"),
    ];

    let format = bench_format();
    let rules = full_rules(5000);
    let mut group = c.benchmark_group("reconcile_scenarios");

    for (scenario, _description) in scenarios {
        let content_lines = generate_list_content(5000, scenario);
        let content = content_lines.join("\n");

        group.throughput(Throughput::Elements(content_lines.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("scenario", scenario),
            &content,
            |b, content| {
                b.iter(|| {
                    let report =
                        check_reader(black_box(content.as_bytes()), "<bench>", &format, &rules);
                    black_box(report)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark scalability with different list sizes
fn bench_reconcile_scalability(c: &mut Criterion) {
    let file_sizes = vec![100, 1_000, 10_000, 100_000];
    let format = bench_format();

    let mut group = c.benchmark_group("reconcile_scalability");

    for &size in &file_sizes {
        let content = generate_list_content(size, "mixed_errors").join("\n");
        let rules = full_rules(size);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("size", size), &content, |b, content| {
            b.iter(|| {
                let report =
                    check_reader(black_box(content.as_bytes()), "<bench>", &format, &rules);
                black_box(report)
            })
        });
    }

    group.finish();
}

/// Benchmark the engine alone on pre-normalized entries, per rule set
fn bench_rule_cost(c: &mut Criterion) {
    let format = bench_format();
    let content = generate_list_content(20_000, "shuffled").join("\n");
    let entries = parse_text(&content, &format).expect("valid bench content");

    let rule_sets = vec![
        ("uniqueness_only", Rules::default()),
        (
            "with_reference",
            Rules {
                reference: Some(reference_for(20_000)),
                ..Rules::default()
            },
        ),
        ("with_order", full_rules(20_000)),
    ];

    let mut group = c.benchmark_group("rule_cost");
    group.throughput(Throughput::Elements(entries.len() as u64));

    for (name, rules) in rule_sets {
        group.bench_with_input(BenchmarkId::new("rules", name), &rules, |b, rules| {
            b.iter(|| {
                let report = reconcile(black_box(entries.clone()), black_box(rules));
                black_box(report)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_reconcile_scenarios,
    bench_reconcile_scalability,
    bench_rule_cost
);
criterion_main!(benches);
