use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use referrer_core::{load_list, Classifier};
use referrer_rules::{default_rules, default_user_agents};

const SUFFIXES: &str = include_str!("../../referrer-core/tests/data/public_suffix_list.dat");

const URLS: &[&str] = &[
    "https://www.google.co.uk/search?q=walrus",
    "https://www.bing.com/search?Q=rust&form=QBLH",
    "https://l.facebook.com/l.php?u=https%3A%2F%2Fexample.com%2F",
    "https://mail.google.com/mail/u/0/",
    "https://t.co/AbC123",
    "https://blog.walrus-cafe.org/posts/1",
    "http://search.yahoo.co.jp/search;_ylt=A2RA?p=ramen",
    "https://example.com/#q=fragment",
    "not a url at all",
    "",
];

fn classifier() -> Classifier {
    let suffixes = load_list(SUFFIXES).unwrap();
    Classifier::new(default_rules().unwrap(), suffixes).with_user_agents(default_user_agents().unwrap())
}

fn bench_classify(c: &mut Criterion) {
    let classifier = classifier();
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(URLS.len() as u64));

    group.bench_function("mixed", |b| {
        b.iter(|| {
            for url in URLS {
                black_box(classifier.parse(black_box(url)));
            }
        });
    });

    group.bench_function("mixed_with_direct", |b| {
        let direct = ["walrus-cafe.org", "blog.walrus-cafe.org"];
        b.iter(|| {
            for url in URLS {
                black_box(classifier.parse_with_direct(black_box(url), &direct));
            }
        });
    });

    group.finish();
}

fn bench_user_agent(c: &mut Criterion) {
    let classifier = classifier();
    let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 9_2 like Mac OS X) Mobile/13C75 Twitter for iPhone";

    c.bench_function("user_agent_fallback", |b| {
        b.iter(|| black_box(classifier.parse_with::<&str>("", &[], Some(black_box(ua)))));
    });
}

fn bench_load_rules(c: &mut Criterion) {
    c.bench_function("load_default_rules", |b| {
        b.iter(|| black_box(default_rules().unwrap()));
    });
}

criterion_group!(benches, bench_classify, bench_user_agent, bench_load_rules);
criterion_main!(benches);
