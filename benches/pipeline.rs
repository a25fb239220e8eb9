//! Benchmarks for the derived view pipeline.
//!
//! These benchmarks measure filter, sort and group over a few thousand
//! generated issues.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fake::{Fake, Faker};
use issue_dash::issues::{Issue, IssueField};
use issue_dash::pipeline;
use issue_dash::state::{Filters, SortDirection, ViewState};

fn issues(count: usize) -> Vec<Issue> {
    (0..count)
        .map(|n| Issue {
            identifier: format!("ENG-{}", n),
            ..Faker.fake::<Issue>()
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let issues = issues(5000);
    let filters = Filters {
        status: vec!["Todo".to_string(), "In Progress".to_string()],
        ..Filters::default()
    };
    c.bench_function("filter_5000", |b| {
        b.iter(|| pipeline::filter(black_box(&issues), black_box("eng-1"), &filters).len())
    });
}

fn bench_sort(c: &mut Criterion) {
    let issues = issues(5000);
    c.bench_function("sort_due_date_5000", |b| {
        b.iter(|| {
            pipeline::sort(
                issues.iter().collect(),
                Some(black_box(IssueField::DueDate)),
                SortDirection::Desc,
            )
            .len()
        })
    });
}

fn bench_derive_grouped(c: &mut Criterion) {
    let issues = issues(5000);
    let view = ViewState {
        sort_field: Some(IssueField::Priority),
        group_by: Some(IssueField::Assignee),
        ..ViewState::default()
    };
    c.bench_function("derive_grouped_5000", |b| {
        b.iter(|| pipeline::derive(black_box(&issues), &view, "").sorted.len())
    });
}

criterion_group!(benches, bench_filter, bench_sort, bench_derive_grouped);
criterion_main!(benches);
