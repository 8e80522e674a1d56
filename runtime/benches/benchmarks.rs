use codspeed_criterion_compat::{Criterion, black_box, criterion_group, criterion_main};
use schemer::{Interpreter, analyze, read};
use std::time::Duration;

fn numbers_source(n: usize) -> String {
    let items: Vec<String> = (0..n).map(|i| i.to_string()).collect();
    format!("'({})", items.join(" "))
}

// ============================================================================
// Reading Benchmarks
// ============================================================================

fn bench_read_small(c: &mut Criterion) {
    c.bench_function("read small expr", |b| {
        b.iter(|| black_box(read("(cons 1 2)").unwrap()))
    });
}

fn bench_read_large_list(c: &mut Criterion) {
    let expr = numbers_source(1000);
    c.bench_function("read large list (1000 elements)", |b| {
        b.iter(|| black_box(read(&expr).unwrap()))
    });
}

fn bench_read_deep_nesting(c: &mut Criterion) {
    let mut expr = String::from("1");
    for _ in 0..100 {
        expr = format!("(+ {expr} 1)");
    }

    c.bench_function("read deep nesting (100 levels)", |b| {
        b.iter(|| black_box(read(&expr).unwrap()))
    });
}

// ============================================================================
// Analysis Benchmarks
// ============================================================================

fn bench_analyze_procedure(c: &mut Criterion) {
    let expr = read(
        "(define (fib n)
           (cond ((eq? n 0) 0)
                 ((eq? n 1) 1)
                 (else (+ (fib (- n 1)) (fib (- n 2))))))",
    )
    .unwrap();

    c.bench_function("analyze procedure definition", |b| {
        b.iter(|| black_box(analyze(&expr).unwrap()))
    });
}

fn bench_analyze_prelude(c: &mut Criterion) {
    let expr = read(schemer::prelude::SOURCE).unwrap();
    c.bench_function("analyze bootstrap library", |b| {
        b.iter(|| black_box(analyze(&expr).unwrap()))
    });
}

// ============================================================================
// Evaluation Benchmarks
// ============================================================================

fn bench_eval_arithmetic(c: &mut Criterion) {
    let interp = Interpreter::new();
    let expr = read("(+ (* 2 3) (- 10 5) (/ 20 4))").unwrap();

    c.bench_function("eval nested arithmetic", |b| {
        b.iter(|| black_box(interp.eval(&expr).unwrap()))
    });
}

fn bench_eval_preanalyzed(c: &mut Criterion) {
    let interp = Interpreter::new();
    interp
        .parse("(define (sum-to n acc) (if (eq? n 0) acc (sum-to (- n 1) (+ acc n))))")
        .unwrap();
    let proc = analyze(&read("(sum-to 100 0)").unwrap()).unwrap();

    c.bench_function("eval pre-analyzed recursion (100 calls)", |b| {
        b.iter(|| black_box(proc(interp.global_env()).unwrap()))
    });
}

fn bench_eval_fibonacci(c: &mut Criterion) {
    let interp = Interpreter::new();
    interp
        .parse("(define (fib n) (if (eq? n 0) 0 (if (eq? n 1) 1 (+ (fib (- n 1)) (fib (- n 2))))))")
        .unwrap();
    let expr = read("(fib 15)").unwrap();

    c.bench_function("eval fibonacci 15", |b| {
        b.iter(|| black_box(interp.eval(&expr).unwrap()))
    });
}

// ============================================================================
// Bootstrap Library Benchmarks
// ============================================================================

fn bench_prelude_load(c: &mut Criterion) {
    c.bench_function("load bootstrap library", |b| {
        b.iter(|| black_box(Interpreter::with_prelude().unwrap()))
    });
}

fn bench_prelude_length(c: &mut Criterion) {
    let interp = Interpreter::with_prelude().unwrap();
    let expr = read(&format!("(length {})", numbers_source(200))).unwrap();

    c.bench_function("prelude length (200 elements)", |b| {
        b.iter(|| black_box(interp.eval(&expr).unwrap()))
    });
}

fn bench_prelude_reverse(c: &mut Criterion) {
    let interp = Interpreter::with_prelude().unwrap();
    let expr = read(&format!("(reverse {})", numbers_source(200))).unwrap();

    c.bench_function("prelude reverse (200 elements)", |b| {
        b.iter(|| black_box(interp.eval(&expr).unwrap()))
    });
}

fn bench_prelude_unique(c: &mut Criterion) {
    let interp = Interpreter::with_prelude().unwrap();
    let expr = read("(unique '(1 2 3 1 2 3 4 5 4 5 6 7 8 9 1 2 3))").unwrap();

    c.bench_function("prelude unique", |b| {
        b.iter(|| black_box(interp.eval(&expr).unwrap()))
    });
}

fn bench_prelude_flatten(c: &mut Criterion) {
    let interp = Interpreter::with_prelude().unwrap();
    let expr = read("(flatten '(((1) 2 3) ((4 5) 6) (7 (8 (9 (10))))))").unwrap();

    c.bench_function("prelude flatten", |b| {
        b.iter(|| black_box(interp.eval(&expr).unwrap()))
    });
}

criterion_group! {
    name = read_benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(5));
    targets =
        bench_read_small,
        bench_read_large_list,
        bench_read_deep_nesting,
}

criterion_group! {
    name = eval_benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    targets =
        bench_analyze_procedure,
        bench_analyze_prelude,
        bench_eval_arithmetic,
        bench_eval_preanalyzed,
        bench_eval_fibonacci,
}

criterion_group! {
    name = prelude_benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    targets =
        bench_prelude_load,
        bench_prelude_length,
        bench_prelude_reverse,
        bench_prelude_unique,
        bench_prelude_flatten,
}

criterion_main!(read_benches, eval_benches, prelude_benches);
