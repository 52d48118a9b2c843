//! Benchmark for effect composition: IO, Reader, State, Writer, TaskResult
//! and the Do workflow scope.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use effectkit::data::Unit;
use effectkit::effect::{Do, IO, Reader, State, StateTaskResult, TaskResult, Writer};
use effectkit::validation::{Validation, Validator};
use std::hint::black_box;

// =============================================================================
// Synchronous effects
// =============================================================================

fn benchmark_io_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("io_chain");

    for depth in [1_usize, 5, 10] {
        group.bench_with_input(BenchmarkId::new("flat_map", depth), &depth, |bencher, &depth| {
            bencher.iter(|| {
                let io = (0..depth).fold(IO::pure(black_box(1_i64)), |io, step| {
                    io.flat_map(move |x| IO::pure(x + step as i64))
                });
                black_box(io.run_unsafe())
            });
        });
    }

    group.finish();
}

fn benchmark_reader_state_writer(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("transformers");

    group.bench_function("reader_flat_map_5", |bencher| {
        let reader = (0..5).fold(Reader::asks(|env: i64| env), |reader, step| {
            reader.flat_map(move |x| Reader::asks(move |env: i64| x + env + step))
        });
        bencher.iter(|| black_box(reader.run(black_box(2))));
    });

    group.bench_function("state_counter_10", |bencher| {
        let tick = State::new(|count: u64| (count, count + 1));
        let program = (0..10).fold(tick.clone(), |program, _| {
            let tick = tick.clone();
            program.flat_map(move |_| tick.clone())
        });
        bencher.iter(|| black_box(program.run(black_box(0))));
    });

    group.bench_function("writer_logs_10", |bencher| {
        bencher.iter(|| {
            let writer = (0..10).fold(Writer::<Unit, u32>::pure(Unit), |writer, step| {
                writer.flat_map(move |_| Writer::<Unit, u32>::tell(step))
            });
            black_box(writer.run())
        });
    });

    group.finish();
}

// =============================================================================
// Asynchronous effects
// =============================================================================

fn benchmark_task_result(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("task_result");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("flat_map_5", |bencher| {
        bencher.iter(|| {
            let task = TaskResult::pure(1)
                .flat_map(|x| TaskResult::pure(x + 1))
                .flat_map(|x| TaskResult::pure(x * 2))
                .flat_map(|x| TaskResult::pure(x + 3))
                .flat_map(|x| TaskResult::pure(x * 4))
                .flat_map(|x| TaskResult::pure(x + 5));
            black_box(runtime.block_on(task))
        });
    });

    group.bench_function("state_task_result_counter_5", |bencher| {
        let program = (0..5).fold(StateTaskResult::<u64, u64>::get(), |program, _| {
            program.flat_map(|count| StateTaskResult::put(count + 1).flat_map(|_| StateTaskResult::get()))
        });
        bencher.iter(|| black_box(runtime.block_on(program.run(black_box(0)))));
    });

    group.bench_function("do_scope_bind_5", |bencher| {
        bencher.iter(|| {
            let task = Do::run(|scope| async move {
                let mut total = 0;
                for step in 0..5 {
                    total += scope.bind(TaskResult::pure(step)).await?;
                }
                scope.complete(total)
            });
            black_box(runtime.block_on(task))
        });
    });

    group.finish();
}

// =============================================================================
// Validation
// =============================================================================

fn benchmark_validation(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("validation");

    let validator = (0..10).fold(Validator::<i64>::empty(), |validator, limit| {
        validator.ensure(move |value| *value > limit, format!("must exceed {limit}"))
    });

    group.bench_function("validator_10_rules_valid", |bencher| {
        bencher.iter(|| black_box(validator.validate(black_box(&100))));
    });

    group.bench_function("validator_10_rules_invalid", |bencher| {
        bencher.iter(|| black_box(validator.validate(black_box(&-1))));
    });

    group.bench_function("combine_invalid", |bencher| {
        bencher.iter(|| {
            let left: Validation<i32> = Validation::invalid(["a", "b"]);
            let right: Validation<i32> = Validation::invalid(["c"]);
            black_box(left.combine(right, |x, y| x + y))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_io_chain,
    benchmark_reader_state_writer,
    benchmark_task_result,
    benchmark_validation
);

criterion_main!(benches);
