use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tabula::{Column, DataType, Table, Value, execute};

fn setup_populated_table(n: usize) -> Table {
    let mut table = Table::with_columns(
        "users",
        vec![
            Column::new("id", DataType::Integer).primary_key(),
            Column::new("name", DataType::Text),
            Column::new("age", DataType::Integer),
            Column::new("active", DataType::Boolean),
        ],
    );

    for i in 0..n {
        let row = vec![
            Value::Integer(i as i64),
            Value::Text(format!("user{}", i)),
            Value::Integer((i % 100) as i64),
            Value::Boolean(i % 2 == 0),
        ];
        table.insert_row(row).unwrap();
    }
    table
}

fn bench_insert_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_SQL_Pipeline");
    group.bench_function("insert_single_row_sql", |b| {
        let dir = tempfile::tempdir().unwrap();
        let mut db = tabula::Database::new("bench", dir.path()).unwrap();
        execute(&mut db, "CREATE TABLE tests (id INTEGER)");
        b.iter(|| {
            black_box(execute(&mut db, black_box("INSERT INTO tests VALUES (42)")));
        });
    });
    group.finish();
}

fn bench_select_indexed_vs_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Where_Performance");

    for n in [1000, 10000].iter() {
        let table = setup_populated_table(*n);
        let key = Value::Integer((*n / 2) as i64);

        group.bench_with_input(BenchmarkId::new("indexed", n), n, |b, _| {
            b.iter(|| black_box(table.select_where("id", black_box(&key)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("scan", n), n, |b, _| {
            b.iter(|| black_box(table.select_where("age", black_box(&Value::Integer(42))).unwrap()));
        });
    }
    group.finish();
}

fn bench_delete_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Delete_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_with_setup(
                || setup_populated_table(n),
                |mut table| {
                    table.delete_where("active", &Value::Boolean(true)).unwrap();
                    black_box(table);
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_sql,
    bench_select_indexed_vs_scan,
    bench_delete_performance
);
criterion_main!(benches);
