//! Drives the library entry points the way the binary does.

use sf_bench::{run_all, BenchConfig, Outcome, Strategy};

#[test]
fn stdin_style_input_runs_all_types() {
    let config = BenchConfig::from_input("4 40\n")
        .unwrap()
        .with_env(|var| (var == "SF_BENCH_SEED").then(|| "77".to_string()))
        .unwrap();
    assert_eq!(config.cols, 32);
    assert_eq!(config.seed, 77);

    let mut out = Vec::new();
    let reports = run_all(&config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("TEST FOR ")).collect();
    assert_eq!(
        headers,
        vec![
            "TEST FOR i8",
            "TEST FOR i16",
            "TEST FOR i32",
            "TEST FOR i64",
            "TEST FOR f32",
            "TEST FOR f64",
        ]
    );

    for report in &reports {
        assert!(report.all_match(), "{} results disagree", report.dtype);
        match &report.results[0].outcome {
            Outcome::Completed { mismatch, .. } => assert!(mismatch.is_none()),
            Outcome::Skipped { .. } => panic!("scalar strategy must always run"),
        }
        assert_eq!(report.results[0].strategy, Strategy::Simple);
    }
}

#[test]
fn same_seed_gives_same_dump() {
    let render = || {
        let mut config = BenchConfig::from_input("2 16").unwrap();
        config.seed = 1234;
        config.dump = true;
        let mut out = Vec::new();
        run_all(&config, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .filter(|l| !l.contains("implementation:"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(render(), render());
}

#[test]
fn malformed_input_is_rejected() {
    assert!(BenchConfig::from_input("").is_err());
    assert!(BenchConfig::from_input("ten 16").is_err());
}
