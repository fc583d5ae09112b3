//! Common utilities for benchmarks

use camino::Utf8PathBuf;
use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};
use std::fs;
use tempfile::TempDir;

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// A project on disk with `public_files` files in its public directory
pub struct FixtureProject {
    _temp: TempDir,
    pub root: Utf8PathBuf,
}

impl FixtureProject {
    pub fn new(public_files: usize) -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().canonicalize().unwrap()).unwrap();

        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("public/img")).unwrap();
        fs::write(root.join("src/index.html"), "<html></html>").unwrap();
        fs::write(root.join("src/index.js"), "export {}").unwrap();
        fs::write(
            root.join("package.json"),
            r#"{"name": "bench-app", "homepage": "https://example.test/app"}"#,
        )
        .unwrap();

        for i in 0..public_files {
            fs::write(root.join(format!("public/img/{i}.svg")), format!("<svg id=\"{i}\"/>")).unwrap();
        }

        Self { _temp: temp, root }
    }

    pub fn write_override(&self, content: &str) {
        fs::write(self.root.join("static-site-builder.config.json"), content).unwrap();
    }
}
