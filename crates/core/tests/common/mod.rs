//! Common test utilities for sweeping temporary trees with mock tools.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use flacsweep_core::{
    testing::MockMediaTools, ProcessorConfig, ProcessorError, RunSummary, TreeProcessor,
};

/// A temporary music tree plus the mock tools that know its codecs.
///
/// # Example
///
/// ```rust,ignore
/// let tree = TestTree::new();
/// tree.add("album/song.m4a", "alac").await;
///
/// let summary = tree.run(1).await.unwrap();
/// assert_eq!(summary.converted, 1);
/// ```
pub struct TestTree {
    pub dir: TempDir,
    pub tools: MockMediaTools,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            tools: MockMediaTools::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Creates `rel` with some bytes and makes the mock report `codec` for it.
    pub async fn add(&self, rel: &str, codec: &str) -> PathBuf {
        let path = self.write(rel, rel.as_bytes());
        self.tools.set_codec(&path, codec).await;
        path
    }

    /// Creates `rel` without telling the mock anything about it.
    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn processor(&self, config: ProcessorConfig) -> TreeProcessor<MockMediaTools> {
        TreeProcessor::new(config, self.tools.clone())
    }

    pub async fn run(&self, jobs: usize) -> Result<RunSummary, ProcessorError> {
        self.run_with(ProcessorConfig::default().with_max_conversions(jobs))
            .await
    }

    pub async fn run_with(&self, config: ProcessorConfig) -> Result<RunSummary, ProcessorError> {
        self.processor(config).run(self.root()).await
    }

    /// Every file in the tree with its contents, keyed by relative path.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), self.root(), &mut files);
        files
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).expect("Path outside root").to_path_buf();
            files.insert(rel, fs::read(&path).expect("Failed to read file"));
        }
    }
}

/// Failure paths relative to `root`, sorted.
pub fn failed_paths(summary: &RunSummary, root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = summary
        .failures
        .iter()
        .map(|f| f.path.strip_prefix(root).unwrap_or(&f.path).to_path_buf())
        .collect();
    paths.sort();
    paths
}
