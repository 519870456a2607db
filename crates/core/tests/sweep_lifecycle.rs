//! Sweep lifecycle integration tests.
//!
//! These tests run the tree processor over temporary directories with mock
//! tools:
//! - Basic conversion, skip and failure scenarios
//! - Idempotent reruns and the source/target invariant
//! - Fatal abort when ffmpeg is missing
//! - Concurrent runs matching sequential ones

mod common;

use std::time::Duration;

use common::{failed_paths, TestTree};
use flacsweep_core::{
    testing::{TranscodeBehavior, FLAC_BYTES},
    ConverterError, FailureReason, ProcessorConfig, ProcessorError,
};

#[tokio::test]
async fn test_alac_file_is_converted_and_removed() {
    let tree = TestTree::new();
    tree.add("song.m4a", "alac").await;

    let summary = tree.run(1).await.unwrap();

    assert!(tree.exists("song.flac"));
    assert!(!tree.exists("song.m4a"));
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.skipped(), 0);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_aac_file_is_skipped() {
    let tree = TestTree::new();
    tree.add("track.m4a", "aac").await;

    let summary = tree.run(1).await.unwrap();

    assert!(tree.exists("track.m4a"));
    assert!(!tree.exists("track.flac"));
    assert_eq!(summary.skipped_wrong_codec, 1);
    assert_eq!(summary.converted, 0);
    assert_eq!(tree.tools.transcode_count().await, 0);
}

#[tokio::test]
async fn test_existing_target_is_left_alone() {
    let tree = TestTree::new();
    tree.add("a.m4a", "alac").await;
    tree.write("a.flac", b"already here");
    let before = tree.snapshot();

    let summary = tree.run(1).await.unwrap();

    assert_eq!(tree.snapshot(), before);
    assert_eq!(summary.skipped_exists, 1);
    assert_eq!(summary.converted, 0);
}

#[tokio::test]
async fn test_failed_transcode_keeps_source_and_continues() {
    let tree = TestTree::new();
    let bad = tree.add("b.m4a", "alac").await;
    tree.add("c.m4a", "alac").await;
    tree.tools
        .set_transcode_behavior(
            &bad,
            TranscodeBehavior::FailAfterPartialWrite {
                stderr: "Invalid data found when processing input".to_string(),
            },
        )
        .await;

    let summary = tree.run(1).await.unwrap();

    assert!(tree.exists("b.m4a"));
    assert!(!tree.exists("b.flac"));
    assert!(tree.exists("c.flac"));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failures[0].path, bad);
    assert!(matches!(
        &summary.failures[0].reason,
        FailureReason::Transcode { stderr } if stderr.contains("Invalid data")
    ));
}

#[tokio::test]
async fn test_missing_output_is_a_failure() {
    let tree = TestTree::new();
    let source = tree.add("ghost.m4a", "alac").await;
    tree.tools
        .set_transcode_behavior(&source, TranscodeBehavior::SucceedWithoutOutput)
        .await;

    let summary = tree.run(1).await.unwrap();

    assert!(tree.exists("ghost.m4a"));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].reason, FailureReason::OutputMissing);
}

#[tokio::test]
async fn test_probe_failure_is_skipped() {
    let tree = TestTree::new();
    let broken = tree.add("broken.m4a", "alac").await;
    tree.tools
        .set_probe_error(&broken, ConverterError::unparseable("no audio stream"))
        .await;
    tree.write("unknown.alac", b"???");

    let summary = tree.run(1).await.unwrap();

    assert!(tree.exists("broken.m4a"));
    assert!(tree.exists("unknown.alac"));
    assert_eq!(summary.skipped_wrong_codec, 2);
    assert_eq!(tree.tools.transcode_count().await, 0);
}

#[tokio::test]
async fn test_non_candidates_are_ignored() {
    let tree = TestTree::new();
    tree.write("cover.jpg", b"jpeg");
    tree.write("notes.txt", b"text");
    tree.write("already.flac", b"flac");
    tree.add("nested/deep/SONG.M4A", "alac").await;

    let summary = tree.run(1).await.unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(summary.converted, 1);
    assert!(tree.exists("nested/deep/SONG.flac"));
    assert!(tree.exists("cover.jpg"));
    assert_eq!(tree.tools.probe_count(), 1);
}

#[tokio::test]
async fn test_second_run_changes_nothing() {
    let tree = TestTree::new();
    tree.add("one.m4a", "alac").await;
    tree.add("two.alac", "alac").await;
    tree.add("aac.m4a", "aac").await;
    tree.add("kept.m4a", "alac").await;
    tree.write("kept.flac", b"old");

    let first = tree.run(1).await.unwrap();
    assert_eq!(first.converted, 2);
    let after_first = tree.snapshot();

    let second = tree.run(1).await.unwrap();

    assert_eq!(tree.snapshot(), after_first);
    assert_eq!(second.converted, 0);
    assert_eq!(second.failed, 0);
    assert_eq!(second.skipped_exists, 1);
    assert_eq!(second.skipped_wrong_codec, 1);
    assert_eq!(tree.tools.transcode_count().await, 2);
}

#[tokio::test]
async fn test_source_or_target_but_never_both() {
    let tree = TestTree::new();
    let names = ["ok1", "ok2", "partial", "empty", "fail", "aac"];
    for name in names {
        let codec = if name == "aac" { "aac" } else { "alac" };
        tree.add(&format!("{name}.m4a"), codec).await;
    }
    tree.tools
        .set_transcode_behavior(
            tree.path("partial.m4a"),
            TranscodeBehavior::FailAfterPartialWrite {
                stderr: "Conversion failed!".to_string(),
            },
        )
        .await;
    tree.tools
        .set_transcode_behavior(tree.path("empty.m4a"), TranscodeBehavior::SucceedWithoutOutput)
        .await;
    tree.tools
        .set_transcode_behavior(
            tree.path("fail.m4a"),
            TranscodeBehavior::Fail {
                stderr: "Conversion failed!".to_string(),
            },
        )
        .await;

    let summary = tree.run(1).await.unwrap();
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.skipped_wrong_codec, 1);

    for name in names {
        let source = tree.exists(&format!("{name}.m4a"));
        let target = tree.exists(&format!("{name}.flac"));
        assert!(source != target, "{name}: source={source} target={target}");
    }
}

#[tokio::test]
async fn test_missing_ffmpeg_aborts_sequential_run() {
    let tree = TestTree::new();
    for i in 0..10 {
        tree.add(&format!("song{i:02}.m4a"), "alac").await;
    }
    tree.tools.set_ffmpeg_missing(true).await;
    let before = tree.snapshot();

    let err = tree.run(1).await.unwrap_err();

    assert!(matches!(err, ProcessorError::ToolNotFound { .. }));
    assert_eq!(tree.snapshot(), before);
    assert_eq!(tree.tools.probe_count(), 1);
}

#[tokio::test]
async fn test_missing_ffmpeg_aborts_concurrent_run() {
    let tree = TestTree::new();
    for i in 0..40 {
        tree.add(&format!("song{i:02}.m4a"), "alac").await;
    }
    tree.tools.set_ffmpeg_missing(true).await;
    let before = tree.snapshot();

    let err = tree.run(4).await.unwrap_err();

    assert!(matches!(err, ProcessorError::ToolNotFound { .. }));
    assert_eq!(tree.snapshot(), before);
    assert!(tree.tools.probe_count() <= 4);
}

#[tokio::test]
async fn test_fatal_error_lets_in_flight_file_finish() {
    let tree = TestTree::new();
    let slow = tree.add("slow.m4a", "alac").await;
    let fast = tree.add("zfast.m4a", "alac").await;
    tree.tools
        .set_transcode_behavior(&slow, TranscodeBehavior::SucceedAfter(Duration::from_millis(300)))
        .await;
    tree.tools
        .set_transcode_behavior(&fast, TranscodeBehavior::ToolMissing)
        .await;

    let err = tree.run(2).await.unwrap_err();

    assert!(matches!(err, ProcessorError::ToolNotFound { .. }));
    assert!(tree.exists("zfast.m4a"));
    assert!(!tree.exists("zfast.flac"));

    // Either the slow file never started or it ran to completion.
    let source = tree.exists("slow.m4a");
    let target = tree.exists("slow.flac");
    assert!(source != target, "source={source} target={target}");
    if target {
        assert_eq!(std::fs::read(tree.path("slow.flac")).unwrap(), FLAC_BYTES);
    }
}

#[tokio::test]
async fn test_wrong_codec_files_do_not_need_ffmpeg() {
    let tree = TestTree::new();
    tree.add("a.m4a", "aac").await;
    tree.add("b.m4a", "mp3").await;
    tree.tools.set_ffmpeg_missing(true).await;

    let summary = tree.run(1).await.unwrap();

    assert_eq!(summary.skipped_wrong_codec, 2);
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let tree = TestTree::new();
    tree.add("a.m4a", "alac").await;
    tree.add("b/c.alac", "alac").await;
    tree.add("d.m4a", "aac").await;
    tree.add("e.m4a", "alac").await;
    tree.write("e.flac", b"old");
    let before = tree.snapshot();

    let summary = tree
        .run_with(ProcessorConfig::default().with_dry_run(true))
        .await
        .unwrap();

    assert_eq!(tree.snapshot(), before);
    assert_eq!(summary.planned, 2);
    assert_eq!(summary.converted, 0);
    assert_eq!(summary.skipped_wrong_codec, 1);
    assert_eq!(summary.skipped_exists, 1);
    assert_eq!(tree.tools.transcode_count().await, 0);
}

async fn mixed_tree() -> TestTree {
    let tree = TestTree::new();
    for i in 0..30 {
        let rel = format!("disc{}/track{i:02}.m4a", i % 3);
        let codec = if i % 4 == 0 { "aac" } else { "alac" };
        let path = tree.add(&rel, codec).await;
        if i % 7 == 0 {
            tree.tools
                .set_transcode_behavior(
                    &path,
                    TranscodeBehavior::Fail {
                        stderr: "Conversion failed!".to_string(),
                    },
                )
                .await;
        }
    }
    tree.add("disc0/pair.m4a", "alac").await;
    tree.add("disc0/pair.alac", "alac").await;
    tree.add("disc1/old.m4a", "alac").await;
    tree.write("disc1/old.flac", b"old");
    tree
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential() {
    let sequential_tree = mixed_tree().await;
    let concurrent_tree = mixed_tree().await;
    concurrent_tree
        .tools
        .set_transcode_delay(Duration::from_millis(5))
        .await;

    let sequential = sequential_tree.run(1).await.unwrap();
    let concurrent = concurrent_tree.run(8).await.unwrap();

    assert_eq!(sequential.converted, concurrent.converted);
    assert_eq!(sequential.skipped_wrong_codec, concurrent.skipped_wrong_codec);
    assert_eq!(sequential.skipped_exists, concurrent.skipped_exists);
    assert_eq!(sequential.failed, concurrent.failed);
    assert_eq!(
        failed_paths(&sequential, sequential_tree.root()),
        failed_paths(&concurrent, concurrent_tree.root())
    );
    assert_eq!(sequential.skipped_exists, 2);
}

#[tokio::test]
async fn test_same_target_converted_once() {
    for jobs in [1, 4] {
        let tree = TestTree::new();
        tree.add("a.m4a", "alac").await;
        tree.add("a.alac", "alac").await;
        tree.tools.set_transcode_delay(Duration::from_millis(20)).await;

        let summary = tree.run(jobs).await.unwrap();

        assert_eq!(summary.converted, 1, "jobs={jobs}");
        assert_eq!(summary.skipped_exists, 1, "jobs={jobs}");
        assert_eq!(tree.tools.transcode_count().await, 1, "jobs={jobs}");
        assert!(tree.exists("a.flac"));
        assert!(tree.exists("a.m4a") != tree.exists("a.alac"));
    }
}

#[tokio::test]
async fn test_worker_limit_is_respected() {
    let tree = TestTree::new();
    for i in 0..12 {
        tree.add(&format!("song{i:02}.m4a"), "alac").await;
    }
    tree.tools.set_transcode_delay(Duration::from_millis(30)).await;

    let summary = tree.run(3).await.unwrap();

    assert_eq!(summary.converted, 12);
    let peak = tree.tools.peak_concurrency();
    assert!(peak <= 3, "peak concurrency {peak}");
    assert!(peak >= 2, "peak concurrency {peak}");
}

#[tokio::test]
async fn test_sequential_run_never_overlaps() {
    let tree = TestTree::new();
    for i in 0..5 {
        tree.add(&format!("song{i}.m4a"), "alac").await;
    }
    tree.tools.set_transcode_delay(Duration::from_millis(5)).await;

    tree.run(1).await.unwrap();

    assert_eq!(tree.tools.peak_concurrency(), 1);
}

#[tokio::test]
async fn test_invalid_root_is_rejected() {
    let tree = TestTree::new();
    let file = tree.write("file.m4a", b"x");

    let err = tree
        .processor(ProcessorConfig::default())
        .run(&file)
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::InvalidRoot { .. }));

    let err = tree
        .processor(ProcessorConfig::default())
        .run(&tree.path("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::InvalidRoot { .. }));
}
