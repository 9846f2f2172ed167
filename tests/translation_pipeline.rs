//! 翻译编排集成测试
//!
//! 覆盖分句、缓存命中、并发请求和请求截止时间

use std::sync::Arc;
use std::time::Duration;

use caching_translate::translation::{
    CacheStore, Fingerprint, MemoryCacheStore, TranslationConfig, TranslationError,
    TranslationRequest,
};

mod common;

use common::{build_service, echo_translation, test_config, Script, ScriptedBackend};

fn request(text: &str) -> TranslationRequest {
    TranslationRequest::new("en", "es", text)
}

/// 同一请求两次：第二次全部命中，后端每个分句只调用一次
#[tokio::test]
async fn test_idempotent_caching() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::echo();
    let service = build_service(test_config(), store.clone(), backend.clone());

    let first = service
        .translate(&request("Hello. World."))
        .await
        .expect("first request should succeed");
    assert_eq!(first.translated_text, "[es]Hello.[es] World.");
    assert!(!first.cache_hit);
    assert_eq!(first.cache_misses, 2);
    assert_eq!(backend.calls(), 2);
    assert_eq!(store.len(), 2);

    let second = service
        .translate(&request("Hello. World."))
        .await
        .expect("second request should succeed");
    assert_eq!(second.translated_text, first.translated_text);
    assert!(second.cache_hit);
    assert_eq!(second.cache_hits, 2);
    assert_eq!(second.cache_misses, 0);
    assert_eq!(backend.calls(), 2, "second request must not reach the backend");

    println!("✅ Idempotent caching test passed");
}

/// 分句文本完全相同的片段共用缓存条目
#[tokio::test]
async fn test_repeated_segment_shares_entry() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::echo();
    let service = build_service(test_config(), store.clone(), backend.clone());

    service
        .translate(&request("Hi.Hi.Hi."))
        .await
        .expect("request should succeed");

    assert_eq!(store.len(), 1);
    assert_eq!(backend.calls_for("Hi."), 1);
}

/// 只有分隔符的输入：零个分句，不访问后端
#[tokio::test]
async fn test_only_delimiters() {
    let backend = ScriptedBackend::echo();
    let service = build_service(
        test_config(),
        Arc::new(MemoryCacheStore::new()),
        backend.clone(),
    );

    let outcome = service.translate(&request("...")).await.unwrap();
    assert_eq!(outcome.translated_text, "");
    assert!(!outcome.cache_hit);
    assert_eq!(outcome.segments, 0);
    assert_eq!(backend.calls(), 0);
}

/// 没有终止符的文本不产生分句
#[tokio::test]
async fn test_unterminated_input_yields_empty_translation() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::echo();
    let service = build_service(test_config(), store.clone(), backend.clone());

    let outcome = service.translate(&request("Hello")).await.unwrap();
    assert_eq!(outcome.translated_text, "");
    assert_eq!(outcome.segments, 0);
    assert_eq!(backend.calls(), 0);
    assert!(store.is_empty());

    let outcome = service.translate(&request("Hello. World")).await.unwrap();
    assert_eq!(outcome.translated_text, "[es]Hello.");
    assert_eq!(backend.calls(), 1);
}

/// 缓存条目按语言对区分
#[tokio::test]
async fn test_language_pair_is_part_of_identity() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::echo();
    let service = build_service(test_config(), store.clone(), backend.clone());

    service
        .translate(&TranslationRequest::new("en", "es", "Hello."))
        .await
        .unwrap();
    let outcome = service
        .translate(&TranslationRequest::new("en", "fr", "Hello."))
        .await
        .unwrap();

    assert!(!outcome.cache_hit);
    assert_eq!(outcome.translated_text, "[fr]Hello.");
    assert_eq!(store.len(), 2);
}

/// 写入的条目携带原文、语言和 1 天的过期时间
#[tokio::test]
async fn test_inserted_entry_contents() {
    let store = Arc::new(MemoryCacheStore::new());
    let service = build_service(test_config(), store.clone(), ScriptedBackend::echo());

    service.translate(&request("Hello.")).await.unwrap();

    let key = Fingerprint::generate("en", "es", "Hello.");
    let entry = store.peek(&key).expect("entry should be stored");
    assert_eq!(entry.source_lang, "en");
    assert_eq!(entry.target_lang, "es");
    assert_eq!(entry.source_text, "Hello.");
    assert_eq!(entry.translated_text, "[es]Hello.");

    let ttl = entry.expires_at - chrono::Utc::now();
    assert!(ttl > chrono::Duration::hours(23));
    assert!(ttl <= chrono::Duration::days(1));
}

/// 并发的相同请求不会产生不一致的条目
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_requests() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::echo();
    let service = Arc::new(build_service(test_config(), store.clone(), backend.clone()));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.translate(&request("One. Two. Three.")).await
        }));
    }

    for handle in handles {
        let outcome = handle.await.unwrap().expect("request should succeed");
        assert_eq!(outcome.translated_text, "[es]One.[es] Two.[es] Three.");
    }

    assert_eq!(store.len(), 3);
    for text in ["One.", " Two.", " Three."] {
        let key = Fingerprint::generate("en", "es", text);
        let entry = store.get(&key).await.unwrap().expect("entry should exist");
        assert_eq!(entry.translated_text, echo_translation(text, "es"));
    }
}

/// 分句并发处理时输出仍保持原顺序
#[tokio::test(start_paused = true)]
async fn test_parallel_segments_keep_order() {
    let config = TranslationConfig {
        max_concurrent_segments: 4,
        ..test_config()
    };
    let backend = ScriptedBackend::new(Script::Slow(Duration::from_millis(100)));
    let service = build_service(config, Arc::new(MemoryCacheStore::new()), backend.clone());

    let outcome = service.translate(&request("a.b.c.d.e.f.")).await.unwrap();
    assert_eq!(
        outcome.translated_text,
        "[es]a.[es]b.[es]c.[es]d.[es]e.[es]f."
    );
    assert_eq!(outcome.segments, 6);
    assert_eq!(backend.calls(), 6);
}

/// 超过请求截止时间：返回超时错误，被取消的分句不写入缓存
#[tokio::test(start_paused = true)]
async fn test_deadline_cancels_without_inserting() {
    let config = TranslationConfig {
        request_timeout_secs: 1,
        ..test_config()
    };
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::new(Script::Slow(Duration::from_millis(600)));
    let service = build_service(config, store.clone(), backend.clone());

    let err = service
        .translate(&request("First. Second. Third."))
        .await
        .expect_err("request should exceed its deadline");

    assert!(matches!(err, TranslationError::DeadlineExceeded(_)));
    assert_eq!(err.status_code(), 504);
    // 第一个分句在截止前完成，第二个被取消
    assert_eq!(store.len(), 1);
    assert!(store
        .peek(&Fingerprint::generate("en", "es", " Second."))
        .is_none());
}

/// 自定义分隔符
#[tokio::test]
async fn test_custom_delimiter() {
    let config = TranslationConfig {
        segment_delimiter: '。',
        ..test_config()
    };
    let service = build_service(
        config,
        Arc::new(MemoryCacheStore::new()),
        ScriptedBackend::echo(),
    );

    let outcome = service
        .translate(&TranslationRequest::new("zh", "en", "你好。世界。"))
        .await
        .unwrap();
    assert_eq!(outcome.translated_text, "[en]你好。[en]世界。");
}

/// 统计信息按分句累计
#[tokio::test]
async fn test_service_stats() {
    let service = build_service(
        test_config(),
        Arc::new(MemoryCacheStore::new()),
        ScriptedBackend::echo(),
    );

    service.translate(&request("A. B.")).await.unwrap();
    service.translate(&request("A. C.")).await.unwrap();

    let stats = service.get_stats().snapshot();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 3);
    assert_eq!(stats.errors_encountered, 0);
    assert!((stats.hit_rate() - 0.25).abs() < f64::EPSILON);
}
