//! 错误处理集成测试
//!
//! 缓存故障被吸收，后端不可恢复错误中止请求

use std::sync::Arc;

use caching_translate::translation::{
    Fingerprint, MemoryCacheStore, TranslationError, TranslationRequest,
};

mod common;

use common::{
    build_service, test_config, FaultyStore, Script, ScriptedBackend, StoreFault,
};

fn request(text: &str) -> TranslationRequest {
    TranslationRequest::new("en", "es", text)
}

/// 缓存查询失败时按未命中处理，请求仍然完成
#[tokio::test]
async fn test_lookup_failure_falls_back_to_translation() {
    let store = FaultyStore::new(StoreFault::Lookup);
    let backend = ScriptedBackend::echo();
    let service = build_service(test_config(), store.clone(), backend.clone());

    let outcome = service
        .translate(&request("Hello. World."))
        .await
        .expect("lookup failures must not fail the request");

    assert_eq!(outcome.translated_text, "[es]Hello.[es] World.");
    assert!(!outcome.cache_hit);
    assert_eq!(backend.calls(), 2);
    // 写入仍然进行
    assert_eq!(store.stored(), 2);
    assert_eq!(service.get_stats().snapshot().cache_errors, 2);

    println!("✅ Lookup failure fallback test passed");
}

/// 缓存写入失败只记录日志，译文照常返回
#[tokio::test]
async fn test_insert_failure_is_non_fatal() {
    let store = FaultyStore::new(StoreFault::Insert);
    let backend = ScriptedBackend::echo();
    let service = build_service(test_config(), store.clone(), backend.clone());

    let outcome = service.translate(&request("Hello.")).await.unwrap();
    assert_eq!(outcome.translated_text, "[es]Hello.");
    assert_eq!(store.puts(), 1);
    assert_eq!(store.stored(), 0);

    // 没有写入成功，下一次仍会调用后端
    service.translate(&request("Hello.")).await.unwrap();
    assert_eq!(backend.calls(), 2);
}

/// 存储完全不可用时服务退化为直通
#[tokio::test]
async fn test_store_fully_down() {
    let store = FaultyStore::new(StoreFault::Both);
    let service = build_service(test_config(), store, ScriptedBackend::echo());

    let outcome = service.translate(&request("A. B.")).await.unwrap();
    assert_eq!(outcome.translated_text, "[es]A.[es] B.");

    let health = service.get_health().await;
    assert_eq!(
        health.overall,
        caching_translate::translation::HealthLevel::Degraded
    );
}

/// 后端不可恢复错误：返回错误码，不返回部分译文，已完成的分句保留在缓存中
#[tokio::test]
async fn test_fatal_backend_error_aborts_request() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::new(Script::FatalOn("FAIL"));
    let service = build_service(test_config(), store.clone(), backend.clone());

    let err = service
        .translate(&request("Good. FAIL. Never."))
        .await
        .expect_err("fatal backend error must abort the request");

    assert_eq!(err.error_code(), "InvalidRequestException");
    assert_eq!(err.status_code(), 500);
    assert!(!err.is_retryable());

    // 不可恢复错误不重试，第三个分句不会被处理
    assert_eq!(backend.calls(), 2);
    assert_eq!(store.len(), 1);
    assert!(store
        .peek(&Fingerprint::generate("en", "es", "Good."))
        .is_some());
    assert_eq!(service.get_stats().snapshot().errors_encountered, 1);
}

/// 可重试错误在次数内恢复
#[tokio::test]
async fn test_transient_backend_errors_are_retried() {
    let backend = ScriptedBackend::new(Script::FailTimes(4));
    let service = build_service(
        test_config(),
        Arc::new(MemoryCacheStore::new()),
        backend.clone(),
    );

    let outcome = service.translate(&request("Hello.")).await.unwrap();
    assert_eq!(outcome.translated_text, "[es]Hello.");
    assert_eq!(backend.calls(), 5);
}

/// 重试用尽：最多 10 次尝试，报告最后一次的错误码
#[tokio::test]
async fn test_retries_exhausted() {
    let store = Arc::new(MemoryCacheStore::new());
    let backend = ScriptedBackend::new(Script::AlwaysThrottle);
    let service = build_service(test_config(), store.clone(), backend.clone());

    let err = service
        .translate(&request("Hello."))
        .await
        .expect_err("throttling forever must eventually fail");

    match &err {
        TranslationError::RetriesExhausted { attempts, last } => {
            assert_eq!(*attempts, 10);
            assert!(matches!(**last, TranslationError::RateLimitExceeded { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.error_code(), "ThrottlingException");
    assert_eq!(backend.calls(), 10);
    assert!(store.is_empty());
}

/// 不支持的目标语言在调用后端前被拒绝
#[tokio::test]
async fn test_unsupported_language_pair() {
    let config = caching_translate::translation::TranslationConfig {
        validate_target_language: true,
        supported_target_languages: vec!["es".to_string()],
        ..test_config()
    };
    let backend = ScriptedBackend::echo();
    let service = build_service(config, Arc::new(MemoryCacheStore::new()), backend.clone());

    let err = service
        .translate(&TranslationRequest::new("en", "tlh", "Hello."))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UnsupportedLanguagePairException");
    assert_eq!(backend.calls(), 0);
}
