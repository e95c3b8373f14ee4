//! Move resolution against scripted backends

use duelbench_core::{
    Error, MoveQuery, MoveResolver, Observation, Provenance, StepRecord, RETRY_REMINDER,
};
use duelbench_llm::{
    MockBackend, ModelRequest, ProviderFamily, ProviderOutput, ProviderRouter, SamplingAdapter,
    TokenUsage,
};
use serde_json::json;
use std::sync::Arc;

const MOVE_PATTERN: &str = r"<(C\dR\d)>";

fn resolver(mock: &Arc<MockBackend>, model: &str) -> MoveResolver {
    let router = ProviderRouter::new().with_backend(mock.clone());
    MoveResolver::new(
        SamplingAdapter::new(Arc::new(router)),
        ModelRequest::new(model).with_temperature(0.2),
    )
}

fn query(legal_moves: &[&str], num_samples: u32) -> MoveQuery {
    let observation = Observation::new(
        "tictactoe",
        legal_moves.iter().map(|m| (*m).to_string()).collect(),
    );
    MoveQuery::new(
        observation,
        "You are playing tic-tac-toe.",
        "Board: X.O/.../...",
        "Answer with one move like <C1R1>.",
        MOVE_PATTERN,
        num_samples,
    )
    .unwrap()
}

#[tokio::test]
async fn test_primary_parse_issues_one_query() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::DeepInfra));
    mock.push_text("I will take the centre: <C2R2>");
    let resolver = resolver(&mock, "meta-llama/Meta-Llama-3-70B-Instruct");

    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C2R2>"], 1))
        .await
        .unwrap();

    assert_eq!(resolved.move_text, "C2R2");
    assert_eq!(resolved.provenance, Provenance::ParsedPrimary);
    assert_eq!(resolved.queries_issued.len(), 1);
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.calls()[0].shape.stop, None);
}

#[tokio::test]
async fn test_bracketed_token_pattern() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::DeepInfra));
    mock.push_text("<C2R2>");
    mock.push_text("I would rather not say");
    mock.push_text("nothing useful");
    let resolver = resolver(&mock, "some/model");

    let bracketed = |legal_moves: &[&str]| {
        MoveQuery::new(
            Observation::new(
                "tictactoe",
                legal_moves.iter().map(|m| (*m).to_string()).collect(),
            ),
            "You are playing tic-tac-toe.",
            "Board: .........",
            "Answer with one move wrapped in <>.",
            r"<([A-Z0-9]+)>",
            1,
        )
        .unwrap()
    };

    let resolved = resolver
        .resolve(&bracketed(&["<C1R1>", "<C2R2>"]))
        .await
        .unwrap();
    assert_eq!(resolved.move_text, "C2R2");
    assert_eq!(resolved.provenance, Provenance::ParsedPrimary);
    assert_eq!(resolved.queries_issued.len(), 1);

    let resolved = resolver
        .resolve(&bracketed(&["<C1R1>", "<C2R2>"]))
        .await
        .unwrap();
    assert_eq!(resolved.move_text, "C1R1");
    assert_eq!(resolved.provenance, Provenance::FallbackLegal);
    assert_eq!(resolved.queries_issued.len(), 2);
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_unparsable_answers_fall_back_to_first_legal_move() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::DeepInfra));
    mock.push_text("I am not sure.");
    mock.push_text("Still thinking...");
    let resolver = resolver(&mock, "mistralai/Mixtral-8x7B-Instruct-v0.1");

    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C2R2>"], 1))
        .await
        .unwrap();

    assert_eq!(resolved.move_text, "C1R1");
    assert_eq!(resolved.provenance, Provenance::FallbackLegal);
    assert_eq!(resolved.queries_issued.len(), 2);

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].messages[1].content,
        calls[1].messages[1].content.replace(RETRY_REMINDER, "")
    );
    assert!(calls[1].messages[1].content.ends_with(RETRY_REMINDER));
}

#[tokio::test]
async fn test_no_legal_moves_falls_back_to_empty_move() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::DeepInfra));
    let resolver = resolver(&mock, "some/model");

    let resolved = resolver.resolve(&query(&[], 1)).await.unwrap();

    assert_eq!(resolved.move_text, "");
    assert_eq!(resolved.provenance, Provenance::FallbackEmpty);
    assert_eq!(resolved.queries_issued.len(), 2);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_retry_parse_succeeds() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::Anyscale));
    mock.push_text("Let me think about the corners.");
    mock.push_text("<C3R1>");
    let resolver = resolver(&mock, "Open-Orca/Mistral-7B-OpenOrca");

    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C3R1>"], 1))
        .await
        .unwrap();

    assert_eq!(resolved.move_text, "C3R1");
    assert_eq!(resolved.provenance, Provenance::ParsedRetry);
    assert_eq!(resolved.queries_issued.len(), 2);
}

#[tokio::test]
async fn test_native_majority_vote() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::OpenAi));
    mock.push_output(ProviderOutput {
        texts: vec!["<C1R1>".into(), "<C2R2>".into(), "I pick <C2R2>".into()],
        metadata: Some(json!({"usage": {"prompt_tokens": 90, "completion_tokens": 15}})),
    });
    let resolver = resolver(&mock, "gpt-4o");

    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C2R2>"], 3))
        .await
        .unwrap();

    assert_eq!(resolved.move_text, "C2R2");
    assert_eq!(resolved.provenance, Provenance::ParsedPrimary);
    assert_eq!(resolved.queries_issued, vec![TokenUsage::new(90, 15)]);
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.calls()[0].shape.n, Some(3));
}

#[tokio::test]
async fn test_manual_majority_vote_and_single_sample_retry() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::Nvidia));
    mock.push_text("<C3R3>");
    mock.push_text("<C1R1>");
    mock.push_text("<C1R1>");
    let resolver = resolver(&mock, "gpt-oss-20b");

    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C3R3>"], 3))
        .await
        .unwrap();
    assert_eq!(resolved.move_text, "C1R1");
    assert_eq!(mock.call_count(), 3);

    // Nothing queued: every answer is "mock response", so 3 primary calls
    // plus exactly one retry call
    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C3R3>"], 3))
        .await
        .unwrap();
    assert_eq!(resolved.provenance, Provenance::FallbackLegal);
    assert_eq!(resolved.queries_issued.len(), 2);
    assert_eq!(mock.call_count(), 3 + 4);
}

#[tokio::test]
async fn test_step_record_accounts_for_every_call() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::Nvidia));
    mock.push_output(
        ProviderOutput::text("no move")
            .with_metadata(json!({"token_usage": {"prompt_tokens": 300, "completion_tokens": 40}})),
    );
    mock.push_output(
        ProviderOutput::text("also no move")
            .with_metadata(json!({"usage": {"prompt_tokens": 320, "completion_tokens": 10}})),
    );
    mock.push_output(
        ProviderOutput::text("<C2R2>")
            .with_metadata(json!({"usage": {"prompt_tokens": 335, "completion_tokens": 5}})),
    );
    let resolver = resolver(&mock, "gpt-oss-120b");

    let resolved = resolver
        .resolve(&query(&["<C1R1>", "<C2R2>"], 2))
        .await
        .unwrap();

    assert_eq!(resolved.provenance, Provenance::ParsedRetry);
    assert_eq!(
        resolved.queries_issued,
        vec![TokenUsage::new(620, 50), TokenUsage::new(335, 5)]
    );

    let step = StepRecord::from_resolved("llm_agent", "gpt-oss-120b", &resolved);
    assert_eq!(step.token_size, 620 + 50 + 335 + 5);
    assert_eq!(step.queries.len(), 2);
    assert_eq!(step.move_text, "C2R2");
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::DeepInfra));
    mock.push_error(duelbench_llm::Error::Api {
        provider: "deepinfra".into(),
        status: 503,
        message: "service unavailable".into(),
    });
    let resolver = resolver(&mock, "some/model");

    let err = resolver
        .resolve(&query(&["<C1R1>"], 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Llm(duelbench_llm::Error::Api { status: 503, .. })
    ));
    assert!(!err.is_configuration());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_missing_credential_is_fatal() {
    let mock = Arc::new(MockBackend::new(ProviderFamily::DeepInfra));
    let resolver = resolver(&mock, "gpt-5");

    let err = resolver
        .resolve(&query(&["<C1R1>"], 1))
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(mock.call_count(), 0);
}
