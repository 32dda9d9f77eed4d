//! The AI variant of [`MessageAnalyzer`] over a scripted backend.

mod common;

use std::sync::Arc;

use common::{client_with, ScriptedLlm};
use enrichment::{select_analyzer, AiAnalyzer, Intent, MessageAnalyzer, Sentiment, GENERAL_TOPIC};

/// **Test: AI analyzer maps labels to the fixed score and derives topic and question flag.**
#[tokio::test]
async fn test_ai_analyzer_insight() {
    let llm = ScriptedLlm::ok(&["positive", "salary, payday", "question"]);
    let analyzer = AiAnalyzer::new(Arc::new(client_with(llm.clone())));

    let insight = analyzer.analyze("is payday on friday? thanks!").await;

    assert_eq!(insight.sentiment, Sentiment::Positive);
    assert_eq!(insight.sentiment_score, 0.8);
    assert_eq!(insight.topics, vec!["salary", "payday"]);
    assert_eq!(insight.topic, "salary");
    assert_eq!(insight.keywords, insight.topics);
    assert_eq!(insight.intent, Intent::Question);
    assert!(insight.is_question);
    assert_eq!(llm.calls(), 3);
}

/// **Test: AI scores are always one of the mapped values.**
#[tokio::test]
async fn test_ai_scores_are_mapped() {
    let llm = ScriptedLlm::new([
        Ok("negative"),
        Err("down"),
        Err("down"),
        Ok("what?"),
        Ok(""),
        Ok("greeting"),
    ]);
    let analyzer = AiAnalyzer::new(Arc::new(client_with(llm)));

    let first = analyzer.analyze("this keeps failing").await;
    assert_eq!(first.sentiment_score, -0.8);
    assert_eq!(first.topic, GENERAL_TOPIC);
    assert_eq!(first.intent, Intent::General);

    let second = analyzer.analyze("hello everyone").await;
    assert_eq!(second.sentiment_score, 0.0);
    assert!(second.topics.is_empty());
    assert_eq!(second.intent, Intent::Greeting);
}

/// **Test: Configured client selects the AI variant.**
#[test]
fn test_select_ai_variant() {
    let analyzer = select_analyzer(Arc::new(client_with(ScriptedLlm::ok(&[]))));
    assert_eq!(analyzer.name(), "ai");
}
