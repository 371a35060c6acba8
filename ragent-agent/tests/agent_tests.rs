//! Agent loop tests against a scripted model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ragent_agent::{AgentConfig, AgentError, AgentLoop, HistoryPolicy, ToolExecution};
use ragent_core::{Role, ToolCall, ToolChoice};
use ragent_model::MockLlm;
use ragent_telemetry::{CapturedSpans, SpanCaptureLayer};
use ragent_tool::{
    TemperatureUnit, ToolDispatcher, ToolError, ToolKind, WeatherReport, WeatherService,
};
use serde_json::{Value, json};

fn agent(llm: Arc<MockLlm>, config: AgentConfig) -> AgentLoop {
    AgentLoop::builder().llm(llm).config(config).build().unwrap()
}

fn call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall::new(id, name, arguments.to_string())
}

#[tokio::test]
async fn no_tool_calls_means_one_request() {
    let llm = Arc::new(MockLlm::new("mock").with_text("Hello! How can I help?"));
    let mut agent = agent(llm.clone(), AgentConfig::default());

    let reply = agent.run_turn("Hi, how are you?").await.unwrap();

    assert_eq!(reply.answer, "Hello! How can I help?");
    assert_eq!(reply.completion_calls, 1);
    assert!(reply.tool_results.is_empty());
    assert_eq!(llm.request_count(), 1);

    let request = &llm.requests()[0];
    assert_eq!(request.tool_choice, Some(ToolChoice::Auto));
    let names: Vec<&str> = request.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["get_current_weather", "calculate"]);
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].content_text(), ragent_agent::DEFAULT_INSTRUCTION);
    assert_eq!(request.messages[1].content_text(), "Hi, how are you?");
}

#[tokio::test]
async fn tool_call_round_trip() {
    let llm = Arc::new(
        MockLlm::new("mock")
            .with_tool_calls(vec![call(
                "call_1",
                "get_current_weather",
                json!({"location": "Tokyo"}),
            )])
            .with_text("It is 18°C and clear in Tokyo."),
    );
    let mut agent = agent(llm.clone(), AgentConfig::default());

    let reply = agent.run_turn("What's the weather in Tokyo?").await.unwrap();

    assert_eq!(reply.answer, "It is 18°C and clear in Tokyo.");
    assert_eq!(reply.completion_calls, 2);
    assert_eq!(reply.tool_results.len(), 1);
    let content: Value = serde_json::from_str(&reply.tool_results[0].content).unwrap();
    assert_eq!(content["location"], "Tokyo");

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);

    let second = &requests[1];
    assert!(second.tools.is_empty());
    assert!(second.tool_choice.is_none());
    let roles: Vec<Role> = second.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
    assert_eq!(second.messages[2].tool_calls[0].id, "call_1");
    assert_eq!(second.messages[3].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(second.messages[3].name.as_deref(), Some("get_current_weather"));
}

#[tokio::test]
async fn conversation_grows_by_one_per_call_even_on_failure() {
    let calls = vec![
        call("a", "get_current_weather", json!({"location": "Cairo"})),
        call("b", "launch_rocket", json!({})),
        call("c", "calculate", json!({"operation": "divide", "a": 1, "b": 0})),
        call("d", "calculate", json!({"operation": "add"})),
    ];
    let llm = Arc::new(MockLlm::new("mock").with_tool_calls(calls).with_text("done"));
    let mut agent = agent(llm.clone(), AgentConfig::default());

    let reply = agent.run_turn("do things").await.unwrap();

    assert_eq!(reply.answer, "done");
    let errors: Vec<bool> = reply.tool_results.iter().map(|r| r.is_error).collect();
    assert_eq!(errors, vec![false, true, true, true]);

    let second = &llm.requests()[1];
    assert_eq!(second.messages.len(), 3 + 4);
    let ids: Vec<&str> =
        second.messages[3..].iter().filter_map(|m| m.tool_call_id.as_deref()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);

    let kinds: Vec<String> = reply.tool_results[1..]
        .iter()
        .map(|r| serde_json::from_str::<Value>(&r.content).unwrap()["kind"].to_string())
        .collect();
    assert_eq!(kinds, vec!["\"resolution\"", "\"execution\"", "\"argument_validation\""]);
}

/// Sleeps longer for earlier cities so completion order is reversed.
struct StaggeredWeather;

#[async_trait]
impl WeatherService for StaggeredWeather {
    async fn current_weather(
        &self,
        location: &str,
        unit: TemperatureUnit,
    ) -> Result<WeatherReport, ToolError> {
        let delay = match location {
            "Singapore" => 30,
            "Cairo" => 20,
            _ => 10,
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(WeatherReport {
            location: location.to_string(),
            temperature: 20.0,
            unit,
            condition: "Mild".into(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_results_keep_request_order() {
    let calls = vec![
        call("1", "get_current_weather", json!({"location": "Singapore"})),
        call("2", "get_current_weather", json!({"location": "Cairo"})),
        call("3", "get_current_weather", json!({"location": "London"})),
    ];
    let llm = Arc::new(MockLlm::new("mock").with_tool_calls(calls).with_text("ok"));
    let dispatcher = ToolDispatcher::builder()
        .tools(ToolKind::ALL)
        .weather_service(Arc::new(StaggeredWeather))
        .build();
    let mut agent = AgentLoop::builder()
        .llm(llm.clone())
        .dispatcher(dispatcher)
        .config(AgentConfig::default().with_tool_execution(ToolExecution::Concurrent))
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let reply = agent.run_turn("weather in three cities").await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(60));
    let ids: Vec<&str> = reply.tool_results.iter().map(|r| r.tool_call_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    let second = &llm.requests()[1];
    let locations: Vec<Value> = second.messages[3..]
        .iter()
        .map(|m| serde_json::from_str::<Value>(m.content_text()).unwrap()["location"].clone())
        .collect();
    assert_eq!(locations, vec![json!("Singapore"), json!("Cairo"), json!("London")]);
}

#[tokio::test]
async fn reset_policy_forgets_previous_turns() {
    let llm = Arc::new(MockLlm::new("mock").with_text("first").with_text("second"));
    let mut agent = agent(llm.clone(), AgentConfig::default());

    agent.run_turn("one").await.unwrap();
    agent.run_turn("two").await.unwrap();

    let requests = llm.requests();
    assert_eq!(requests[1].messages.len(), 2);
    assert_eq!(requests[1].messages[1].content_text(), "two");
    assert_eq!(agent.history().len(), 1);
}

#[tokio::test]
async fn retain_policy_carries_history() {
    let llm = Arc::new(
        MockLlm::new("mock")
            .with_tool_call("get_current_weather", json!({"location": "London"}))
            .with_text("Foggy in London.")
            .with_text("You asked about London."),
    );
    let config = AgentConfig::default().with_history(HistoryPolicy::Retain);
    let mut agent = agent(llm.clone(), config);

    agent.run_turn("Weather in London?").await.unwrap();
    // system, user, assistant(tool call), tool, assistant
    assert_eq!(agent.history().len(), 5);

    let reply = agent.run_turn("Which city did I ask about?").await.unwrap();
    assert_eq!(reply.completion_calls, 1);
    assert_eq!(agent.history().len(), 7);

    let third = &llm.requests()[2];
    assert_eq!(third.messages.len(), 6);
    assert_eq!(third.messages[4].content_text(), "Foggy in London.");
}

#[tokio::test]
async fn failed_turn_leaves_history_unchanged() {
    let llm = Arc::new(
        MockLlm::new("mock")
            .with_text("hello")
            .with_tool_call("calculate", json!({"operation": "add", "a": 1, "b": 2}))
            .with_error("503 Service Unavailable")
            .with_text("still here"),
    );
    let config = AgentConfig::default().with_history(HistoryPolicy::Retain);
    let mut agent = agent(llm.clone(), config);

    agent.run_turn("hi").await.unwrap();
    let before = agent.history().clone();

    let err = agent.run_turn("add 1 and 2").await.unwrap_err();
    assert!(matches!(err, AgentError::Completion(_)));
    assert_eq!(agent.history(), &before);

    let reply = agent.run_turn("are you there?").await.unwrap();
    assert_eq!(reply.answer, "still here");
    assert_eq!(llm.requests()[3].messages.len(), before.len() + 1);
}

#[tokio::test]
async fn empty_dispatcher_sends_no_tools() {
    let llm = Arc::new(MockLlm::new("mock").with_text("plain"));
    let mut agent = AgentLoop::builder()
        .llm(llm.clone())
        .dispatcher(ToolDispatcher::builder().build())
        .build()
        .unwrap();

    agent.run_turn("hi").await.unwrap();

    let request = &llm.requests()[0];
    assert!(request.tools.is_empty());
    assert!(request.tool_choice.is_none());
}

#[test]
fn builder_validates() {
    assert!(matches!(AgentLoop::builder().build(), Err(AgentError::Config(_))));

    let llm = Arc::new(MockLlm::new("mock"));
    let result = AgentLoop::builder()
        .llm(llm)
        .config(AgentConfig::default().with_instruction(" "))
        .build();
    assert!(matches!(result, Err(AgentError::Config(_))));
}

#[tokio::test]
async fn turn_is_traced() {
    let captured = CapturedSpans::new();
    let subscriber = {
        use tracing_subscriber::layer::SubscriberExt;
        tracing_subscriber::registry().with(SpanCaptureLayer::new(captured.clone()))
    };
    let _guard = tracing::subscriber::set_default(subscriber);

    let llm = Arc::new(MockLlm::new("qwen-plus").with_text("hi"));
    let mut agent = agent(llm, AgentConfig::default());
    agent.run_turn("hello").await.unwrap();

    let spans = captured.named("run_turn");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].fields["llm"], "qwen-plus");
    assert_eq!(spans[0].fields["input_len"], 5);
}
