//! The tool-dispatching agent.
//!
//! Structured requests go straight to a chain. Free-form requests run a
//! planner loop: the planner model picks a [`Tool`], the agent runs it and
//! feeds the result back as an observation until the planner answers or the
//! step limit is hit.

use std::sync::Arc;

use codeassist_lexer::{analyze_complexity, detect_language};
use codeassist_style::PreferenceStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chain::{
    error_marker, ExplainChain, ExplainRequest, GenerateChain, GenerateRequest, TranslateChain,
    TranslateRequest,
};
use crate::config::{AssistConfig, ModelConfig, DEFAULT_MAX_STEPS, DEFAULT_MEMORY_WINDOW};
use crate::error::{ConfigurationError, ToolError};
use crate::memory::{ConversationMemory, Role};
use crate::planner::{parse_reply, PlannerReply};
use crate::prompt;
use crate::registry::{ModelHandle, ModelRegistry};
use crate::request::{TaskRequest, TaskResponse};
use crate::tools::Tool;

/// Answer given when the planner runs out of steps.
pub const STOPPED_MESSAGE: &str = "Agent stopped due to iteration limit.";

/// Tool name recorded for planner replies that could not be parsed.
const INVALID_REPLY_TOOL: &str = "_Exception";

/// Where the agent is in handling a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Dispatch,
    ChainExecuting,
    ToolExecuting,
}

/// One planner iteration: the action taken and what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStep {
    pub tool: String,
    pub input: String,
    pub observation: String,
}

/// Outcome of a free-form request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReply {
    pub answer: String,
    pub steps: Vec<AgentStep>,
    /// Whether the step limit ended the loop
    pub stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    pub max_steps: usize,
    pub memory_window: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            memory_window: DEFAULT_MEMORY_WINDOW,
        }
    }
}

/// A conversational session over the chains and tools.
pub struct Agent {
    explain: ExplainChain,
    generate: GenerateChain,
    translate: TranslateChain,
    planner: ModelHandle,
    settings: AgentSettings,
    memory: ConversationMemory,
    state: AgentState,
}

impl Agent {
    pub fn new(
        registry: Arc<ModelRegistry>,
        preferences: Arc<PreferenceStore>,
        planner: ModelConfig,
        settings: AgentSettings,
    ) -> Self {
        Self {
            explain: ExplainChain::new(Arc::clone(&registry)),
            generate: GenerateChain::new(Arc::clone(&registry), Arc::clone(&preferences)),
            translate: TranslateChain::new(Arc::clone(&registry), preferences),
            planner: registry.handle_for(planner),
            settings: AgentSettings {
                max_steps: settings.max_steps.max(1),
                ..settings
            },
            memory: ConversationMemory::new(),
            state: AgentState::Idle,
        }
    }

    /// Create an agent with planner and limits taken from `config`.
    pub fn from_config(
        registry: Arc<ModelRegistry>,
        preferences: Arc<PreferenceStore>,
        config: &AssistConfig,
    ) -> Self {
        let settings = AgentSettings {
            max_steps: config.max_steps,
            memory_window: config.memory_window,
        };
        Self::new(registry, preferences, config.planner_config(), settings)
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    /// Handle one transport request.
    pub async fn process_request(
        &mut self,
        request: TaskRequest,
    ) -> Result<TaskResponse, ConfigurationError> {
        self.state = AgentState::Dispatch;
        let response = self.dispatch(request).await;
        self.state = AgentState::Idle;
        response
    }

    /// Answer a free-form request with the planner loop.
    pub async fn run(&mut self, input: &str) -> Result<AgentReply, ConfigurationError> {
        self.state = AgentState::Dispatch;
        let reply = self.plan(input).await;
        self.state = AgentState::Idle;
        reply
    }

    async fn dispatch(&mut self, request: TaskRequest) -> Result<TaskResponse, ConfigurationError> {
        match request {
            TaskRequest::Explain(request) => {
                self.state = AgentState::ChainExecuting;
                let result = self.explain.run(&request).await?;
                self.state = AgentState::ToolExecuting;
                let complexity = analyze_complexity(&request.code);
                self.remember(
                    format!("Explain this {} code:\n{}", result.language, request.code),
                    &result.text,
                );
                Ok(TaskResponse::Explain {
                    explanation: result.text,
                    language: result.language,
                    complexity_analysis: complexity,
                })
            }
            TaskRequest::Generate(request) => {
                self.state = AgentState::ChainExecuting;
                let result = self.generate.run(&request).await?;
                self.remember(
                    format!("Write {} code: {}", result.language, request.description),
                    &result.text,
                );
                Ok(TaskResponse::Generate {
                    code: result.text,
                    language: result.language,
                })
            }
            TaskRequest::Translate(request) => {
                self.state = AgentState::ChainExecuting;
                let result = self.translate.run(&request).await?;
                let source_language = result.source_language.unwrap_or_default();
                self.remember(
                    format!(
                        "Translate this {} code to {}:\n{}",
                        source_language, result.language, request.code
                    ),
                    &result.text,
                );
                Ok(TaskResponse::Translate {
                    code: result.text,
                    source_language,
                    target_language: result.language,
                })
            }
            TaskRequest::FreeForm { input } => {
                let reply = self.plan(&input).await?;
                Ok(TaskResponse::FreeForm {
                    result: reply.answer,
                })
            }
        }
    }

    async fn plan(&mut self, input: &str) -> Result<AgentReply, ConfigurationError> {
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut answer = None;

        for iteration in 0..self.settings.max_steps {
            let planner_prompt = prompt::build_planner_prompt(
                self.memory.recent(self.settings.memory_window),
                input,
                &steps,
            );
            let reply = match self.planner.invoke(&planner_prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Planner failed on {}: {}", self.planner.config().name, e);
                    answer = Some(error_marker(&e));
                    break;
                }
            };

            match parse_reply(&reply) {
                Ok(PlannerReply::Final(text)) => {
                    debug!("Planner answered after {} step(s)", iteration);
                    answer = Some(text);
                    break;
                }
                Ok(PlannerReply::Action {
                    tool,
                    input: tool_input,
                }) => {
                    let observation = match Tool::from_name(&tool) {
                        Some(resolved) => {
                            debug!("Step {}: {}", iteration + 1, resolved);
                            self.call_tool(resolved, &tool_input).await?
                        }
                        None => format!(
                            "{} is not a valid tool, try one of [{}].",
                            tool,
                            tool_names()
                        ),
                    };
                    steps.push(AgentStep {
                        tool,
                        input: tool_input,
                        observation,
                    });
                }
                Err(e) => {
                    debug!("Unparseable planner reply: {}", e);
                    steps.push(AgentStep {
                        tool: INVALID_REPLY_TOOL.to_string(),
                        input: reply.trim().to_string(),
                        observation: format!("Invalid or incomplete response: {}", e),
                    });
                }
            }
        }

        let stopped = answer.is_none();
        if stopped {
            info!("Planner hit the step limit ({})", self.settings.max_steps);
        }
        let answer = answer.unwrap_or_else(|| STOPPED_MESSAGE.to_string());
        self.remember(input, &answer);

        Ok(AgentReply {
            answer,
            steps,
            stopped,
        })
    }

    /// Run a tool, turning its failures into observation text.
    async fn call_tool(&mut self, tool: Tool, input: &str) -> Result<String, ConfigurationError> {
        self.state = if tool.uses_model() {
            AgentState::ChainExecuting
        } else {
            AgentState::ToolExecuting
        };
        let outcome = self.invoke_tool(tool, input).await;
        self.state = AgentState::Dispatch;

        match outcome {
            Ok(text) => Ok(text),
            Err(ToolError::Configuration(e)) => Err(e),
            Err(e) => Ok(format!("Error: {}", e)),
        }
    }

    /// Run a tool directly.
    pub async fn invoke_tool(&self, tool: Tool, input: &str) -> Result<String, ToolError> {
        match tool {
            Tool::ExplainCode => {
                let request: ExplainRequest = parse_tool_input(tool, input)?;
                Ok(self.explain.run(&request).await?.text)
            }
            Tool::GenerateCode => {
                let request: GenerateRequest = parse_tool_input(tool, input)?;
                Ok(self.generate.run(&request).await?.text)
            }
            Tool::TranslateCode => {
                let request: TranslateRequest = parse_tool_input(tool, input)?;
                Ok(self.translate.run(&request).await?.text)
            }
            Tool::DetectLanguage => Ok(detect_language(input)),
            Tool::AnalyzeComplexity => Ok(analyze_complexity(input).to_string()),
        }
    }

    fn remember(&mut self, input: impl Into<String>, resolution: &str) {
        self.memory.push(Role::User, input);
        self.memory.push(Role::Assistant, resolution);
    }
}

fn parse_tool_input<T: DeserializeOwned>(tool: Tool, input: &str) -> Result<T, ToolError> {
    serde_json::from_str(input).map_err(|source| ToolError::InvalidInput {
        tool: tool.name(),
        source,
    })
}

fn tool_names() -> String {
    Tool::ALL
        .iter()
        .map(|tool| tool.name())
        .collect::<Vec<_>>()
        .join(", ")
}
