//! Events emitted by a streaming run, reduced to what the bridge consumes.

/// One event from a streaming run, in upstream emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStreamEvent {
    /// A new assistant text block began, possibly with initial text.
    TextCreated { text: String },
    /// Incremental assistant text.
    TextDelta { text: String },
    /// The run started a tool call. Logged only.
    ToolCallCreated { kind: ToolCallKind },
    /// Incremental code-interpreter input and output.
    ToolCallDelta(CodeInterpreterDelta),
    /// The run completed.
    End,
    /// The run ended without completing, or the stream reported an error.
    Failed { reason: String },
}

impl RunStreamEvent {
    pub fn text_created(text: impl Into<String>) -> Self {
        Self::TextCreated { text: text.into() }
    }

    pub fn text_delta(text: impl Into<String>) -> Self {
        Self::TextDelta { text: text.into() }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Short event name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RunStreamEvent::TextCreated { .. } => "text_created",
            RunStreamEvent::TextDelta { .. } => "text_delta",
            RunStreamEvent::ToolCallCreated { .. } => "tool_call_created",
            RunStreamEvent::ToolCallDelta(_) => "tool_call_delta",
            RunStreamEvent::End => "end",
            RunStreamEvent::Failed { .. } => "failed",
        }
    }
}

/// Kind of tool a run invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallKind {
    CodeInterpreter,
    FileSearch,
    Function { name: String },
    Other(String),
}

impl std::fmt::Display for ToolCallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolCallKind::CodeInterpreter => f.write_str("code_interpreter"),
            ToolCallKind::FileSearch => f.write_str("file_search"),
            ToolCallKind::Function { name } => write!(f, "function:{}", name),
            ToolCallKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// Fragment of a code-interpreter tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeInterpreterDelta {
    /// Source code fragment.
    pub input: Option<String>,
    /// Outputs produced so far, in order.
    pub outputs: Vec<CodeOutput>,
}

impl CodeInterpreterDelta {
    pub fn input(code: impl Into<String>) -> Self {
        Self {
            input: Some(code.into()),
            outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, output: CodeOutput) -> Self {
        self.outputs.push(output);
        self
    }
}

/// Output of a code-interpreter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutput {
    /// Text written to the interpreter log.
    Logs(String),
    /// A generated image; not textual.
    Image { file_id: String },
}
