use async_openai::types::{
    ChatChoice, ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, FinishReason as OpenAiFinish,
    FunctionCall, FunctionObjectArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    llm::{ChatRequest, GatewayError, ToolSpec},
    schemas::{Completion, CompletionContent, FinishReason, Message, ToolCall},
};

pub(crate) fn build_request(
    model: &str,
    request: &ChatRequest,
) -> Result<CreateChatCompletionRequest, GatewayError> {
    let messages = request
        .messages
        .iter()
        .map(to_openai_message)
        .collect::<Result<Vec<_>, _>>()?;

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(model)
        .messages(messages)
        .temperature(request.temperature);

    if let Some(schema) = &request.response_schema {
        args.response_format(ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: "step".to_string(),
                schema: Some(schema.clone()),
                strict: Some(false),
            },
        });
    }

    if !request.tools.is_empty() {
        let tools = request
            .tools
            .iter()
            .map(to_openai_tool)
            .collect::<Result<Vec<_>, _>>()?;
        args.tools(tools);
    }

    Ok(args.build()?)
}

pub(crate) fn to_openai_message(
    message: &Message,
) -> Result<ChatCompletionRequestMessage, GatewayError> {
    let message = match message {
        Message::System(text) => ChatCompletionRequestSystemMessageArgs::default()
            .content(text.as_str())
            .build()?
            .into(),
        Message::User(text) => ChatCompletionRequestUserMessageArgs::default()
            .content(text.as_str())
            .build()?
            .into(),
        Message::Assistant(text) => ChatCompletionRequestAssistantMessageArgs::default()
            .content(text.as_str())
            .build()?
            .into(),
        Message::AssistantToolCalls(calls) => {
            let calls = calls
                .iter()
                .map(to_openai_tool_call)
                .collect::<Result<Vec<_>, GatewayError>>()?;
            ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(calls)
                .build()?
                .into()
        }
        Message::ToolResult(result) => ChatCompletionRequestToolMessageArgs::default()
            .content(result.text())
            .tool_call_id(result.tool_call_id.as_str())
            .build()?
            .into(),
    };
    Ok(message)
}

pub(crate) fn to_openai_tool(spec: &ToolSpec) -> Result<ChatCompletionTool, GatewayError> {
    let function = FunctionObjectArgs::default()
        .name(spec.name.replace(' ', "_"))
        .description(spec.description.clone())
        .parameters(spec.parameters.clone())
        .build()?;

    Ok(ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(function)
        .build()?)
}

fn to_openai_tool_call(call: &ToolCall) -> Result<ChatCompletionMessageToolCall, GatewayError> {
    Ok(ChatCompletionMessageToolCall {
        id: call.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: call.tool_id.clone(),
            arguments: serde_json::to_string(&call.arguments)?,
        },
    })
}

fn to_tool_call(call: ChatCompletionMessageToolCall) -> Result<ToolCall, GatewayError> {
    let arguments: Map<String, Value> = serde_json::from_str(&call.function.arguments)?;
    let id = if call.id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        call.id
    };
    Ok(ToolCall::new(id, call.function.name, arguments))
}

pub(crate) fn to_completion(choice: ChatChoice) -> Result<Completion, GatewayError> {
    let finish_reason = map_finish_reason(choice.finish_reason);
    let content = match choice.message.tool_calls {
        Some(calls) if !calls.is_empty() => CompletionContent::ToolCalls(
            calls
                .into_iter()
                .map(to_tool_call)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        _ => CompletionContent::Text(choice.message.content.ok_or(GatewayError::EmptyReply)?),
    };
    Ok(Completion::new(finish_reason, content))
}

pub(crate) fn map_finish_reason(reason: Option<OpenAiFinish>) -> FinishReason {
    match reason {
        Some(OpenAiFinish::Stop) | Some(OpenAiFinish::ToolCalls) | Some(OpenAiFinish::FunctionCall) => {
            FinishReason::Completed
        }
        Some(OpenAiFinish::Length) => FinishReason::Truncated,
        Some(OpenAiFinish::ContentFilter) => FinishReason::Inappropriate,
        None => FinishReason::Other,
    }
}
