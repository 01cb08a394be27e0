use std::fmt;

#[derive(Debug, Clone, Copy)]
pub enum OpenAiModel {
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    Gpt41Mini,
}

impl fmt::Display for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenAiModel::Gpt4o => write!(f, "gpt-4o"),
            OpenAiModel::Gpt4oMini => write!(f, "gpt-4o-mini"),
            OpenAiModel::Gpt41 => write!(f, "gpt-4.1"),
            OpenAiModel::Gpt41Mini => write!(f, "gpt-4.1-mini"),
        }
    }
}

impl From<OpenAiModel> for String {
    fn from(val: OpenAiModel) -> Self {
        val.to_string()
    }
}
