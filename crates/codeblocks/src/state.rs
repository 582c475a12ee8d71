use crate::block::CodeBlock;

/// Accumulates fenced blocks while walking the parser's event stream.
#[derive(Default)]
pub struct State {
    blocks: Vec<CodeBlock>,
    current: Option<FenceBuilder>,
}

impl State {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            current: None,
        }
    }

    pub fn is_within_fence(&self) -> bool {
        self.current.is_some()
    }

    pub fn enter_fence(&mut self, language: &str) {
        self.current = Some(FenceBuilder::new(language));
    }

    pub fn append_text(&mut self, text: &str) {
        if let Some(current) = &mut self.current {
            current.push_text(text);
        }
    }

    /// Closes the open fence, keeping it only if it has a tag and content.
    pub fn exit_fence(&mut self) {
        if let Some(current) = self.current.take() {
            if let Some(block) = current.into_block() {
                tracing::debug!(
                    index = self.blocks.len(),
                    language = block.language(),
                    bytes = block.content().len(),
                    "extracted code block"
                );
                self.blocks.push(block);
            }
        }
    }

    pub fn finalize(mut self) -> Vec<CodeBlock> {
        if self.current.is_some() {
            self.exit_fence();
        }
        self.blocks
    }
}

struct FenceBuilder {
    language: String,
    content: String,
}

impl FenceBuilder {
    fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            content: String::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        self.content.push_str(text);
    }

    fn into_block(self) -> Option<CodeBlock> {
        CodeBlock::new(self.language, self.content)
    }
}
