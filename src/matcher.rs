use crate::catalog::{CommandCatalog, VoiceCommand};

/// Case-insensitive substring matcher over a [`CommandCatalog`].
pub struct CommandMatcher<'a> {
    catalog: &'a CommandCatalog,
}

impl<'a> CommandMatcher<'a> {
    pub fn new(catalog: &'a CommandCatalog) -> Self {
        Self { catalog }
    }

    /// First catalog entry whose phrase occurs anywhere in `transcript`.
    ///
    /// Declaration order decides between several contained phrases, not
    /// phrase length.
    pub fn find(&self, transcript: &str) -> Option<&'a VoiceCommand> {
        let folded = transcript.to_lowercase();
        if folded.trim().is_empty() {
            return None;
        }

        self.catalog
            .iter()
            .find(|command| !command.phrase.is_empty() && folded.contains(&command.phrase))
    }
}
