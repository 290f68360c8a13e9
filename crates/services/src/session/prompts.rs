//! Pure prompt assembly for the chat collaborator.
//!
//! The engine treats the module's prompt strings as opaque; this module only
//! concatenates them with the flattened reading text and the guidance the
//! caller configures.

use ltd_core::model::Module;
use ltd_core::phase::Phase;

const DIVIDER: &str = "_______________";

/// Default coaching guidance appended to every system prompt, instructing the
/// assistant to elicit substantive responses rather than accepting one-word
/// answers.
pub(crate) const DEFAULT_ENGAGEMENT_GUIDANCE: &str = "You should work to elicit meaningful \
responses from students. If they give a minimal answer (when a long one would be appropriate), \
you should try strategies to get a more substantial response. For example, you might simply \
say, \"Please elaborate.\" You might ask a simpler question on the same topic. You might ask a \
question that obviously requires a more detailed response.\n\nTwo things you should NOT do:\n\
DO NOT dump a long explanation on a student who is giving minimal explanations. Make sure they \
demonstrate understanding first by answering questions.\nDO NOT simply take a student's word \
for it when they say they understand. Double check that they can actually articulate their \
understanding or answer a question.";

/// Builds the system prompt for the current phase.
///
/// Look uses the reading prompt alone; Think and Do embed the flattened
/// module text so the collaborator knows what the learner just read. Survey
/// and Done fall back to the conclude prompt shape, though no exchanges are
/// expected there.
pub(crate) fn system_prompt_for(module: &Module, phase: Phase, guidance: &str) -> String {
    let prompts = module.prompts();
    match phase {
        Phase::Look => format!("{}\n\n{guidance}", prompts.reading),
        Phase::Think => with_reading_context(&prompts.experiment, module, guidance),
        Phase::Do | Phase::Survey | Phase::Done => {
            with_reading_context(&prompts.conclude, module, guidance)
        }
    }
}

fn with_reading_context(prompt: &str, module: &Module, guidance: &str) -> String {
    format!(
        "{prompt}\n{DIVIDER}\nFor reference, they just read this text:\n{}\n{DIVIDER}\n\
         As you talk to them, follow this guidance:\n{guidance}",
        module.flattened_text()
    )
}

/// Appends the learner's conclusion draft to an outgoing Do-phase message so
/// the collaborator can respond to work in progress.
pub(crate) fn with_conclusion_context(user_text: &str, draft: Option<&str>) -> String {
    match draft {
        Some(draft) if !draft.trim().is_empty() => format!(
            "{user_text}\n\nFor reference, here is my current progress on writing my \
             conclusion:\n\n{draft}"
        ),
        _ => user_text.to_string(),
    }
}
