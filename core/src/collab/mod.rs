//! The generation collaborator seen as a black box: one request in, reply
//! fragments out. Fragments are only ever parsed once fully assembled.

use crate::error::Result;
use crate::logger::Logger;
use crate::prompts::EditRequest;

pub mod collab_openai;

pub use collab_openai::OpenAiCollaborator;

pub trait Collaborator {
    /// Sends `request`, handing each reply fragment to `on_fragment` in arrival order.
    fn send(&self, request: &EditRequest, on_fragment: &mut dyn FnMut(&str)) -> Result<()>;
}

/// Buffers the whole reply while forwarding fragments for display.
pub fn collect_reply(
    collaborator: &dyn Collaborator,
    request: &EditRequest,
    logger: &Logger,
    on_fragment: &mut dyn FnMut(&str),
) -> Result<String> {
    let mut reply = String::new();
    let mut fragments = 0usize;
    let outcome = collaborator.send(request, &mut |fragment: &str| {
        fragments += 1;
        reply.push_str(fragment);
        on_fragment(fragment);
    });

    if let Err(e) = outcome {
        logger.error("collab", "send", &e.to_string());
        return Err(e);
    }
    logger.info(
        "collab",
        "reply_assembled",
        &format!("{} fragment(s), {} byte(s)", fragments, reply.len()),
    );
    Ok(reply)
}

/// Replays a fixed list of fragments.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCollaborator {
    fragments: Vec<String>,
}

impl ScriptedCollaborator {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fragments: fragments.into_iter().map(Into::into).collect() }
    }

    /// The whole reply as a single fragment.
    pub fn whole(reply: impl Into<String>) -> Self {
        Self { fragments: vec![reply.into()] }
    }
}

impl Collaborator for ScriptedCollaborator {
    fn send(&self, _request: &EditRequest, on_fragment: &mut dyn FnMut(&str)) -> Result<()> {
        for fragment in &self.fragments {
            on_fragment(fragment);
        }
        Ok(())
    }
}
