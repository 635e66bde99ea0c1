//! Ordered token-stream passes run between parsing and serialization.

mod anchors;
mod callout;

pub use anchors::HeadingAnchorPass;
pub use callout::CalloutPass;

use crate::options::RenderOptions;
use crate::token::Token;

/// A transformation over the block token stream: tokens in, tokens out.
pub trait TokenTransform: Send + Sync {
    /// Short name used in trace logging.
    fn name(&self) -> &'static str;

    /// Rewrites the token stream.
    fn apply(&self, tokens: Vec<Token>) -> Vec<Token>;
}

/// Fixed, ordered list of passes.
pub struct PassPipeline {
    passes: Vec<Box<dyn TokenTransform>>,
}

impl PassPipeline {
    /// Callouts first so anchors see the final heading set.
    pub fn standard(options: &RenderOptions) -> Self {
        let anchors =
            HeadingAnchorPass::new(options.dedupe_heading_ids).with_typographer(options.typographer);
        Self {
            passes: vec![Box::new(CalloutPass), Box::new(anchors)],
        }
    }

    /// Runs every pass in order.
    pub fn run(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for pass in &self.passes {
            log::trace!("Running token pass `{}` over {} tokens", pass.name(), tokens.len());
            tokens = pass.apply(tokens);
        }
        tokens
    }

    /// Names of the passes, in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }
}

impl std::fmt::Debug for PassPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassPipeline")
            .field("passes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_order() {
        assert_eq!(
            PassPipeline::standard(&RenderOptions::default()).names(),
            vec!["callout", "heading-anchor"]
        );
    }
}
