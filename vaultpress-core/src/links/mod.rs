//! Wikilink resolution for `[[target]]` and `![[target]]` syntax.
//!
//! Every token outside code is offered to an ordered list of resolvers. The
//! first resolver that returns a [`Resolution`] decides the replacement text;
//! there is no scoring. The standard chain is:
//!
//! 1. [`SvgResolver`]: diagram embeds become `/assets/` image references
//! 2. [`CrossPostResolver`]: titles known to the registry become `/posts/` links
//! 3. [`FallbackResolver`]: anything else is unlinked with a warning
//!
//! Resolvers are pure. Asset descriptors and diagnostics come back as part of
//! the result and are merged by [`LinkPipeline::process`].

mod resolvers;

pub use resolvers::{CrossPostResolver, FallbackResolver, SvgResolver};

use crate::registry::PostRegistry;
use crate::shield;
use regex::Regex;
use std::sync::OnceLock;
use vaultpress_types::{AssetDescriptor, Diagnostic, WikiLink};

/// Permalink prefix for cross-post links
pub const POSTS_URL_PREFIX: &str = "/posts/";
/// URL prefix for copied diagram assets
pub const ASSETS_URL_PREFIX: &str = "/assets/";

static WIKILINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn wikilink_regex() -> &'static Regex {
    WIKILINK_REGEX.get_or_init(|| Regex::new(r"(!)?\[\[([^\]]+)\]\]").expect("valid wikilink regex"))
}

/// What a resolver is handed besides the token itself
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Title of the post being converted
    pub post_title: &'a str,
}

/// Replacement text for one token, plus anything it emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub replacement: String,
    pub assets: Vec<AssetDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn rewritten(replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            assets: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_asset(mut self, asset: AssetDescriptor) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}

/// One stage of the resolver chain
pub trait Resolver {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Claim the token, or return `None` to pass it on
    fn resolve(&self, link: &WikiLink, ctx: &ResolveContext<'_>) -> Option<Resolution>;
}

/// Result of running the pipeline over one post body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOutput {
    pub content: String,
    /// Diagram embeds in order of appearance
    pub assets: Vec<AssetDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Ordered resolver chain
pub struct LinkPipeline<'a> {
    resolvers: Vec<Box<dyn Resolver + 'a>>,
}

impl<'a> LinkPipeline<'a> {
    /// The standard chain: SVG, then cross-post, then fallback
    pub fn new(registry: &'a PostRegistry) -> Self {
        Self::from_resolvers(vec![
            Box::new(SvgResolver),
            Box::new(CrossPostResolver::new(registry)),
            Box::new(FallbackResolver),
        ])
    }

    /// A custom chain, tried in the given order
    pub fn from_resolvers(resolvers: Vec<Box<dyn Resolver + 'a>>) -> Self {
        Self { resolvers }
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Offer a single token to each resolver in turn
    pub fn resolve_link(&self, link: &WikiLink, ctx: &ResolveContext<'_>) -> Option<Resolution> {
        self.resolvers.iter().find_map(|resolver| {
            let resolution = resolver.resolve(link, ctx)?;
            tracing::trace!("[[{}]] resolved by {}", link.as_str(), resolver.name());
            Some(resolution)
        })
    }

    /// Rewrite every wikilink in `content` that is not inside code
    ///
    /// A token no resolver claims is left untouched; with the standard chain
    /// that cannot happen.
    pub fn process(&self, content: &str, post_title: &str) -> LinkOutput {
        let ctx = ResolveContext { post_title };
        let (masked, code) = shield::shield(content);

        let mut output = LinkOutput::default();
        let mut rewritten = String::with_capacity(masked.len());
        let mut last = 0;

        for caps in wikilink_regex().captures_iter(&masked) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            rewritten.push_str(&masked[last..whole.start()]);
            last = whole.end();

            // Resolvers see the text as written, code spans included
            let link = WikiLink::new(code.restore(&caps[2]), caps.get(1).is_some());
            match self.resolve_link(&link, &ctx) {
                Some(resolution) => {
                    rewritten.push_str(&resolution.replacement);
                    output.assets.extend(resolution.assets);
                    output.diagnostics.extend(resolution.diagnostics);
                }
                None => rewritten.push_str(whole.as_str()),
            }
        }
        rewritten.push_str(&masked[last..]);

        output.content = code.restore(&rewritten);
        output
    }
}

/// Run the standard chain over `content`
pub fn convert_links(content: &str, registry: &PostRegistry, post_title: &str) -> LinkOutput {
    LinkPipeline::new(registry).process(content, post_title)
}
