//! The resolvers that make up the standard link chain.

use super::{ResolveContext, Resolution, Resolver, ASSETS_URL_PREFIX, POSTS_URL_PREFIX};
use crate::registry::PostRegistry;
use vaultpress_types::{AssetDescriptor, Diagnostic, WikiLink};

const SVG_SUFFIX: &str = ".svg";
const EXCALIDRAW_SUFFIX: &str = ".excalidraw";

/// Last path component of a link target
fn file_part(text: &str) -> &str {
    text.rsplit(['/', '\\']).next().unwrap_or(text)
}

fn image_markup(basename: &str) -> String {
    format!("![{basename}]({ASSETS_URL_PREFIX}{basename}.svg)")
}

/// Turns `![[x.svg]]` and `![[x.excalidraw]]` embeds into image references
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgResolver;

impl Resolver for SvgResolver {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn resolve(&self, link: &WikiLink, _ctx: &ResolveContext<'_>) -> Option<Resolution> {
        if !link.is_embed {
            return None;
        }

        let text = link.as_str();
        if let Some(stem) = text.strip_suffix(SVG_SUFFIX) {
            let basename = file_part(stem);
            return Some(
                Resolution::rewritten(image_markup(basename))
                    .with_asset(AssetDescriptor::svg(text)),
            );
        }

        if let Some(stem) = text.strip_suffix(EXCALIDRAW_SUFFIX) {
            let basename = file_part(stem);
            return Some(
                Resolution::rewritten(image_markup(basename))
                    .with_asset(AssetDescriptor::excalidraw(text, basename)),
            );
        }

        None
    }
}

/// Links `[[Title]]` to another post known to the registry
#[derive(Debug, Clone, Copy)]
pub struct CrossPostResolver<'a> {
    registry: &'a PostRegistry,
}

impl<'a> CrossPostResolver<'a> {
    pub fn new(registry: &'a PostRegistry) -> Self {
        Self { registry }
    }
}

impl Resolver for CrossPostResolver<'_> {
    fn name(&self) -> &'static str {
        "cross-post"
    }

    fn resolve(&self, link: &WikiLink, _ctx: &ResolveContext<'_>) -> Option<Resolution> {
        if link.is_embed {
            return None;
        }

        let slug = self.registry.lookup(link.as_str())?;
        Some(Resolution::rewritten(format!(
            "[{}]({POSTS_URL_PREFIX}{slug}/)",
            link.as_str()
        )))
    }
}

/// Unlinks anything nothing else claimed, with a warning
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackResolver;

impl Resolver for FallbackResolver {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn resolve(&self, link: &WikiLink, ctx: &ResolveContext<'_>) -> Option<Resolution> {
        let text = link.as_str();
        let diagnostic = Diagnostic::warning(
            "link.unresolved",
            format!(
                "Unresolved wikilink [[{}]] in post '{}'; published as plain text",
                text, ctx.post_title
            ),
        )
        .with_post_title(ctx.post_title)
        .with_context(text);

        Some(Resolution::rewritten(text).with_diagnostic(diagnostic))
    }
}
